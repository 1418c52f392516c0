//! Declared entity schemas and startup reconciliation.
//!
//! The catalog lists every structured table and its one-to-many edges.
//! Reconciliation runs once at startup, before the server begins serving:
//! additive mode only ever creates tables and appends columns; destructive
//! mode rebuilds the catalog from scratch and must never run against data an
//! operator cares about. A reconciliation failure is logged by the caller
//! and is not fatal to the process.

use crate::config::SyncMode;
use crate::error::AppError;
use crate::store::quote_ident;
use sqlx::PgPool;

pub struct ColumnDef {
    pub name: &'static str,
    pub definition: &'static str,
}

pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

/// One-to-many edge: `table.column` references `references.1` on
/// `references.0`.
pub struct ForeignKeyDef {
    pub constraint: &'static str,
    pub table: &'static str,
    pub column: &'static str,
    pub references: (&'static str, &'static str),
}

const fn col(name: &'static str, definition: &'static str) -> ColumnDef {
    ColumnDef { name, definition }
}

/// Declared tables, referenced tables first so destructive rebuilds can walk
/// the list in reverse. Encrypted columns are TEXT ciphertext; creation and
/// update stamps are free-form locale strings.
pub const CATALOG: &[TableDef] = &[
    TableDef {
        name: "usuarios",
        columns: &[
            col("id_usuario", "BIGSERIAL PRIMARY KEY"),
            col("nombre_usuario", "TEXT NOT NULL"),
            col("email_usuario", "TEXT NOT NULL"),
            col("password_usuario", "TEXT NOT NULL"),
            col("estado_usuario", "TEXT NOT NULL DEFAULT 'activo'"),
            col("create_usuario", "TEXT"),
            col("update_usuario", "TEXT"),
        ],
    },
    TableDef {
        name: "clientes",
        columns: &[
            col("id_cliente", "BIGSERIAL PRIMARY KEY"),
            col("nombre_cliente", "TEXT NOT NULL"),
            col("email_cliente", "TEXT"),
            col("telefono_cliente", "TEXT"),
            col("create_cliente", "TEXT"),
            col("update_cliente", "TEXT"),
        ],
    },
    TableDef {
        name: "propietarios",
        columns: &[
            col("id_propietario", "BIGSERIAL PRIMARY KEY"),
            col("nombre_propietario", "TEXT NOT NULL"),
            col("email_propietario", "TEXT NOT NULL"),
            col("telefono_propietario", "TEXT"),
            col("direccion_propietario", "TEXT"),
            col("create_propietario", "TEXT"),
            col("update_propietario", "TEXT"),
        ],
    },
    TableDef {
        name: "servicios",
        columns: &[
            col("id_servicio", "BIGSERIAL PRIMARY KEY"),
            col("nombre_servicio", "TEXT NOT NULL"),
            col("descripcion_servicio", "TEXT"),
            col("precio_servicio", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
            col("estado_servicio", "TEXT NOT NULL DEFAULT 'activo'"),
            col("create_servicio", "TEXT"),
            col("update_servicio", "TEXT"),
        ],
    },
    TableDef {
        name: "mascotas",
        columns: &[
            col("id_mascota", "BIGSERIAL PRIMARY KEY"),
            col("nombre_mascota", "TEXT NOT NULL"),
            col("especie", "TEXT NOT NULL"),
            col("raza", "TEXT"),
            col("edad", "INTEGER NOT NULL DEFAULT 0"),
            col("sexo", "TEXT"),
            col("id_propietario", "BIGINT NOT NULL"),
            col("create_mascota", "TEXT"),
            col("update_mascota", "TEXT"),
        ],
    },
    TableDef {
        name: "citas",
        columns: &[
            col("id_cita", "BIGSERIAL PRIMARY KEY"),
            col("fecha_cita", "TEXT NOT NULL"),
            col("estado_cita", "TEXT NOT NULL DEFAULT 'pendiente'"),
            col("id_usuario", "BIGINT"),
            col("id_cliente", "BIGINT"),
            col("id_mascota", "BIGINT"),
            col("id_servicio", "BIGINT"),
            col("create_cita", "TEXT"),
            col("update_cita", "TEXT"),
        ],
    },
    TableDef {
        name: "notificaciones",
        columns: &[
            col("id_notificacion", "BIGSERIAL PRIMARY KEY"),
            col("id_usuario", "BIGINT NOT NULL"),
            col("mensaje", "TEXT NOT NULL"),
            col("tipo", "TEXT NOT NULL DEFAULT 'general'"),
            col("estado", "TEXT NOT NULL DEFAULT 'pendiente'"),
            col("create_notificacion", "TEXT"),
            col("update_notificacion", "TEXT"),
        ],
    },
];

pub const FOREIGN_KEYS: &[ForeignKeyDef] = &[
    ForeignKeyDef {
        constraint: "fk_mascotas_propietario",
        table: "mascotas",
        column: "id_propietario",
        references: ("propietarios", "id_propietario"),
    },
    ForeignKeyDef {
        constraint: "fk_citas_usuario",
        table: "citas",
        column: "id_usuario",
        references: ("usuarios", "id_usuario"),
    },
    ForeignKeyDef {
        constraint: "fk_citas_cliente",
        table: "citas",
        column: "id_cliente",
        references: ("clientes", "id_cliente"),
    },
    ForeignKeyDef {
        constraint: "fk_citas_mascota",
        table: "citas",
        column: "id_mascota",
        references: ("mascotas", "id_mascota"),
    },
    ForeignKeyDef {
        constraint: "fk_citas_servicio",
        table: "citas",
        column: "id_servicio",
        references: ("servicios", "id_servicio"),
    },
];

fn create_table_sql(table: &TableDef) -> String {
    let cols: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(c.name), c.definition))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quote_ident(table.name),
        cols.join(",\n  ")
    )
}

fn foreign_key_sql(fk: &ForeignKeyDef) -> String {
    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        quote_ident(fk.table),
        quote_ident(fk.constraint),
        quote_ident(fk.column),
        quote_ident(fk.references.0),
        quote_ident(fk.references.1)
    )
}

/// Reconcile the declared catalog against the database.
pub async fn sync(pool: &PgPool, mode: SyncMode) -> Result<(), AppError> {
    if mode == SyncMode::Destructive {
        tracing::warn!("destructive schema sync: dropping and rebuilding every declared table");
        for table in CATALOG.iter().rev() {
            sqlx::query(&format!(
                "DROP TABLE IF EXISTS {} CASCADE",
                quote_ident(table.name)
            ))
            .execute(pool)
            .await?;
        }
    }

    for table in CATALOG {
        sqlx::query(&create_table_sql(table)).execute(pool).await?;
        if mode == SyncMode::Additive {
            // Append columns declared after the table first shipped. Adding a
            // NOT NULL column to a populated table fails; that failure is
            // ignored, same as a column that already exists.
            for c in table.columns {
                let alter = format!(
                    "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {}",
                    quote_ident(table.name),
                    quote_ident(c.name),
                    c.definition
                );
                let _ = sqlx::query(&alter).execute(pool).await;
            }
        }
    }

    // ADD CONSTRAINT has no IF NOT EXISTS; an already-present constraint is
    // an ignorable failure.
    for fk in FOREIGN_KEYS {
        let _ = sqlx::query(&foreign_key_sql(fk)).execute(pool).await;
    }

    tracing::info!(tables = CATALOG.len(), "schema reconciled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_sql_quotes_table_and_columns() {
        let sql = create_table_sql(&CATALOG[0]);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"usuarios\""));
        assert!(sql.contains("\"id_usuario\" BIGSERIAL PRIMARY KEY"));
    }

    #[test]
    fn foreign_key_sql_names_both_sides() {
        let sql = foreign_key_sql(&FOREIGN_KEYS[0]);
        assert!(sql.contains("ALTER TABLE \"mascotas\""));
        assert!(sql.contains("REFERENCES \"propietarios\" (\"id_propietario\")"));
    }

    #[test]
    fn referenced_tables_precede_referencing_tables() {
        let position = |name: &str| {
            CATALOG
                .iter()
                .position(|t| t.name == name)
                .unwrap_or_else(|| panic!("table {} missing from catalog", name))
        };
        for fk in FOREIGN_KEYS {
            assert!(
                position(fk.references.0) < position(fk.table),
                "{} must be declared before {}",
                fk.references.0,
                fk.table
            );
        }
    }

    #[test]
    fn foreign_key_columns_exist_in_catalog() {
        let has_column = |table: &str, column: &str| {
            CATALOG
                .iter()
                .find(|t| t.name == table)
                .map(|t| t.columns.iter().any(|c| c.name == column))
                .unwrap_or(false)
        };
        for fk in FOREIGN_KEYS {
            assert!(has_column(fk.table, fk.column));
            assert!(has_column(fk.references.0, fk.references.1));
        }
    }
}
