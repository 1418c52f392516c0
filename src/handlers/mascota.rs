//! Pet controller: the hybrid-persistence entity.
//!
//! Writes fan out to PostgreSQL (encrypted structured row) and MongoDB
//! (supplemental document keyed by the relational id). The two writes are
//! not atomic and there is no compensating rollback: a failed document
//! write leaves an incomplete pet, logged with its relational id. Reads fan
//! in, decrypt-or-default on every sensitive field, and tolerate a missing
//! document half.

use crate::crypto::FieldCipher;
use crate::document::MascotaDetalle;
use crate::error::AppError;
use crate::handlers::{cuerpo_objeto, decodificar};
use crate::models::fecha_local;
use crate::models::mascota::{
    reglas_actualizar, reglas_crear, ActualizarMascota, CrearMascota, MascotaCompleta,
    MascotaFila, PropietarioResumen,
};
use crate::state::AppState;
use crate::validation::RequestValidator;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

const LISTA_SQL: &str = "\
    SELECT m.id_mascota, m.nombre_mascota, m.especie, m.raza, m.edad, m.sexo, \
           m.id_propietario, m.create_mascota, m.update_mascota, \
           p.nombre_propietario, p.email_propietario \
    FROM mascotas m \
    JOIN propietarios p ON m.id_propietario = p.id_propietario \
    ORDER BY m.create_mascota DESC";

const INSERT_SQL: &str = "\
    INSERT INTO mascotas \
        (nombre_mascota, especie, raza, edad, sexo, id_propietario, create_mascota) \
    VALUES ($1, $2, $3, $4, $5, $6, $7) \
    RETURNING id_mascota";

const UPDATE_SQL: &str = "\
    UPDATE mascotas SET \
        nombre_mascota = $1, especie = $2, raza = $3, edad = $4, sexo = $5, \
        update_mascota = $6 \
    WHERE id_mascota = $7";

/// GET /lista — every pet joined with its owner's display fields, merged
/// with the document half. Read-only; a missing document half downgrades to
/// `detallesMongo: null` instead of failing the row.
pub async fn lista(State(state): State<AppState>) -> Result<Json<Vec<MascotaCompleta>>, AppError> {
    let filas: Vec<MascotaFila> = sqlx::query_as(LISTA_SQL).fetch_all(&state.pool).await?;

    let mut mascotas = Vec::with_capacity(filas.len());
    for fila in filas {
        let detalle = state
            .documents
            .buscar_detalle(&fila.id_mascota.to_string())
            .await?;
        mascotas.push(fusionar(&state.cipher, fila, detalle));
    }
    Ok(Json(mascotas))
}

/// POST /crear — validate, encrypt, insert the relational half, then create
/// the document half keyed by the assigned id.
pub async fn crear(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    RequestValidator::validate(cuerpo_objeto(&body)?, &reglas_crear())?;
    let payload: CrearMascota = decodificar(body)?;

    let id_mascota: i64 = sqlx::query_scalar(INSERT_SQL)
        .bind(state.cipher.encrypt(&payload.nombre_mascota))
        .bind(state.cipher.encrypt(&payload.especie))
        .bind(state.cipher.encrypt(payload.raza.as_deref().unwrap_or("")))
        .bind(payload.edad.unwrap_or(0))
        .bind(state.cipher.encrypt(payload.sexo.as_deref().unwrap_or("")))
        .bind(payload.id_propietario)
        .bind(fecha_local())
        .fetch_one(&state.pool)
        .await?;

    let detalle = MascotaDetalle {
        id_mascota_sql: id_mascota.to_string(),
        id_propietario: payload.id_propietario.to_string(),
        observaciones: payload.observaciones.unwrap_or_default(),
        vacunas: payload.vacunas.unwrap_or_default(),
        peso_kg: payload.peso_kg,
        color: payload.color.unwrap_or_default(),
        raza: payload.raza.unwrap_or_default(),
        esterilizado: payload.esterilizado.unwrap_or(false),
        alergias: payload.alergias.unwrap_or_default(),
        chip_identificacion: payload.chip_identificacion.unwrap_or_default(),
        ultima_visita: None,
    };
    if let Err(err) = state.documents.crear_detalle(&detalle).await {
        // Second write of the pair failed: the relational row stays with no
        // rollback or retry, leaving an incomplete pet under this id.
        tracing::error!(id_mascota, error = %err, "document half not created, pet incomplete");
        return Err(AppError::Doc(err));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Mascota creada exitosamente",
            "idMascota": id_mascota,
        })),
    ))
}

/// PUT /actualizar/:id — encrypt and overwrite the mutable relational
/// fields, then upsert the document half. No existence check: an unknown id
/// is a silent relational no-op while the upsert still creates a document
/// record for it.
pub async fn actualizar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    RequestValidator::validate(cuerpo_objeto(&body)?, &reglas_actualizar())?;
    let payload: ActualizarMascota = decodificar(body)?;

    sqlx::query(UPDATE_SQL)
        .bind(state.cipher.encrypt(&payload.nombre_mascota))
        .bind(state.cipher.encrypt(&payload.especie))
        .bind(state.cipher.encrypt(payload.raza.as_deref().unwrap_or("")))
        .bind(payload.edad.unwrap_or(0))
        .bind(state.cipher.encrypt(payload.sexo.as_deref().unwrap_or("")))
        .bind(fecha_local())
        .bind(id)
        .execute(&state.pool)
        .await?;

    let detalle = MascotaDetalle {
        observaciones: payload.observaciones.unwrap_or_default(),
        vacunas: payload.vacunas.unwrap_or_default(),
        peso_kg: payload.peso_kg,
        color: payload.color.unwrap_or_default(),
        raza: payload.raza.unwrap_or_default(),
        esterilizado: payload.esterilizado.unwrap_or(false),
        alergias: payload.alergias.unwrap_or_default(),
        chip_identificacion: payload.chip_identificacion.unwrap_or_default(),
        ..MascotaDetalle::default()
    };
    state.documents.upsert_detalle(&id.to_string(), &detalle).await?;

    Ok(Json(json!({ "message": "Mascota actualizada exitosamente" })))
}

fn fusionar(
    cipher: &FieldCipher,
    fila: MascotaFila,
    detalle: Option<MascotaDetalle>,
) -> MascotaCompleta {
    MascotaCompleta {
        id_mascota: fila.id_mascota,
        nombre_mascota: cipher.decrypt_lossy(&fila.nombre_mascota).into_string(),
        especie: cipher.decrypt_lossy(&fila.especie).into_string(),
        raza: cipher
            .decrypt_lossy(fila.raza.as_deref().unwrap_or(""))
            .into_string(),
        edad: fila.edad,
        sexo: cipher
            .decrypt_lossy(fila.sexo.as_deref().unwrap_or(""))
            .into_string(),
        id_propietario: fila.id_propietario,
        create_mascota: fila.create_mascota,
        update_mascota: fila.update_mascota,
        propietario: PropietarioResumen {
            nombre: cipher.decrypt_lossy(&fila.nombre_propietario).into_string(),
            email: cipher.decrypt_lossy(&fila.email_propietario).into_string(),
        },
        detalles_mongo: detalle.map(Into::into),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fila() -> MascotaFila {
        let cipher = FieldCipher::from_secret("prueba");
        MascotaFila {
            id_mascota: 7,
            nombre_mascota: cipher.encrypt("Rex"),
            especie: cipher.encrypt("Perro"),
            raza: Some(cipher.encrypt("Labrador")),
            edad: 3,
            sexo: Some(cipher.encrypt("macho")),
            id_propietario: 1,
            create_mascota: Some("01/08/2026 10:00:00".into()),
            update_mascota: None,
            nombre_propietario: cipher.encrypt("Ana"),
            email_propietario: cipher.encrypt("ana@example.com"),
        }
    }

    #[test]
    fn merge_decrypts_every_sensitive_field() {
        let cipher = FieldCipher::from_secret("prueba");
        let mascota = fusionar(&cipher, fila(), None);
        assert_eq!(mascota.nombre_mascota, "Rex");
        assert_eq!(mascota.especie, "Perro");
        assert_eq!(mascota.raza, "Labrador");
        assert_eq!(mascota.sexo, "macho");
        assert_eq!(mascota.propietario.nombre, "Ana");
        assert_eq!(mascota.propietario.email, "ana@example.com");
        assert!(mascota.detalles_mongo.is_none());
    }

    #[test]
    fn undecryptable_fields_render_empty_without_failing_the_row() {
        let otra_clave = FieldCipher::from_secret("otra-clave");
        let mascota = fusionar(&otra_clave, fila(), None);
        assert_eq!(mascota.nombre_mascota, "");
        assert_eq!(mascota.propietario.nombre, "");
        assert_eq!(mascota.id_mascota, 7);
    }

    #[test]
    fn document_half_is_carried_into_the_merge() {
        let cipher = FieldCipher::from_secret("prueba");
        let detalle = MascotaDetalle {
            id_mascota_sql: "7".into(),
            vacunas: vec!["rabia".into()],
            raza: "Labrador Retriever".into(),
            ..MascotaDetalle::default()
        };
        let mascota = fusionar(&cipher, fila(), Some(detalle));
        let detalles = mascota.detalles_mongo.unwrap();
        assert_eq!(detalles.vacunas, vec!["rabia".to_string()]);
        assert_eq!(detalles.raza_detallada, "Labrador Retriever");
    }
}
