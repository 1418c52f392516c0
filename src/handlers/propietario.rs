//! Owner controller: the plain relational CRUD shape. Display fields are
//! encrypted on write and decrypt-or-default on read; there is no document
//! half to merge.

use crate::error::AppError;
use crate::handlers::{cuerpo_objeto, decodificar};
use crate::models::fecha_local;
use crate::models::propietario::{reglas_crear, CrearPropietario, PropietarioFila, PropietarioRespuesta};
use crate::state::AppState;
use crate::validation::RequestValidator;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

const LISTA_SQL: &str = "\
    SELECT id_propietario, nombre_propietario, email_propietario, \
           telefono_propietario, direccion_propietario, \
           create_propietario, update_propietario \
    FROM propietarios \
    ORDER BY create_propietario DESC";

const INSERT_SQL: &str = "\
    INSERT INTO propietarios \
        (nombre_propietario, email_propietario, telefono_propietario, \
         direccion_propietario, create_propietario) \
    VALUES ($1, $2, $3, $4, $5) \
    RETURNING id_propietario";

/// GET /lista
pub async fn lista(
    State(state): State<AppState>,
) -> Result<Json<Vec<PropietarioRespuesta>>, AppError> {
    let filas: Vec<PropietarioFila> = sqlx::query_as(LISTA_SQL).fetch_all(&state.pool).await?;
    let propietarios = filas
        .into_iter()
        .map(|fila| PropietarioRespuesta {
            id_propietario: fila.id_propietario,
            nombre_propietario: state.cipher.decrypt_lossy(&fila.nombre_propietario).into_string(),
            email_propietario: state.cipher.decrypt_lossy(&fila.email_propietario).into_string(),
            telefono_propietario: state
                .cipher
                .decrypt_lossy(fila.telefono_propietario.as_deref().unwrap_or(""))
                .into_string(),
            direccion_propietario: state
                .cipher
                .decrypt_lossy(fila.direccion_propietario.as_deref().unwrap_or(""))
                .into_string(),
            create_propietario: fila.create_propietario,
            update_propietario: fila.update_propietario,
        })
        .collect();
    Ok(Json(propietarios))
}

/// POST /crear
pub async fn crear(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    RequestValidator::validate(cuerpo_objeto(&body)?, &reglas_crear())?;
    let payload: CrearPropietario = decodificar(body)?;

    let id_propietario: i64 = sqlx::query_scalar(INSERT_SQL)
        .bind(state.cipher.encrypt(&payload.nombre_propietario))
        .bind(state.cipher.encrypt(&payload.email_propietario))
        .bind(state.cipher.encrypt(payload.telefono_propietario.as_deref().unwrap_or("")))
        .bind(state.cipher.encrypt(payload.direccion_propietario.as_deref().unwrap_or("")))
        .bind(fecha_local())
        .fetch_one(&state.pool)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Propietario creado exitosamente",
            "idPropietario": id_propietario,
        })),
    ))
}
