//! Notification controller. Plain relational records, no encryption, no
//! document half; the bulk create runs inside one relational transaction.

use crate::error::AppError;
use crate::handlers::{cuerpo_objeto, decodificar, validar_id_positivo};
use crate::models::fecha_local;
use crate::models::notificacion::{
    reglas_crear, reglas_masiva, ConteoPorTipo, CrearNotificacion, Estadisticas,
    NotificacionFila, NotificacionMasiva, ESTADO_LEIDA, ESTADO_PENDIENTE,
};
use crate::state::AppState;
use crate::validation::RequestValidator;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;

const COLUMNAS: &str = "id_notificacion, id_usuario, mensaje, tipo, estado, \
     create_notificacion, update_notificacion";

const INSERT_SQL: &str = "\
    INSERT INTO notificaciones (id_usuario, mensaje, tipo, create_notificacion) \
    VALUES ($1, $2, $3, $4) \
    RETURNING id_notificacion";

/// GET /lista — every notification, newest first.
pub async fn lista(
    State(state): State<AppState>,
) -> Result<Json<Vec<NotificacionFila>>, AppError> {
    let sql = format!(
        "SELECT {} FROM notificaciones ORDER BY id_notificacion DESC",
        COLUMNAS
    );
    let filas: Vec<NotificacionFila> = sqlx::query_as(&sql).fetch_all(&state.pool).await?;
    Ok(Json(filas))
}

/// GET /estadisticas — totals overall, by read state, and by type.
pub async fn estadisticas(State(state): State<AppState>) -> Result<Json<Estadisticas>, AppError> {
    let (total, pendientes, leidas): (i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), \
                COUNT(*) FILTER (WHERE estado = $1), \
                COUNT(*) FILTER (WHERE estado = $2) \
         FROM notificaciones",
    )
    .bind(ESTADO_PENDIENTE)
    .bind(ESTADO_LEIDA)
    .fetch_one(&state.pool)
    .await?;

    let por_tipo: Vec<ConteoPorTipo> = sqlx::query_as(
        "SELECT tipo, COUNT(*) AS total FROM notificaciones GROUP BY tipo ORDER BY tipo",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(Estadisticas { total, pendientes, leidas, por_tipo }))
}

/// GET /usuario/:idUsuario — one user's notifications, optionally filtered
/// by `?estado=`.
pub async fn por_usuario(
    State(state): State<AppState>,
    Path(id_usuario): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<NotificacionFila>>, AppError> {
    validar_id_positivo(id_usuario, "idUsuario")?;
    listar_por_usuario(&state, id_usuario, params.get("estado").map(String::as_str)).await
}

/// GET /usuario/:idUsuario/no-leidas — injects `estado=pendiente` into the
/// query parameters and delegates to the general per-user listing.
pub async fn no_leidas(
    State(state): State<AppState>,
    Path(id_usuario): Path<i64>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<NotificacionFila>>, AppError> {
    validar_id_positivo(id_usuario, "idUsuario")?;
    params.insert("estado".into(), ESTADO_PENDIENTE.into());
    listar_por_usuario(&state, id_usuario, params.get("estado").map(String::as_str)).await
}

async fn listar_por_usuario(
    state: &AppState,
    id_usuario: i64,
    estado: Option<&str>,
) -> Result<Json<Vec<NotificacionFila>>, AppError> {
    let filas: Vec<NotificacionFila> = match estado {
        Some(estado) => {
            let sql = format!(
                "SELECT {} FROM notificaciones \
                 WHERE id_usuario = $1 AND estado = $2 \
                 ORDER BY id_notificacion DESC",
                COLUMNAS
            );
            sqlx::query_as(&sql)
                .bind(id_usuario)
                .bind(estado)
                .fetch_all(&state.pool)
                .await?
        }
        None => {
            let sql = format!(
                "SELECT {} FROM notificaciones \
                 WHERE id_usuario = $1 \
                 ORDER BY id_notificacion DESC",
                COLUMNAS
            );
            sqlx::query_as(&sql).bind(id_usuario).fetch_all(&state.pool).await?
        }
    };
    Ok(Json(filas))
}

/// POST /crear
pub async fn crear(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    RequestValidator::validate(cuerpo_objeto(&body)?, &reglas_crear())?;
    let payload: CrearNotificacion = decodificar(body)?;

    let id_notificacion: i64 = sqlx::query_scalar(INSERT_SQL)
        .bind(payload.id_usuario)
        .bind(&payload.mensaje)
        .bind(payload.tipo.as_deref().unwrap_or("general"))
        .bind(fecha_local())
        .fetch_one(&state.pool)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Notificación creada exitosamente",
            "idNotificacion": id_notificacion,
        })),
    ))
}

/// POST /crear-masiva — one row per target user, all inside a single
/// transaction: either every user gets the notification or none does.
pub async fn crear_masiva(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    RequestValidator::validate(cuerpo_objeto(&body)?, &reglas_masiva())?;
    let payload: NotificacionMasiva = decodificar(body)?;

    let tipo = payload.tipo.as_deref().unwrap_or("general");
    let fecha = fecha_local();
    let mut ids = Vec::with_capacity(payload.usuarios.len());
    let mut tx = state.pool.begin().await?;
    for id_usuario in &payload.usuarios {
        let id: i64 = sqlx::query_scalar(INSERT_SQL)
            .bind(id_usuario)
            .bind(&payload.mensaje)
            .bind(tipo)
            .bind(&fecha)
            .fetch_one(&mut *tx)
            .await?;
        ids.push(id);
    }
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Notificaciones creadas exitosamente",
            "total": ids.len(),
            "idsNotificaciones": ids,
        })),
    ))
}

/// PUT /marcar-leida/:idNotificacion
pub async fn marcar_leida(
    State(state): State<AppState>,
    Path(id_notificacion): Path<i64>,
) -> Result<Json<Value>, AppError> {
    validar_id_positivo(id_notificacion, "idNotificacion")?;
    let result = sqlx::query(
        "UPDATE notificaciones SET estado = $1, update_notificacion = $2 \
         WHERE id_notificacion = $3",
    )
    .bind(ESTADO_LEIDA)
    .bind(fecha_local())
    .bind(id_notificacion)
    .execute(&state.pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("notificación {}", id_notificacion)));
    }
    Ok(Json(json!({ "message": "Notificación marcada como leída" })))
}

/// PUT /marcar-todas-leidas/:idUsuario
pub async fn marcar_todas_leidas(
    State(state): State<AppState>,
    Path(id_usuario): Path<i64>,
) -> Result<Json<Value>, AppError> {
    validar_id_positivo(id_usuario, "idUsuario")?;
    let result = sqlx::query(
        "UPDATE notificaciones SET estado = $1, update_notificacion = $2 \
         WHERE id_usuario = $3 AND estado = $4",
    )
    .bind(ESTADO_LEIDA)
    .bind(fecha_local())
    .bind(id_usuario)
    .bind(ESTADO_PENDIENTE)
    .execute(&state.pool)
    .await?;
    Ok(Json(json!({
        "message": "Notificaciones marcadas como leídas",
        "actualizadas": result.rows_affected(),
    })))
}

/// DELETE /eliminar/:idNotificacion
pub async fn eliminar(
    State(state): State<AppState>,
    Path(id_notificacion): Path<i64>,
) -> Result<Json<Value>, AppError> {
    validar_id_positivo(id_notificacion, "idNotificacion")?;
    let result = sqlx::query("DELETE FROM notificaciones WHERE id_notificacion = $1")
        .bind(id_notificacion)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("notificación {}", id_notificacion)));
    }
    Ok(Json(json!({ "message": "Notificación eliminada exitosamente" })))
}
