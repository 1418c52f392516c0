//! Typed errors and HTTP mapping.
//!
//! Wire contract: validation failures are 400 with `{message}`; every other
//! failure (store errors, missing records) is 500 with `{message, error}`.
//! Request errors never crash the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("no encontrado: {0}")]
    NotFound(String),
    #[error("base de datos: {0}")]
    Db(#[from] sqlx::Error),
    #[error("almacén de documentos: {0}")]
    Doc(#[from] mongodb::error::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Recurso no encontrado".to_string())
            }
            AppError::Db(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error al procesar la solicitud".to_string())
            }
            AppError::Doc(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error al procesar la solicitud".to_string())
            }
        };
        let error = if status == StatusCode::BAD_REQUEST {
            None
        } else {
            tracing::error!(error = %self, "request failed");
            Some(self.to_string())
        };
        (status, Json(ErrorBody { message, error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request_without_detail() {
        let response = AppError::Validation("El mensaje es obligatorio".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_errors_map_to_internal_error() {
        let response = AppError::Db(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_maps_to_internal_error() {
        let response = AppError::NotFound("notificación 99".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
