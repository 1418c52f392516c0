//! Entity controllers.

pub mod mascota;
pub mod notificacion;
pub mod propietario;

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub(crate) fn cuerpo_objeto(body: &Value) -> Result<&Map<String, Value>, AppError> {
    body.as_object()
        .ok_or_else(|| AppError::Validation("el cuerpo debe ser un objeto JSON".into()))
}

/// Deserialize a validated body into its typed payload. A mismatch at this
/// point is still a client error, not a server fault.
pub(crate) fn decodificar<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("cuerpo inválido: {}", e)))
}

/// Path-parameter counterpart of the body rules: ids must be positive.
pub(crate) fn validar_id_positivo(valor: i64, nombre: &str) -> Result<(), AppError> {
    if valor < 1 {
        return Err(AppError::Validation(format!(
            "{} debe ser un número entero positivo",
            nombre
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_body_is_a_validation_error() {
        assert!(cuerpo_objeto(&json!([1, 2])).is_err());
        assert!(cuerpo_objeto(&json!({"a": 1})).is_ok());
    }

    #[test]
    fn ids_must_be_positive() {
        assert!(validar_id_positivo(1, "idUsuario").is_ok());
        assert!(validar_id_positivo(0, "idUsuario").is_err());
        assert!(validar_id_positivo(-3, "idUsuario").is_err());
    }
}
