//! Notification types and rule sets. Notifications are plaintext relational
//! records; nothing here is encrypted and there is no document half.

use crate::validation::{RuleSet, ValidationRule};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const TIPOS_NOTIFICACION: &[&str] =
    &["general", "recordatorio", "urgente", "promocion", "sistema"];

pub const ESTADO_PENDIENTE: &str = "pendiente";
pub const ESTADO_LEIDA: &str = "leida";

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NotificacionFila {
    pub id_notificacion: i64,
    pub id_usuario: i64,
    pub mensaje: String,
    pub tipo: String,
    pub estado: String,
    pub create_notificacion: Option<String>,
    pub update_notificacion: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrearNotificacion {
    pub id_usuario: i64,
    pub mensaje: String,
    pub tipo: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificacionMasiva {
    pub mensaje: String,
    pub usuarios: Vec<i64>,
    pub tipo: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ConteoPorTipo {
    pub tipo: String,
    pub total: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estadisticas {
    pub total: i64,
    pub pendientes: i64,
    pub leidas: i64,
    pub por_tipo: Vec<ConteoPorTipo>,
}

fn regla_mensaje() -> ValidationRule {
    ValidationRule {
        required: Some(true),
        min_length: Some(1),
        max_length: Some(500),
        ..Default::default()
    }
}

fn regla_tipo() -> ValidationRule {
    ValidationRule {
        allowed: Some(TIPOS_NOTIFICACION.iter().map(|t| json!(t)).collect()),
        ..Default::default()
    }
}

fn regla_id_positivo() -> ValidationRule {
    ValidationRule {
        required: Some(true),
        integer: Some(true),
        minimum: Some(1.0),
        ..Default::default()
    }
}

pub fn reglas_crear() -> RuleSet {
    vec![
        ("idUsuario", regla_id_positivo()),
        ("mensaje", regla_mensaje()),
        ("tipo", regla_tipo()),
    ]
}

pub fn reglas_masiva() -> RuleSet {
    vec![
        ("mensaje", regla_mensaje()),
        (
            "usuarios",
            ValidationRule {
                required: Some(true),
                min_items: Some(1),
                each: Some(Box::new(ValidationRule {
                    integer: Some(true),
                    minimum: Some(1.0),
                    ..Default::default()
                })),
                ..Default::default()
            },
        ),
        ("tipo", regla_tipo()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::RequestValidator;

    #[test]
    fn empty_usuarios_array_is_rejected_before_the_controller() {
        let body = json!({"mensaje": "Campaña de vacunación", "usuarios": []});
        assert!(RequestValidator::validate(body.as_object().unwrap(), &reglas_masiva()).is_err());
    }

    #[test]
    fn valid_bulk_payload_passes() {
        let body = json!({"mensaje": "Campaña de vacunación", "usuarios": [1, 2, 3], "tipo": "promocion"});
        RequestValidator::validate(body.as_object().unwrap(), &reglas_masiva()).unwrap();
        let payload: NotificacionMasiva = serde_json::from_value(body).unwrap();
        assert_eq!(payload.usuarios, vec![1, 2, 3]);
    }

    #[test]
    fn tipo_outside_catalog_is_rejected() {
        let body = json!({"idUsuario": 1, "mensaje": "hola", "tipo": "spam"});
        assert!(RequestValidator::validate(body.as_object().unwrap(), &reglas_crear()).is_err());
    }

    #[test]
    fn mensaje_over_500_chars_is_rejected() {
        let body = json!({"idUsuario": 1, "mensaje": "x".repeat(501)});
        assert!(RequestValidator::validate(body.as_object().unwrap(), &reglas_crear()).is_err());
    }
}
