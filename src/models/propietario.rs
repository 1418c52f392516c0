//! Owner types. Owners are a plain relational entity (no document half),
//! but their display fields are stored encrypted like any other sensitive
//! column.

use crate::validation::{RuleSet, ValidationRule};
use serde::{Deserialize, Serialize};

#[derive(Debug, sqlx::FromRow)]
pub struct PropietarioFila {
    pub id_propietario: i64,
    pub nombre_propietario: String,
    pub email_propietario: String,
    pub telefono_propietario: Option<String>,
    pub direccion_propietario: Option<String>,
    pub create_propietario: Option<String>,
    pub update_propietario: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropietarioRespuesta {
    pub id_propietario: i64,
    pub nombre_propietario: String,
    pub email_propietario: String,
    pub telefono_propietario: String,
    pub direccion_propietario: String,
    pub create_propietario: Option<String>,
    pub update_propietario: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrearPropietario {
    pub nombre_propietario: String,
    pub email_propietario: String,
    pub telefono_propietario: Option<String>,
    pub direccion_propietario: Option<String>,
}

pub fn reglas_crear() -> RuleSet {
    vec![
        (
            "nombrePropietario",
            ValidationRule { required: Some(true), ..Default::default() },
        ),
        (
            "emailPropietario",
            ValidationRule {
                required: Some(true),
                format: Some("email".into()),
                ..Default::default()
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::RequestValidator;
    use serde_json::json;

    #[test]
    fn email_format_is_enforced() {
        let body = json!({"nombrePropietario": "Ana", "emailPropietario": "sin-arroba"});
        assert!(RequestValidator::validate(body.as_object().unwrap(), &reglas_crear()).is_err());

        let body = json!({"nombrePropietario": "Ana", "emailPropietario": "ana@example.com"});
        assert!(RequestValidator::validate(body.as_object().unwrap(), &reglas_crear()).is_ok());
    }
}
