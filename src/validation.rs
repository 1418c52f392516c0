//! Declarative request validation.
//!
//! Each write route carries an ordered rule list evaluated before the
//! controller runs; the first violation short-circuits with a client error
//! and no store is touched.

use crate::error::AppError;
use regex::Regex;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default)]
pub struct ValidationRule {
    pub required: Option<bool>,
    /// Value must be a JSON integer.
    pub integer: Option<bool>,
    pub format: Option<String>,
    pub max_length: Option<u32>,
    pub min_length: Option<u32>,
    pub pattern: Option<String>,
    pub allowed: Option<Vec<Value>>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// Value must be an array with at least this many elements.
    pub min_items: Option<u32>,
    /// Rule applied to every element of an array value.
    pub each: Option<Box<ValidationRule>>,
}

/// Ordered field rules for one route.
pub type RuleSet = Vec<(&'static str, ValidationRule)>;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a JSON body against a rule list. Rules run in declaration
    /// order; required fields must be present and non-null.
    pub fn validate(body: &Map<String, Value>, rules: &[(&'static str, ValidationRule)]) -> Result<(), AppError> {
        for (campo, rule) in rules {
            let val = body.get(*campo);
            if rule.required == Some(true) && (val.is_none() || val == Some(&Value::Null)) {
                return Err(AppError::Validation(format!("{} es obligatorio", campo)));
            }
            if let Some(v) = val {
                validate_field(campo, v, rule)?;
            }
        }
        Ok(())
    }
}

fn validate_field(campo: &str, v: &Value, rule: &ValidationRule) -> Result<(), AppError> {
    if v.is_null() {
        return Ok(());
    }
    if rule.integer == Some(true) && v.as_i64().is_none() {
        return Err(AppError::Validation(format!(
            "{} debe ser un número entero",
            campo
        )));
    }
    if let Some(format) = &rule.format {
        validate_format(campo, v, format)?;
    }
    if let Some(min) = rule.min_length {
        if let Some(s) = v.as_str() {
            if s.chars().count() < min as usize {
                return Err(AppError::Validation(format!(
                    "{} debe tener al menos {} caracteres",
                    campo, min
                )));
            }
        }
    }
    if let Some(max) = rule.max_length {
        if let Some(s) = v.as_str() {
            if s.chars().count() > max as usize {
                return Err(AppError::Validation(format!(
                    "{} debe tener como máximo {} caracteres",
                    campo, max
                )));
            }
        }
    }
    if let Some(pattern) = &rule.pattern {
        let re = Regex::new(pattern)
            .map_err(|_| AppError::Validation(format!("patrón inválido para {}", campo)))?;
        if let Some(s) = v.as_str() {
            if !re.is_match(s) {
                return Err(AppError::Validation(format!(
                    "{} no tiene el formato esperado",
                    campo
                )));
            }
        }
    }
    if let Some(allowed) = &rule.allowed {
        if !allowed.iter().any(|a| value_eq(v, a)) {
            let opciones: Vec<String> = allowed.iter().map(display_value).collect();
            return Err(AppError::Validation(format!(
                "{} debe ser uno de: {}",
                campo,
                opciones.join(", ")
            )));
        }
    }
    if let Some(min) = rule.minimum {
        if let Some(n) = v.as_f64() {
            if n < min {
                return Err(AppError::Validation(format!(
                    "{} debe ser al menos {}",
                    campo, min
                )));
            }
        }
    }
    if let Some(max) = rule.maximum {
        if let Some(n) = v.as_f64() {
            if n > max {
                return Err(AppError::Validation(format!(
                    "{} debe ser como máximo {}",
                    campo, max
                )));
            }
        }
    }
    if let Some(min_items) = rule.min_items {
        let len = v.as_array().map(Vec::len);
        if len.is_none() || len < Some(min_items as usize) {
            return Err(AppError::Validation(format!(
                "{} debe ser un arreglo con al menos {} elemento(s)",
                campo, min_items
            )));
        }
    }
    if let Some(each) = &rule.each {
        if let Some(items) = v.as_array() {
            for item in items {
                validate_field(campo, item, each)?;
            }
        }
    }
    Ok(())
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        _ => a == b,
    }
}

fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn validate_format(campo: &str, v: &Value, format: &str) -> Result<(), AppError> {
    if format.eq_ignore_ascii_case("email") {
        if let Some(s) = v.as_str() {
            if !s.contains('@') || s.len() < 3 {
                return Err(AppError::Validation(format!(
                    "{} debe ser un email válido",
                    campo
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    fn requerido() -> ValidationRule {
        ValidationRule { required: Some(true), ..Default::default() }
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let rules = vec![("especie", requerido())];
        let err = RequestValidator::validate(&body(json!({"nombreMascota": "Rex"})), &rules)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "especie es obligatorio"));
    }

    #[test]
    fn null_counts_as_missing() {
        let rules = vec![("especie", requerido())];
        assert!(RequestValidator::validate(&body(json!({"especie": null})), &rules).is_err());
    }

    #[test]
    fn empty_array_fails_min_items() {
        let rules = vec![(
            "usuarios",
            ValidationRule { required: Some(true), min_items: Some(1), ..Default::default() },
        )];
        assert!(RequestValidator::validate(&body(json!({"usuarios": []})), &rules).is_err());
        assert!(RequestValidator::validate(&body(json!({"usuarios": [1]})), &rules).is_ok());
    }

    #[test]
    fn non_array_fails_min_items() {
        let rules = vec![(
            "usuarios",
            ValidationRule { min_items: Some(1), ..Default::default() },
        )];
        assert!(RequestValidator::validate(&body(json!({"usuarios": "1,2"})), &rules).is_err());
    }

    #[test]
    fn each_rule_applies_to_elements() {
        let each = ValidationRule { integer: Some(true), minimum: Some(1.0), ..Default::default() };
        let rules = vec![(
            "usuarios",
            ValidationRule { min_items: Some(1), each: Some(Box::new(each)), ..Default::default() },
        )];
        assert!(RequestValidator::validate(&body(json!({"usuarios": [1, 2]})), &rules).is_ok());
        assert!(RequestValidator::validate(&body(json!({"usuarios": [1, 0]})), &rules).is_err());
        assert!(RequestValidator::validate(&body(json!({"usuarios": [1, "2"]})), &rules).is_err());
    }

    #[test]
    fn enum_membership() {
        let rules = vec![(
            "tipo",
            ValidationRule {
                allowed: Some(vec![json!("general"), json!("urgente")]),
                ..Default::default()
            },
        )];
        assert!(RequestValidator::validate(&body(json!({"tipo": "general"})), &rules).is_ok());
        assert!(RequestValidator::validate(&body(json!({"tipo": "spam"})), &rules).is_err());
        // Optional field: absent is fine.
        assert!(RequestValidator::validate(&body(json!({})), &rules).is_ok());
    }

    #[test]
    fn length_bounds() {
        let rules = vec![(
            "mensaje",
            ValidationRule {
                required: Some(true),
                min_length: Some(1),
                max_length: Some(5),
                ..Default::default()
            },
        )];
        assert!(RequestValidator::validate(&body(json!({"mensaje": "hola"})), &rules).is_ok());
        assert!(RequestValidator::validate(&body(json!({"mensaje": ""})), &rules).is_err());
        assert!(RequestValidator::validate(&body(json!({"mensaje": "demasiado"})), &rules).is_err());
    }

    #[test]
    fn integer_with_minimum() {
        let rules = vec![(
            "idUsuario",
            ValidationRule {
                required: Some(true),
                integer: Some(true),
                minimum: Some(1.0),
                ..Default::default()
            },
        )];
        assert!(RequestValidator::validate(&body(json!({"idUsuario": 4})), &rules).is_ok());
        assert!(RequestValidator::validate(&body(json!({"idUsuario": 0})), &rules).is_err());
        assert!(RequestValidator::validate(&body(json!({"idUsuario": "4"})), &rules).is_err());
    }

    #[test]
    fn pattern_rule() {
        let rules = vec![(
            "chipIdentificacion",
            ValidationRule { pattern: Some("^[0-9A-Za-z-]*$".into()), ..Default::default() },
        )];
        assert!(RequestValidator::validate(&body(json!({"chipIdentificacion": "CHIP-99"})), &rules).is_ok());
        assert!(RequestValidator::validate(&body(json!({"chipIdentificacion": "chip 99"})), &rules).is_err());
    }
}
