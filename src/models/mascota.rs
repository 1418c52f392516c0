//! Pet types: the relational half, the merged response, and the write
//! payloads with their validation rules.

use crate::document::MascotaDetalle;
use crate::validation::{RuleSet, ValidationRule};
use serde::{Deserialize, Serialize};

/// Row from the pet/owner join. Encrypted columns hold ciphertext here;
/// decryption happens in the controller.
#[derive(Debug, sqlx::FromRow)]
pub struct MascotaFila {
    pub id_mascota: i64,
    pub nombre_mascota: String,
    pub especie: String,
    pub raza: Option<String>,
    pub edad: i32,
    pub sexo: Option<String>,
    pub id_propietario: i64,
    pub create_mascota: Option<String>,
    pub update_mascota: Option<String>,
    pub nombre_propietario: String,
    pub email_propietario: String,
}

#[derive(Debug, Serialize)]
pub struct PropietarioResumen {
    pub nombre: String,
    pub email: String,
}

/// Supplemental fields as they appear in the merged response. `raza` from
/// the document store surfaces as `razaDetallada`, next to the decrypted
/// relational `raza`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetalleMascotaRespuesta {
    pub observaciones: String,
    pub vacunas: Vec<String>,
    pub peso_kg: Option<f64>,
    pub color: String,
    pub raza_detallada: String,
    pub esterilizado: bool,
    pub alergias: Vec<String>,
    pub chip_identificacion: String,
    pub ultima_visita: Option<String>,
}

impl From<MascotaDetalle> for DetalleMascotaRespuesta {
    fn from(d: MascotaDetalle) -> Self {
        DetalleMascotaRespuesta {
            observaciones: d.observaciones,
            vacunas: d.vacunas,
            peso_kg: d.peso_kg,
            color: d.color,
            raza_detallada: d.raza,
            esterilizado: d.esterilizado,
            alergias: d.alergias,
            chip_identificacion: d.chip_identificacion,
            ultima_visita: d.ultima_visita,
        }
    }
}

/// One fully merged pet: decrypted relational fields, owner display fields,
/// and the document half. `detallesMongo` is null when the document half is
/// missing; that is a tolerated state, not an error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MascotaCompleta {
    pub id_mascota: i64,
    pub nombre_mascota: String,
    pub especie: String,
    pub raza: String,
    pub edad: i32,
    pub sexo: String,
    pub id_propietario: i64,
    pub create_mascota: Option<String>,
    pub update_mascota: Option<String>,
    pub propietario: PropietarioResumen,
    pub detalles_mongo: Option<DetalleMascotaRespuesta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrearMascota {
    pub nombre_mascota: String,
    pub especie: String,
    pub raza: Option<String>,
    pub edad: Option<i32>,
    pub sexo: Option<String>,
    pub id_propietario: i64,
    pub observaciones: Option<String>,
    pub vacunas: Option<Vec<String>>,
    pub peso_kg: Option<f64>,
    pub color: Option<String>,
    pub esterilizado: Option<bool>,
    pub alergias: Option<Vec<String>>,
    pub chip_identificacion: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarMascota {
    pub nombre_mascota: String,
    pub especie: String,
    pub raza: Option<String>,
    pub edad: Option<i32>,
    pub sexo: Option<String>,
    pub observaciones: Option<String>,
    pub vacunas: Option<Vec<String>>,
    pub peso_kg: Option<f64>,
    pub color: Option<String>,
    pub esterilizado: Option<bool>,
    pub alergias: Option<Vec<String>>,
    pub chip_identificacion: Option<String>,
}

pub fn reglas_crear() -> RuleSet {
    let mut reglas = reglas_comunes();
    reglas.push((
        "idPropietario",
        ValidationRule {
            required: Some(true),
            integer: Some(true),
            minimum: Some(1.0),
            ..Default::default()
        },
    ));
    reglas
}

pub fn reglas_actualizar() -> RuleSet {
    reglas_comunes()
}

fn reglas_comunes() -> RuleSet {
    vec![
        (
            "nombreMascota",
            ValidationRule { required: Some(true), ..Default::default() },
        ),
        (
            "especie",
            ValidationRule { required: Some(true), ..Default::default() },
        ),
        (
            "edad",
            ValidationRule { integer: Some(true), minimum: Some(0.0), ..Default::default() },
        ),
        (
            "pesoKg",
            ValidationRule { minimum: Some(0.0), ..Default::default() },
        ),
        (
            "chipIdentificacion",
            ValidationRule { pattern: Some("^[0-9A-Za-z-]*$".into()), ..Default::default() },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::RequestValidator;
    use serde_json::json;

    #[test]
    fn missing_especie_is_rejected_before_any_store_touch() {
        let body = json!({"nombreMascota": "Rex", "idPropietario": 1});
        let err = RequestValidator::validate(body.as_object().unwrap(), &reglas_crear());
        assert!(err.is_err());
    }

    #[test]
    fn minimal_create_payload_passes_and_deserializes() {
        let body = json!({"nombreMascota": "Rex", "especie": "Perro", "idPropietario": 1});
        RequestValidator::validate(body.as_object().unwrap(), &reglas_crear()).unwrap();
        let payload: CrearMascota = serde_json::from_value(body).unwrap();
        assert_eq!(payload.nombre_mascota, "Rex");
        assert_eq!(payload.id_propietario, 1);
        assert_eq!(payload.raza, None);
        assert_eq!(payload.vacunas, None);
    }

    #[test]
    fn non_integer_owner_is_rejected() {
        let body = json!({"nombreMascota": "Rex", "especie": "Perro", "idPropietario": "1"});
        assert!(RequestValidator::validate(body.as_object().unwrap(), &reglas_crear()).is_err());
    }

    #[test]
    fn missing_document_half_serializes_as_null() {
        let mascota = MascotaCompleta {
            id_mascota: 7,
            nombre_mascota: "Rex".into(),
            especie: "Perro".into(),
            raza: String::new(),
            edad: 3,
            sexo: String::new(),
            id_propietario: 1,
            create_mascota: Some("01/08/2026 10:00:00".into()),
            update_mascota: None,
            propietario: PropietarioResumen { nombre: "Ana".into(), email: "ana@example.com".into() },
            detalles_mongo: None,
        };
        let json = serde_json::to_value(&mascota).unwrap();
        assert_eq!(json["detallesMongo"], serde_json::Value::Null);
        assert_eq!(json["nombreMascota"], "Rex");
        assert_eq!(json["propietario"]["nombre"], "Ana");
    }

    #[test]
    fn document_half_maps_raza_to_raza_detallada() {
        let detalle = MascotaDetalle {
            raza: "Labrador".into(),
            ..MascotaDetalle::default()
        };
        let respuesta = DetalleMascotaRespuesta::from(detalle);
        let json = serde_json::to_value(&respuesta).unwrap();
        assert_eq!(json["razaDetallada"], "Labrador");
    }
}
