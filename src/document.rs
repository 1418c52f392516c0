//! MongoDB adapter for per-entity supplemental documents.
//!
//! Documents are addressed by the relational identifier cast to string
//! (`idMascotaSql`), a soft foreign key enforced by neither store. Every
//! field carries a serde default so a sparse document decodes to empty
//! string / empty list / null, never an absent field.

use mongodb::bson::doc;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

/// Supplemental pet record. The relational row owns identity; this document
/// has none of its own.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MascotaDetalle {
    pub id_mascota_sql: String,
    pub id_propietario: String,
    pub observaciones: String,
    pub vacunas: Vec<String>,
    pub peso_kg: Option<f64>,
    pub color: String,
    pub raza: String,
    pub esterilizado: bool,
    pub alergias: Vec<String>,
    pub chip_identificacion: String,
    pub ultima_visita: Option<String>,
}

#[derive(Clone)]
pub struct DocumentStore {
    mascotas: Collection<MascotaDetalle>,
}

impl DocumentStore {
    /// Connect lazily; the driver establishes connections on first use.
    pub async fn connect(uri: &str) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(uri).await?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database("petpoket"));
        Ok(DocumentStore {
            mascotas: db.collection("detalles_mascota"),
        })
    }

    pub async fn crear_detalle(
        &self,
        detalle: &MascotaDetalle,
    ) -> Result<(), mongodb::error::Error> {
        self.mascotas.insert_one(detalle).await?;
        Ok(())
    }

    pub async fn buscar_detalle(
        &self,
        id_mascota: &str,
    ) -> Result<Option<MascotaDetalle>, mongodb::error::Error> {
        self.mascotas
            .find_one(doc! { "idMascotaSql": id_mascota })
            .await
    }

    /// Overwrite the supplemental fields for one relational id, creating the
    /// document if absent. The upsert keys the new document by the filter,
    /// so a previously missing half comes into existence here.
    pub async fn upsert_detalle(
        &self,
        id_mascota: &str,
        detalle: &MascotaDetalle,
    ) -> Result<(), mongodb::error::Error> {
        let campos = doc! {
            "$set": {
                "observaciones": detalle.observaciones.as_str(),
                "vacunas": detalle.vacunas.clone(),
                "pesoKg": detalle.peso_kg,
                "color": detalle.color.as_str(),
                "raza": detalle.raza.as_str(),
                "esterilizado": detalle.esterilizado,
                "alergias": detalle.alergias.clone(),
                "chipIdentificacion": detalle.chip_identificacion.as_str(),
            }
        };
        self.mascotas
            .update_one(doc! { "idMascotaSql": id_mascota }, campos)
            .upsert(true)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_document_decodes_with_defaults() {
        let detalle: MascotaDetalle =
            serde_json::from_str(r#"{"idMascotaSql":"7"}"#).unwrap();
        assert_eq!(detalle.id_mascota_sql, "7");
        assert_eq!(detalle.observaciones, "");
        assert!(detalle.vacunas.is_empty());
        assert!(detalle.alergias.is_empty());
        assert_eq!(detalle.peso_kg, None);
        assert!(!detalle.esterilizado);
        assert_eq!(detalle.ultima_visita, None);
    }

    #[test]
    fn wire_names_are_camel_case() {
        let detalle = MascotaDetalle {
            id_mascota_sql: "3".into(),
            peso_kg: Some(12.5),
            chip_identificacion: "CHIP-01".into(),
            ..MascotaDetalle::default()
        };
        let json = serde_json::to_value(&detalle).unwrap();
        assert_eq!(json["idMascotaSql"], "3");
        assert_eq!(json["pesoKg"], 12.5);
        assert_eq!(json["chipIdentificacion"], "CHIP-01");
        assert_eq!(json["ultimaVisita"], serde_json::Value::Null);
    }
}
