//! PetPoket backend: veterinary services REST API over hybrid persistence.
//!
//! Structured entity records live in PostgreSQL; flexible per-entity detail
//! documents live in MongoDB, keyed by the relational id cast to string.
//! Sensitive relational columns are stored encrypted.

pub mod config;
pub mod crypto;
pub mod document;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod schema;
pub mod state;
pub mod store;
pub mod validation;

pub use config::{AppConfig, SyncMode};
pub use crypto::{Decrypted, FieldCipher};
pub use document::DocumentStore;
pub use error::AppError;
pub use routes::{common_routes_with_ready, mascota_routes, notificacion_routes, propietario_routes};
pub use state::AppState;
pub use store::{connect_pool, ensure_database_exists};
