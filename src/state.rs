//! Shared application state, built once at startup and injected into every
//! handler. No store adapter is ambient global state.

use crate::crypto::FieldCipher;
use crate::document::DocumentStore;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub documents: DocumentStore,
    pub cipher: FieldCipher,
}
