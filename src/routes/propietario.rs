//! Owner routes.

use crate::handlers::propietario::{crear, lista};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn propietario_routes(state: AppState) -> Router {
    Router::new()
        .route("/lista", get(lista))
        .route("/crear", post(crear))
        .with_state(state)
}
