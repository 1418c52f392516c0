//! Pet routes. Write paths validate against the rule sets declared in
//! `models::mascota` before the controller runs.

use crate::handlers::mascota::{actualizar, crear, lista};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn mascota_routes(state: AppState) -> Router {
    Router::new()
        .route("/lista", get(lista))
        .route("/crear", post(crear))
        .route("/actualizar/:id", put(actualizar))
        .with_state(state)
}
