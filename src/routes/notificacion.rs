//! Notification routes. The unread-only path is a convenience shortcut over
//! the general per-user listing, not a distinct operation.

use crate::handlers::notificacion::{
    crear, crear_masiva, eliminar, estadisticas, lista, marcar_leida, marcar_todas_leidas,
    no_leidas, por_usuario,
};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn notificacion_routes(state: AppState) -> Router {
    Router::new()
        .route("/lista", get(lista))
        .route("/estadisticas", get(estadisticas))
        .route("/usuario/:idUsuario", get(por_usuario))
        .route("/usuario/:idUsuario/no-leidas", get(no_leidas))
        .route("/crear", post(crear))
        .route("/crear-masiva", post(crear_masiva))
        .route("/marcar-leida/:idNotificacion", put(marcar_leida))
        .route("/marcar-todas-leidas/:idUsuario", put(marcar_todas_leidas))
        .route("/eliminar/:idNotificacion", delete(eliminar))
        .with_state(state)
}
