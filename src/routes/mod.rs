//! Routers: method + path → controller maps, one file per entity.

mod common;
mod mascota;
mod notificacion;
mod propietario;

pub use common::common_routes_with_ready;
pub use mascota::mascota_routes;
pub use notificacion::notificacion_routes;
pub use propietario::propietario_routes;
