//! PetPoket server: wires configuration, both stores, and the routers.
//!
//! Startup order: ensure the database exists, build the pool, probe
//! connectivity, reconcile the schema (failures logged, never fatal), open
//! the document store, then serve.

use axum::Router;
use petpoket_backend::{
    common_routes_with_ready, mascota_routes, notificacion_routes, propietario_routes, schema,
    store, AppConfig, AppState, DocumentStore, FieldCipher,
};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

const MAX_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("petpoket_backend=info".parse()?),
        )
        .init();

    let config = AppConfig::from_env();
    let database_url = config.database.connection_url();

    store::ensure_database_exists(&database_url).await?;
    let pool = store::connect_pool(&database_url).await?;
    match store::check_connectivity(&pool).await {
        Ok(()) => tracing::info!("relational store connection established"),
        Err(err) => tracing::error!(error = %err, "relational store unreachable"),
    }

    if let Err(err) = schema::sync(&pool, config.sync_mode).await {
        // The process keeps serving against a possibly unsynced schema.
        tracing::error!(error = %err, "schema reconciliation failed");
    }

    let documents = DocumentStore::connect(&config.mongodb_uri).await?;
    let cipher = FieldCipher::from_secret(&config.field_secret);
    let state = AppState { pool, documents, cipher };

    let app = Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/mascotas", mascota_routes(state.clone()))
        .nest("/propietarios", propietario_routes(state.clone()))
        .nest("/notificaciones", notificacion_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
