//! PostgreSQL pool construction and database bootstrap.

use crate::error::AppError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// Build the shared connection pool. Bounds: 5–20 connections, 30 s acquire
/// timeout, 10 s idle timeout.
pub async fn connect_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
}

/// Ensure the database named in `database_url` exists; create it if not.
/// Connects to the default `postgres` database to run CREATE DATABASE.
/// Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Validation(format!("DATABASE_URL inválida: {}", e)))?;
    let db_name = opts.get_database().unwrap_or("").to_string();
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let mut conn = opts.database("postgres").connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Startup connectivity probe. The caller logs the outcome; a failure is not
/// fatal to the process.
pub async fn check_connectivity(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("petpoket"), "\"petpoket\"");
        assert_eq!(quote_ident("pet\"poket"), "\"pet\"\"poket\"");
    }
}
