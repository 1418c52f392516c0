//! Environment-driven configuration, collected once at startup.

use std::env;

/// Schema reconciliation mode, decided before the server starts serving.
/// Destructive mode drops and rebuilds every declared table and must never
/// point at data an operator cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
    /// `CREATE TABLE IF NOT EXISTS` + `ADD COLUMN IF NOT EXISTS`.
    Additive,
    /// `DROP TABLE ... CASCADE` then fresh create.
    Destructive,
}

/// PostgreSQL connection settings. A full `DATABASE_URL` wins over the
/// discrete parameters.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        let credentials = if self.password.is_empty() {
            self.user.clone()
        } else {
            format!("{}:{}", self.user, self.password)
        };
        format!(
            "postgres://{}@{}:{}/{}",
            credentials, self.host, self.port, self.database
        )
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub mongodb_uri: String,
    pub sync_mode: SyncMode,
    pub field_secret: String,
    pub port: u16,
}

const DEFAULT_FIELD_SECRET: &str = "petpoket-dev-secret";

impl AppConfig {
    /// Read every setting from the environment, falling back to local
    /// development defaults.
    pub fn from_env() -> Self {
        let database = DatabaseSettings {
            url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: env_or("POSTGRES_HOST", "localhost"),
            user: env_or("POSTGRES_USER", "postgres"),
            password: env_or("POSTGRES_PASSWORD", ""),
            database: env_or("POSTGRES_DB", "petpoket"),
            port: env_or("POSTGRES_PORT", "5432").parse().unwrap_or(5432),
        };
        let sync_mode = match env_or("APP_ENV", "production").as_str() {
            "development" => SyncMode::Destructive,
            _ => SyncMode::Additive,
        };
        let field_secret = match env::var("FIELD_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                tracing::warn!("FIELD_SECRET not set, using the development default");
                DEFAULT_FIELD_SECRET.to_string()
            }
        };
        AppConfig {
            database,
            mongodb_uri: env_or("MONGODB_URI", "mongodb://localhost:27017/petpoket"),
            sync_mode,
            field_secret,
            port: env_or("PORT", "3000").parse().unwrap_or(3000),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).ok().filter(|s| !s.is_empty()).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_wins_over_discrete_params() {
        let settings = DatabaseSettings {
            url: Some("postgres://app@db.internal:5432/petpoket".into()),
            host: "ignored".into(),
            user: "ignored".into(),
            password: "ignored".into(),
            database: "ignored".into(),
            port: 1,
        };
        assert_eq!(settings.connection_url(), "postgres://app@db.internal:5432/petpoket");
    }

    #[test]
    fn discrete_params_without_password() {
        let settings = DatabaseSettings {
            url: None,
            host: "localhost".into(),
            user: "postgres".into(),
            password: String::new(),
            database: "petpoket".into(),
            port: 5432,
        };
        assert_eq!(settings.connection_url(), "postgres://postgres@localhost:5432/petpoket");
    }

    #[test]
    fn discrete_params_with_password() {
        let settings = DatabaseSettings {
            url: None,
            host: "db".into(),
            user: "app".into(),
            password: "s3cret".into(),
            database: "petpoket".into(),
            port: 5433,
        };
        assert_eq!(settings.connection_url(), "postgres://app:s3cret@db:5433/petpoket");
    }
}
