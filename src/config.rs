use serde::{Deserialize, Serialize};
use std::env;

use crate::error::UnionError;

/// Runtime settings for the server and the admin CLI.
///
/// Sources, lowest precedence first: built-in defaults, an optional TOML file
/// (`union-app.toml`, or the path in `UNION_APP_CONFIG`), `UNION_APP_*`
/// environment variables, and finally `DATABASE_URL`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, UnionError> {
        let file = env::var("UNION_APP_CONFIG").unwrap_or_else(|_| "union-app.toml".to_string());

        let mut builder = ::config::Config::builder()
            .set_default("database_url", "sqlite://union-app.db")?
            .set_default("server_host", "0.0.0.0")?
            .set_default("server_port", 3000_i64)?
            .set_default("max_connections", 5_i64)?
            .set_default("busy_timeout_ms", 5000_i64)?
            .add_source(::config::File::with_name(&file).required(false))
            .add_source(::config::Environment::with_prefix("UNION_APP").try_parsing(true));

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database_url", database_url)?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), UnionError> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(UnionError::ConfigError(format!(
                "Unsupported database URL '{}': expected a sqlite: URL",
                self.database_url
            )));
        }

        if self.max_connections == 0 {
            return Err(UnionError::ConfigError(
                "max_connections must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://union-app.db".to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            max_connections: 5,
            busy_timeout_ms: 5000,
        }
    }
}
