//! Configuration validation logic

use crate::config::error::ConfigError;
use crate::config::settings::{DatabaseConfig, SeedConfig, ServerConfig, Settings};
use crate::logger::LoggerConfig;

const VALID_DATABASE_SCHEMES: &[&str] = &["postgres://", "postgresql://"];

/// Upper bound on synthetic users per seed run
pub const MAX_SEED_USERS: usize = 10_000;

impl ServerConfig {
    /// - Port must be between 1 and 65535
    /// - Request and keep-alive timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.keep_alive_timeout == 0 {
            return Err(ConfigError::validation(
                "server.keep_alive_timeout",
                "Keep-alive timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// - A PostgreSQL URL, or the name/user parts, must be present
    /// - Pool bounds satisfy 1 <= min <= max
    /// - Connection and query timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.connection_url()?;
        if !VALID_DATABASE_SCHEMES
            .iter()
            .any(|scheme| url.starts_with(scheme))
        {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL. Expected postgres://[user[:password]@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        if self.query_timeout == 0 {
            return Err(ConfigError::validation(
                "database.query_timeout",
                "Query timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl SeedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.users > MAX_SEED_USERS {
            return Err(ConfigError::validation(
                "seed.users",
                format!("At most {MAX_SEED_USERS} users can be seeded in one run."),
            ));
        }
        Ok(())
    }
}

fn validate_logger(logger: &LoggerConfig) -> Result<(), ConfigError> {
    if logger.file.enabled && logger.file.path.as_os_str().is_empty() {
        return Err(ConfigError::validation(
            "logger.file.path",
            "File path is required when file logging is enabled.",
        ));
    }
    logger
        .validate()
        .map_err(|e| ConfigError::validation("logger", e.to_string()))
}

impl Settings {
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.seed.validate()?;
        validate_logger(&self.logger)?;
        Ok(())
    }
}
