//! Configuration settings structures
//!
//! Every section can be loaded from TOML files and overridden with
//! `SOFTSKILLS_<SECTION>__<KEY>` environment variables.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::logger::LoggerConfig;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "softskills-users".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_keep_alive_timeout() -> u64 {
    75
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_query_timeout() -> u64 {
    10
}

fn default_seed_users() -> usize {
    10
}

fn default_rng_seed() -> u64 {
    42
}

// ============================================================================
// Application Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,

    /// Filled in by the loader from `SOFTSKILLS_APP_ENV` or `--env`
    #[serde(default)]
    pub environment: Environment,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
            environment: Environment::default(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Keep-alive timeout in seconds
    #[serde(default = "default_keep_alive_timeout")]
    pub keep_alive_timeout: u64,
}

impl ServerConfig {
    /// Full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            keep_alive_timeout: default_keep_alive_timeout(),
        }
    }
}

// ============================================================================
// Database Configuration
// ============================================================================

/// PostgreSQL connection and pool configuration.
///
/// Either `url` is set, or the discrete `name`/`user`/`password`/`host`/`port`
/// parts are (these also come from the `DB_*` variables).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the discrete parts
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Seconds a single store call may run
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    /// Run pending migrations when the server starts
    #[serde(default)]
    pub auto_migrate: bool,
}

impl DatabaseConfig {
    /// Connection URL, assembled from the discrete parts when `url` is empty.
    pub fn connection_url(&self) -> Result<String, ConfigError> {
        if !self.url.is_empty() {
            return Ok(self.url.clone());
        }

        let name = self.name.as_deref().filter(|s| !s.is_empty()).ok_or_else(|| {
            ConfigError::validation(
                "database.name",
                "Set database.url, or database.name and database.user (DB_NAME / DB_USER).",
            )
        })?;
        let user = self.user.as_deref().filter(|s| !s.is_empty()).ok_or_else(|| {
            ConfigError::validation(
                "database.user",
                "Set database.url, or database.name and database.user (DB_NAME / DB_USER).",
            )
        })?;

        let invalid = |field: &str| {
            ConfigError::validation(
                format!("database.{field}"),
                format!("database.{field} cannot be used in a connection URL."),
            )
        };

        let mut url = Url::parse(&format!("postgres://{}:{}", self.host, self.port))
            .map_err(|_| invalid("host"))?;
        url.set_path(&format!("/{name}"));
        url.set_username(&escape_percent(user))
            .map_err(|_| invalid("user"))?;
        if let Some(password) = self.password.as_deref().filter(|s| !s.is_empty()) {
            url.set_password(Some(&escape_percent(password)))
                .map_err(|_| invalid("password"))?;
        }

        Ok(url.into())
    }

    /// URL with the password masked, for logs.
    pub fn redacted_url(&self) -> String {
        let Ok(raw) = self.connection_url() else {
            return "<unset>".to_string();
        };
        let Ok(mut url) = Url::parse(&raw) else {
            return "<invalid>".to_string();
        };
        if url.password().is_some() && url.set_password(Some("***")).is_err() {
            return "<invalid>".to_string();
        }
        url.into()
    }
}

/// `Url` encodes the userinfo delimiters but keeps `%` as is.
fn escape_percent(raw: &str) -> String {
    raw.replace('%', "%25")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            name: None,
            user: None,
            password: None,
            host: default_db_host(),
            port: default_db_port(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
            query_timeout: default_query_timeout(),
            auto_migrate: false,
        }
    }
}

// ============================================================================
// Auth Configuration
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Answer unknown emails with 401 like wrong passwords, instead of 404
    #[serde(default)]
    pub uniform_login_errors: bool,
}

// ============================================================================
// Seed Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Number of synthetic users generated by `seed`
    #[serde(default = "default_seed_users")]
    pub users: usize,

    /// RNG seed; the same seed always produces the same users
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: default_seed_users(),
            rng_seed: default_rng_seed(),
        }
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub seed: SeedConfig,

    #[serde(default)]
    pub logger: LoggerConfig,
}
