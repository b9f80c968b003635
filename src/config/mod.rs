//! Layered configuration: TOML files, legacy `DB_*` variables and
//! `SOFTSKILLS_*` overrides, validated on load.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, AuthConfig, DatabaseConfig, SeedConfig, ServerConfig, Settings,
};
