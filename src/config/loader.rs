//! Layered configuration loading
//!
//! Sources, lowest priority first:
//! 1. `default.toml` (required)
//! 2. `{environment}.toml`
//! 3. `local.toml`
//! 4. legacy `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT`
//! 5. `SOFTSKILLS_*` environment variables
//!
//! `SOFTSKILLS_CONFIG_FILE` (or [`ConfigLoader::with_config_file`]) replaces
//! steps 1-3 with a single file.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, Map, Source, Value};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "SOFTSKILLS_CONFIG_DIR";
const CONFIG_FILE_ENV: &str = "SOFTSKILLS_CONFIG_FILE";
const DEFAULT_CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "SOFTSKILLS";
const ENV_SEPARATOR: &str = "__";

/// `DB_*` variable to settings key
const LEGACY_DATABASE_VARS: [(&str, &str); 5] = [
    ("DB_NAME", "database.name"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
];

#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Reads `SOFTSKILLS_CONFIG_DIR`, `SOFTSKILLS_CONFIG_FILE` and
    /// `SOFTSKILLS_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Fails when both the directory and the file variables are set.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_dir.is_some() && config_file.is_some() {
            return Err(ConfigError::mutual_exclusivity(format!(
                "{CONFIG_DIR_ENV} and {CONFIG_FILE_ENV} cannot both be set. \
                 Use {CONFIG_DIR_ENV} for layered configuration or \
                 {CONFIG_FILE_ENV} for a single configuration file."
            )));
        }

        Ok(Self {
            config_dir: config_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Loads exactly this file instead of the layered directory.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Loads, deserializes and validates the settings.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings = self.load_unvalidated()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Same as [`load`](Self::load) without validation, for callers that
    /// apply further overrides first.
    pub fn load_unvalidated(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config(LegacyDatabaseEnv::from_env())?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {e}"))
        })?;
        Ok(settings.tap_environment(self.environment))
    }

    fn build_config(&self, legacy: LegacyDatabaseEnv) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match &self.config_file {
            Some(file) => add_file_source(builder, file, true)?,
            None => self.add_layered_files(builder)?,
        };

        // SOFTSKILLS_SERVER__PORT -> server.port
        builder
            .add_source(legacy)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()
            .map_err(ConfigError::from)
    }

    fn add_layered_files(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let builder = add_file_source(builder, &self.config_dir.join("default.toml"), true)?;
        let builder = add_file_source(
            builder,
            &self
                .config_dir
                .join(format!("{}.toml", self.environment.as_str())),
            false,
        )?;
        add_file_source(builder, &self.config_dir.join("local.toml"), false)
    }
}

impl Settings {
    fn tap_environment(mut self, environment: AppEnvironment) -> Self {
        self.application.environment = environment;
        self
    }
}

fn add_file_source(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if required && !path.is_file() {
        return Err(ConfigError::file_not_found(format!(
            "Required configuration file not found: {}",
            path.display()
        )));
    }

    let path_str = path.to_str().ok_or_else(|| {
        ConfigError::validation(
            "config_file",
            format!("Configuration path is not valid UTF-8: {}", path.display()),
        )
    })?;

    Ok(builder.add_source(File::new(path_str, FileFormat::Toml).required(required)))
}

/// The plain `DB_*` variables, mapped onto `database.*`.
#[derive(Debug, Clone, Default)]
struct LegacyDatabaseEnv {
    values: Vec<(&'static str, &'static str, String)>,
}

impl LegacyDatabaseEnv {
    fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let values = LEGACY_DATABASE_VARS
            .iter()
            .filter_map(|(var, key)| {
                lookup(var)
                    .filter(|v| !v.is_empty())
                    .map(|v| (*var, *key, v))
            })
            .collect();
        Self { values }
    }
}

impl Source for LegacyDatabaseEnv {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
        Ok(self
            .values
            .iter()
            .map(|(var, key, value)| {
                let origin = var.to_string();
                (key.to_string(), Value::new(Some(&origin), value.clone()))
            })
            .collect())
    }
}
