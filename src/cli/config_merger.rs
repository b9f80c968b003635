//! Applies CLI overrides on top of file and environment configuration.
//!
//! Precedence, highest first: command flags, global flags, environment
//! variables, configuration files.

use std::path::Path;

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the unvalidated base configuration the way the CLI asks for it.
    ///
    /// Validation is deferred to [`merge_cli_args`](Self::merge_cli_args) so
    /// a flag such as `--port` can repair a value the files got wrong.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(path) = cli.config.as_deref() {
            loader = loader.with_config_file(Self::checked_path(path)?);
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }
        Ok(Self::new(loader.load_unvalidated()?))
    }

    fn checked_path(path: &Path) -> Result<&Path, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::file_not_found(path.display().to_string()));
        }
        Ok(path)
    }

    /// Returns validated settings with every CLI override applied.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(command) = &cli.command {
            Self::apply_command_overrides(&mut config, command);
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        match command {
            Commands::Serve {
                host,
                port,
                log_level,
                ..
            } => {
                if let Some(host) = host {
                    config.server.host = host.clone();
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
                if let Some(level) = log_level {
                    config.logger.level = level.as_str().to_string();
                }
            }
            Commands::Seed {
                users, rng_seed, ..
            } => {
                if let Some(users) = users {
                    config.seed.users = *users as usize;
                }
                if let Some(rng_seed) = rng_seed {
                    config.seed.rng_seed = *rng_seed;
                }
            }
            Commands::Migrate { .. } => {}
        }
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
