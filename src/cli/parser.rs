//! Command-line interface definition

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::validation::MAX_SEED_USERS;

/// User and role backend for the Soft Skills platform
#[derive(Parser, Debug)]
#[command(name = "softskills-users")]
#[command(about = "User and role backend for the Soft Skills platform")]
#[command(long_about = "
Serves the user, role and login API backed by PostgreSQL, and manages the
schema and seed data of the `cargos` and `utilizadores` tables.

EXAMPLES:
    # Start the server with the layered configuration in ./config
    softskills-users serve

    # Bind to every interface on port 8080
    softskills-users serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    softskills-users --config /etc/softskills/production.toml serve

    # Check configuration without starting the server
    softskills-users serve --dry-run

    # Apply, preview or roll back migrations
    softskills-users migrate
    softskills-users migrate --dry-run
    softskills-users migrate --rollback 1

    # Insert the default roles and 25 generated users
    softskills-users seed --users 25
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Loads this TOML file instead of the layered files under ./config.
    /// Environment variables still override its values.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection (development, test, staging, production)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    ///
    /// Examples:
    ///   softskills-users serve
    ///   softskills-users serve --host 0.0.0.0 --port 80
    ///   softskills-users serve --dry-run
    Serve {
        /// Address to bind to (default: 127.0.0.1)
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port to listen on (default: 3000)
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level for this run; wins over --verbose and --quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },

    /// Apply or roll back the embedded schema migrations
    ///
    /// Examples:
    ///   softskills-users migrate
    ///   softskills-users migrate --dry-run
    ///   softskills-users migrate --rollback 1
    Migrate {
        /// List pending migrations without applying them
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Revert the most recent STEPS migrations (1-100)
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = super::validation::validate_rollback_steps)]
        rollback: Option<u32>,
    },

    /// Insert the default roles and generated users
    ///
    /// Pending migrations are applied first. Rows that already exist are
    /// skipped, so running the seed twice inserts nothing the second time.
    ///
    /// Examples:
    ///   softskills-users seed
    ///   softskills-users seed --users 50 --rng-seed 7
    ///   softskills-users seed --dry-run
    Seed {
        /// Number of generated users (default: seed.users)
        #[arg(long, value_name = "COUNT", value_parser = clap::value_parser!(u32).range(0..=MAX_SEED_USERS as i64))]
        users: Option<u32>,

        /// RNG seed; the same seed always yields the same users
        #[arg(long, value_name = "SEED")]
        rng_seed: Option<u64>,

        /// Print the generated rows without touching the database
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// The command to run; `serve` when none was given.
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            host: None,
            port: None,
            log_level: None,
            dry_run: false,
        })
    }

    /// Checks argument combinations clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        if let Some(Commands::Migrate {
            dry_run: true,
            rollback: Some(_),
        }) = self.command
        {
            return Err("Cannot use --dry-run and --rollback together".to_string());
        }

        Ok(())
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Production => crate::config::Environment::Production,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
        }
    }
}
