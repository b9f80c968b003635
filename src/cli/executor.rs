//! Dispatches a parsed command to its handler

use super::handlers::{MigrateCommandHandler, SeedCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::AppError;

/// Runs the command in `cli` (default `serve`) with merged `settings`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> anyhow::Result<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })?;

    match cli.command_or_default() {
        Commands::Serve { dry_run, .. } => {
            ServeCommandHandler::new(settings).execute(dry_run).await
        }
        Commands::Migrate { dry_run, rollback } => {
            if let Some(steps) = rollback
                && steps > 10
            {
                tracing::warn!(steps, "Rolling back a large number of migrations");
            }
            MigrateCommandHandler::new(settings)
                .execute(dry_run, rollback)
                .await?;
            Ok(())
        }
        Commands::Seed { dry_run, .. } => {
            SeedCommandHandler::new(settings).execute(dry_run).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/softskills_test".to_string();
        config
    }

    #[tokio::test]
    async fn test_serve_dry_run() {
        let cli = Cli::try_parse_from(["softskills-users", "serve", "--dry-run"]).unwrap();
        assert!(execute_command(&cli, valid_config()).await.is_ok());
    }

    #[tokio::test]
    async fn test_seed_dry_run() {
        let cli = Cli::try_parse_from(["softskills-users", "seed", "--dry-run"]).unwrap();
        assert!(execute_command(&cli, valid_config()).await.is_ok());
    }

    #[tokio::test]
    async fn test_conflicting_args_rejected() {
        let cli = Cli {
            command: Some(Commands::Migrate {
                dry_run: true,
                rollback: Some(5),
            }),
            config: None,
            env: None,
            verbose: false,
            quiet: false,
        };

        let err = execute_command(&cli, valid_config()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::Validation { field, .. }) if field == "cli_arguments"
        ));
    }
}
