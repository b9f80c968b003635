//! `serve` command

use crate::config::settings::Settings;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Starts the server, or only checks the configuration when `dry_run`.
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            self.validate_only()?;
            return Ok(());
        }
        Server::new(self.config).run().await
    }

    /// Validates the settings and prints what the server would use.
    pub fn validate_only(&self) -> anyhow::Result<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!(
            "✓ Environment: {}",
            self.config.application.environment
        );
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Database: {}", self.config.database.redacted_url());
        println!("✓ Log level: {}", self.config.logger.level);
        if self.config.database.auto_migrate {
            println!("✓ Pending migrations would be applied on startup");
        }
        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/softskills_test".to_string();
        config
    }

    #[test]
    fn test_serve_handler_new() {
        let config = valid_config();
        let handler = ServeCommandHandler::new(config.clone());
        assert_eq!(handler.config(), &config);
    }

    #[tokio::test]
    async fn test_dry_run_accepts_valid_config() {
        let handler = ServeCommandHandler::new(valid_config());
        assert!(handler.execute(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_dry_run_rejects_invalid_config() {
        let mut config = valid_config();
        config.server.port = 0;
        let handler = ServeCommandHandler::new(config);
        assert!(handler.execute(true).await.is_err());
    }
}
