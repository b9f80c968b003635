//! `migrate` command: apply, preview or roll back the embedded migrations

use crate::config::settings::Settings;
use crate::db;
use crate::error::AppResult;

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// `dry_run` lists pending migrations; `rollback` reverts that many.
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.config.database.validate()?;
        let database_url = self.config.database.connection_url()?;

        if dry_run {
            return Self::show_pending(database_url).await;
        }

        match rollback {
            Some(steps) => Self::rollback(database_url, steps).await,
            None => Self::apply(database_url).await,
        }
    }

    async fn show_pending(database_url: String) -> AppResult<()> {
        println!("Checking for pending migrations...");
        let pending = db::pending_migrations(database_url).await?;

        if pending.is_empty() {
            println!("✓ No pending migrations - database is up to date");
        } else {
            println!("Found {} pending migration(s):", pending.len());
            for name in &pending {
                println!("  - {name}");
            }
            println!("\nRun without --dry-run to apply them");
        }
        Ok(())
    }

    async fn apply(database_url: String) -> AppResult<()> {
        println!("Running database migrations...");
        let applied = db::run_migrations(database_url).await?;

        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {version}");
            }
        }
        tracing::info!(applied = applied.len(), "Migrations applied");
        Ok(())
    }

    async fn rollback(database_url: String, steps: u32) -> AppResult<()> {
        println!("Rolling back {steps} migration(s)...");
        let reverted = db::revert_migrations(database_url, steps as usize).await?;

        println!("✓ Rolled back {} migration(s):", reverted.len());
        for version in &reverted {
            println!("  - {version}");
        }
        tracing::warn!(reverted = reverted.len(), "Migrations rolled back");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
