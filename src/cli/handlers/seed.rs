//! `seed` command: default roles plus generated users

use std::time::Duration;

use crate::config::settings::Settings;
use crate::db;
use crate::error::AppResult;
use crate::repositories::Repositories;
use crate::services::seed_service::{SEED_ROLES, SeedReport, SeedService, generate_users};

pub struct SeedCommandHandler {
    config: Settings,
}

impl SeedCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Applies pending migrations, then seeds `seed.users` users from
    /// `seed.rng_seed`. With `dry_run` nothing is written.
    pub async fn execute(&self, dry_run: bool) -> AppResult<Option<SeedReport>> {
        let seed = &self.config.seed;

        if dry_run {
            self.print_plan();
            return Ok(None);
        }

        self.config.database.validate()?;
        let applied = db::run_migrations(self.config.database.connection_url()?).await?;
        if !applied.is_empty() {
            println!("✓ Applied {} migration(s)", applied.len());
        }

        let pool = db::establish_async_connection_pool(&self.config.database).await?;
        let repos = Repositories::new(
            pool,
            Duration::from_secs(self.config.database.query_timeout),
        );
        let report = SeedService::new(repos.roles, repos.users)
            .run(seed.users, seed.rng_seed)
            .await?;

        println!(
            "✓ Inserted {} role(s) and {} user(s)",
            report.roles_inserted, report.users_inserted
        );
        if report.users_inserted < seed.users {
            println!(
                "  {} user(s) already existed and were skipped",
                seed.users - report.users_inserted
            );
        }
        Ok(Some(report))
    }

    fn print_plan(&self) {
        let seed = &self.config.seed;
        println!("Roles:");
        for (id, description) in SEED_ROLES {
            println!("  {id:>3}  {description}");
        }

        println!("Users ({} from rng seed {}):", seed.users, seed.rng_seed);
        for user in generate_users(seed.users, seed.rng_seed) {
            println!(
                "  role {}  {:<24} {:>2}  {:<40} {}",
                user.role_id, user.name, user.age, user.email, user.phone
            );
        }
        println!("Dry run only; nothing was written");
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dry_run_needs_no_database() {
        let mut config = Settings::default();
        config.seed.users = 5;
        let handler = SeedCommandHandler::new(config);

        assert_eq!(handler.execute(true).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_database_config_is_reported() {
        let handler = SeedCommandHandler::new(Settings::default());
        assert!(handler.execute(false).await.is_err());
        assert_eq!(handler.config().seed.users, 10);
    }
}
