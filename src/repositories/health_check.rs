use std::time::Duration;

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::db::{AsyncDbPool, with_deadline};
use crate::error::{AppError, AppResult};
use crate::repositories::StoreHealth;

/// Runs `SELECT 1` on a pooled connection.
#[derive(Clone)]
pub struct PoolHealthCheck {
    pool: AsyncDbPool,
    deadline: Duration,
}

impl PoolHealthCheck {
    pub fn new(pool: AsyncDbPool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }
}

#[async_trait]
impl StoreHealth for PoolHealthCheck {
    async fn ping(&self) -> AppResult<()> {
        with_deadline(self.deadline, "ping database", async {
            let mut conn = self.pool.get().await?;
            diesel::sql_query("SELECT 1")
                .execute(&mut conn)
                .await
                .map(|_| ())
                .map_err(|e| AppError::ConnectionFailure {
                    source: anyhow::Error::from(e),
                })
        })
        .await
    }
}
