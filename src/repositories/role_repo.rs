//! Role repository over the `cargos` table.

use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::{AsyncDbPool, with_deadline};
use crate::error::{AppError, AppResult};
use crate::models::{NewRole, Role};
use crate::repositories::RoleStore;

#[derive(Clone)]
pub struct RoleRepository {
    pool: AsyncDbPool,
    deadline: Duration,
}

impl RoleRepository {
    pub fn new(pool: AsyncDbPool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn create(&self, new_role: NewRole) -> AppResult<Role> {
        use crate::schema::cargos::dsl::*;

        with_deadline(self.deadline, "create role", async {
            let mut conn = self.pool.get().await?;
            diesel::insert_into(cargos)
                .values(&new_role)
                .returning(Role::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(AppError::from)
        })
        .await
    }

    async fn find_by_id(&self, role_id: i32) -> AppResult<Option<Role>> {
        use crate::schema::cargos::dsl::*;

        with_deadline(self.deadline, "find role by id", async {
            let mut conn = self.pool.get().await?;
            cargos
                .filter(id_cargo.eq(role_id))
                .select(Role::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(AppError::from)
        })
        .await
    }

    async fn list_all(&self) -> AppResult<Vec<Role>> {
        use crate::schema::cargos::dsl::*;

        with_deadline(self.deadline, "list roles", async {
            let mut conn = self.pool.get().await?;
            cargos
                .order(id_cargo.asc())
                .select(Role::as_select())
                .load(&mut conn)
                .await
                .map_err(AppError::from)
        })
        .await
    }

    async fn seed(&self, rows: Vec<NewRole>) -> AppResult<usize> {
        use crate::schema::cargos::dsl::*;

        if rows.is_empty() {
            return Ok(0);
        }

        with_deadline(self.deadline, "seed roles", async {
            let mut conn = self.pool.get().await?;
            let inserted = diesel::insert_into(cargos)
                .values(&rows)
                .on_conflict_do_nothing()
                .execute(&mut conn)
                .await?;

            // explicit ids bypass the sequence; move it past them
            diesel::sql_query(
                "SELECT setval(pg_get_serial_sequence('cargos', 'id_cargo'), \
                 (SELECT MAX(id_cargo) FROM cargos))",
            )
            .execute(&mut conn)
            .await?;

            Ok::<_, AppError>(inserted)
        })
        .await
    }
}
