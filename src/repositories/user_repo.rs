//! User repository for async database operations.
//!
//! Provides CRUD operations for the `utilizadores` table using diesel_async.

use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::{AsyncDbPool, with_deadline};
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User};
use crate::repositories::UserStore;

/// User repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap
/// (just reference count increment). No need for `Arc<UserRepository>`.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
    deadline: Duration,
}

impl UserRepository {
    /// Creates a new UserRepository. Every call is bounded by `deadline`.
    pub fn new(pool: AsyncDbPool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        use crate::schema::utilizadores::dsl::*;

        with_deadline(self.deadline, "create user", async {
            let mut conn = self.pool.get().await?;
            diesel::insert_into(utilizadores)
                .values(&new_user)
                .returning(User::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(AppError::from)
        })
        .await
    }

    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        use crate::schema::utilizadores::dsl::*;

        with_deadline(self.deadline, "find user by id", async {
            let mut conn = self.pool.get().await?;
            utilizadores
                .filter(id_utilizador.eq(user_id))
                .select(User::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(AppError::from)
        })
        .await
    }

    async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>> {
        use crate::schema::utilizadores::dsl::*;

        with_deadline(self.deadline, "find user by email", async {
            let mut conn = self.pool.get().await?;
            utilizadores
                .filter(email.eq(user_email))
                .select(User::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(AppError::from)
        })
        .await
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        use crate::schema::utilizadores::dsl::*;

        with_deadline(self.deadline, "list users", async {
            let mut conn = self.pool.get().await?;
            utilizadores
                .order(id_utilizador.asc())
                .select(User::as_select())
                .load(&mut conn)
                .await
                .map_err(AppError::from)
        })
        .await
    }

    async fn update(&self, user_id: i32, changes: UpdateUser) -> AppResult<Option<User>> {
        use crate::schema::utilizadores::dsl::*;

        // diesel rejects an UPDATE with no SET clause
        if changes.is_empty() {
            return Err(AppError::BadRequest {
                message: "No fields supplied for update".to_string(),
            });
        }

        with_deadline(self.deadline, "update user", async {
            let mut conn = self.pool.get().await?;
            diesel::update(utilizadores.filter(id_utilizador.eq(user_id)))
                .set(&changes)
                .returning(User::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(AppError::from)
        })
        .await
    }

    async fn delete(&self, user_id: i32) -> AppResult<usize> {
        use crate::schema::utilizadores::dsl::*;

        with_deadline(self.deadline, "delete user", async {
            let mut conn = self.pool.get().await?;
            diesel::delete(utilizadores.filter(id_utilizador.eq(user_id)))
                .execute(&mut conn)
                .await
                .map_err(AppError::from)
        })
        .await
    }

    async fn seed(&self, rows: Vec<NewUser>) -> AppResult<usize> {
        use crate::schema::utilizadores::dsl::*;

        if rows.is_empty() {
            return Ok(0);
        }

        with_deadline(self.deadline, "seed users", async {
            let mut conn = self.pool.get().await?;
            diesel::insert_into(utilizadores)
                .values(&rows)
                .on_conflict_do_nothing()
                .execute(&mut conn)
                .await
                .map_err(AppError::from)
        })
        .await
    }
}
