//! Shared setup for the PostgreSQL-backed tests.
//!
//! Every test truncates both tables, so tests in a binary take a global lock
//! and run one at a time.

use std::sync::LazyLock;
use std::time::Duration;

use diesel_async::RunQueryDsl;
use softskills_users::config::DatabaseConfig;
use softskills_users::db::{AsyncDbPool, establish_async_connection_pool, run_migrations};
use softskills_users::models::{NewRole, NewUser};
use softskills_users::repositories::{Repositories, RoleStore};
use tokio::sync::{Mutex, MutexGuard};

static DB_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub struct TestDb {
    pub pool: AsyncDbPool,
    pub repos: Repositories,
    _guard: MutexGuard<'static, ()>,
}

pub fn database_url() -> String {
    std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must point at a disposable PostgreSQL database")
}

/// Migrated, empty database with sequences reset.
pub async fn setup() -> TestDb {
    let guard = DB_LOCK.lock().await;
    let url = database_url();

    run_migrations(url.clone()).await.expect("migrations apply");

    let config = DatabaseConfig {
        url,
        max_connections: 4,
        min_connections: 1,
        ..Default::default()
    };
    let pool = establish_async_connection_pool(&config)
        .await
        .expect("pool connects");

    {
        let mut conn = pool.get().await.expect("connection");
        diesel::sql_query("TRUNCATE utilizadores, cargos RESTART IDENTITY CASCADE")
            .execute(&mut conn)
            .await
            .expect("truncate");
    }

    let repos = Repositories::new(pool.clone(), Duration::from_secs(5));
    TestDb {
        pool,
        repos,
        _guard: guard,
    }
}

/// Inserts roles 1 Administrador, 2 Professor, 3 Estudante.
pub async fn seed_roles(db: &TestDb) {
    let roles = vec![
        NewRole::with_id(1, "Administrador"),
        NewRole::with_id(2, "Professor"),
        NewRole::with_id(3, "Estudante"),
    ];
    db.repos.roles.seed(roles).await.expect("roles seed");
}

pub fn new_user(role_id: i32, name: &str, age: i32, email: &str) -> NewUser {
    NewUser {
        role_id,
        name: name.to_string(),
        age,
        email: email.to_string(),
        phone: "912345678".to_string(),
        password: "not-a-hash".to_string(),
    }
}
