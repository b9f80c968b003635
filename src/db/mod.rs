//! Database access: async connection pool, embedded migrations, and the
//! per-call deadline applied to every store operation.

mod deadline;
mod migrations;
mod pool;

pub use deadline::with_deadline;
pub use migrations::{MIGRATIONS, applied_migrations, pending_migrations, revert_migrations, run_migrations};
pub use pool::{AsyncDbPool, establish_async_connection_pool};
