mod role;
mod user;

pub use role::{NewRole, Role};
pub use user::{NewUser, UpdateUser, User};
