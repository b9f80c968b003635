//! Fixture loader for the role and user tables.
//!
//! User rows come from a seeded RNG, so a given `(count, rng_seed)` always
//! produces the same names, emails and phones. Re-running the loader inserts
//! nothing new because every insert skips conflicts.

use std::collections::HashMap;
use std::sync::Arc;

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::AppResult;
use crate::models::{NewRole, NewUser};
use crate::repositories::{RoleStore, UserStore};
use crate::utils::password::hash_password;

/// Fixed role rows; ids are part of the data.
pub const SEED_ROLES: [(i32, &str); 3] = [(1, "Administrador"), (2, "Professor"), (3, "Estudante")];

const FIRST_NAMES: &[&str] = &[
    "Ana", "Beatriz", "Carla", "Diogo", "Eduardo", "Filipa", "Goncalo", "Helena", "Ines", "Joao",
    "Lucas", "Mariana", "Nuno", "Rita", "Tiago",
];

const LAST_NAMES: &[&str] = &[
    "Silva", "Santos", "Ferreira", "Pereira", "Oliveira", "Costa", "Rodrigues", "Martins",
    "Sousa", "Fernandes", "Goncalves", "Gomes",
];

const EMAIL_DOMAIN: &str = "softskills.pt";
const PASSWORD_LENGTH: usize = 12;
const PHONE_DIGITS: usize = 9;

/// Rows inserted by one seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub roles_inserted: usize,
    pub users_inserted: usize,
}

/// A generated user before hashing. Only used to preview a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub role_id: i32,
    pub name: String,
    pub age: i32,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Generates `count` users deterministically from `rng_seed`.
pub fn generate_users(count: usize, rng_seed: u64) -> Vec<SeedUser> {
    let mut rng = StdRng::seed_from_u64(rng_seed);

    (1..=count)
        .map(|index| {
            let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
            let phone: String = (0..PHONE_DIGITS)
                .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
                .collect();
            let password: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(PASSWORD_LENGTH)
                .map(char::from)
                .collect();

            SeedUser {
                role_id: rng.random_range(1..=SEED_ROLES.len() as i32),
                name: format!("{first} {last}"),
                age: rng.random_range(18..=60),
                email: format!(
                    "{}.{}{}@{}",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    index,
                    EMAIL_DOMAIN
                ),
                phone,
                password,
            }
        })
        .collect()
}

/// Id under which the seed role `seed_role_id` is actually stored.
fn stored_role_id(role_ids: &HashMap<String, i32>, seed_role_id: i32) -> Option<i32> {
    SEED_ROLES
        .iter()
        .find(|(id, _)| *id == seed_role_id)
        .and_then(|(_, description)| role_ids.get(*description))
        .copied()
}

#[derive(Clone)]
pub struct SeedService {
    roles: Arc<dyn RoleStore>,
    users: Arc<dyn UserStore>,
}

impl SeedService {
    pub fn new(roles: Arc<dyn RoleStore>, users: Arc<dyn UserStore>) -> Self {
        Self { roles, users }
    }

    /// Inserts the fixed roles, then `user_count` generated users.
    ///
    /// The schema must already exist.
    pub async fn run(&self, user_count: usize, rng_seed: u64) -> AppResult<SeedReport> {
        let roles = SEED_ROLES
            .iter()
            .map(|(id, description)| NewRole::with_id(*id, *description))
            .collect();
        let roles_inserted = self.roles.seed(roles).await?;
        tracing::info!(roles_inserted, "Roles seeded");

        // A role that already existed under another id keeps that id
        let role_ids: HashMap<String, i32> = self
            .roles
            .list_all()
            .await?
            .into_iter()
            .map(|role| (role.description, role.id))
            .collect();

        let mut users = Vec::with_capacity(user_count);
        let mut skipped = 0usize;
        for user in generate_users(user_count, rng_seed) {
            let Some(role_id) = stored_role_id(&role_ids, user.role_id) else {
                skipped += 1;
                continue;
            };
            users.push(NewUser {
                role_id,
                name: user.name,
                age: user.age,
                email: user.email,
                phone: user.phone,
                password: hash_password(&user.password)?,
            });
        }
        if skipped > 0 {
            tracing::warn!(skipped, "Generated users skipped because their role is missing");
        }

        let users_inserted = self.users.seed(users).await?;
        tracing::info!(users_inserted, requested = user_count, "Users seeded");

        Ok(SeedReport {
            roles_inserted,
            users_inserted,
        })
    }
}
