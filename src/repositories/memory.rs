//! In-memory store for service and handler tests.
//!
//! Enforces the same constraints as the migration: unique email, existing
//! role, `age >= 18`, non-empty name/phone, unique role description.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{AppError, AppResult, ConstraintKind};
use crate::models::{NewRole, NewUser, Role, UpdateUser, User};
use crate::repositories::{RoleStore, StoreHealth, UserStore};

#[derive(Default)]
struct Tables {
    roles: BTreeMap<i32, Role>,
    users: BTreeMap<i32, User>,
    next_role_id: i32,
    next_user_id: i32,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    offline: Arc<Mutex<bool>>,
}

fn violation(kind: ConstraintKind, entity: &str, field: &str, value: Option<String>) -> AppError {
    AppError::ConstraintViolation {
        kind,
        entity: entity.to_string(),
        field: field.to_string(),
        value,
    }
}

impl Tables {
    fn check_user(&self, user: &User) -> AppResult<()> {
        if !self.roles.contains_key(&user.role_id) {
            return Err(violation(
                ConstraintKind::ForeignKey,
                "user",
                "role_id",
                Some(user.role_id.to_string()),
            ));
        }
        if user.age < 18 {
            return Err(violation(ConstraintKind::Check, "user", "age", None));
        }
        if user.name.is_empty() {
            return Err(violation(ConstraintKind::Check, "user", "name", None));
        }
        if user.phone.is_empty() {
            return Err(violation(ConstraintKind::Check, "user", "phone", None));
        }
        if self
            .users
            .values()
            .any(|other| other.id != user.id && other.email == user.email)
        {
            return Err(violation(
                ConstraintKind::Unique,
                "user",
                "email",
                Some(user.email.clone()),
            ));
        }
        Ok(())
    }

    fn insert_user(&mut self, new_user: NewUser) -> AppResult<User> {
        let user = User {
            id: self.next_user_id + 1,
            role_id: new_user.role_id,
            name: new_user.name,
            age: new_user.age,
            email: new_user.email,
            phone: new_user.phone,
            password: new_user.password,
        };
        self.check_user(&user)?;
        self.next_user_id = user.id;
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn insert_role(&mut self, new_role: NewRole) -> AppResult<Role> {
        let id = new_role.id.unwrap_or(self.next_role_id + 1);
        if self.roles.contains_key(&id) {
            return Err(violation(
                ConstraintKind::Unique,
                "role",
                "id",
                Some(id.to_string()),
            ));
        }
        if new_role.description.is_empty() {
            return Err(violation(ConstraintKind::Check, "role", "description", None));
        }
        if self
            .roles
            .values()
            .any(|r| r.description == new_role.description)
        {
            return Err(violation(
                ConstraintKind::Unique,
                "role",
                "description",
                Some(new_role.description),
            ));
        }
        let role = Role {
            id,
            description: new_role.description,
        };
        self.next_role_id = self.next_role_id.max(id);
        self.roles.insert(id, role.clone());
        Ok(role)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the three seeded roles.
    pub fn with_default_roles() -> Self {
        let store = Self::new();
        {
            let mut tables = store.lock();
            for (id, description) in [(1, "Administrador"), (2, "Professor"), (3, "Estudante")] {
                let _ = tables.insert_role(NewRole::with_id(id, description));
            }
        }
        store
    }

    /// Makes every subsequent call fail with `ConnectionFailure`.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    /// Snapshot of a stored row, bypassing the store API.
    pub fn raw_user(&self, user_id: i32) -> Option<User> {
        self.lock().users.get(&user_id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    fn ensure_online(&self) -> AppResult<()> {
        if *self.offline.lock().unwrap() {
            return Err(AppError::ConnectionFailure {
                source: anyhow::anyhow!("connection refused"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        self.ensure_online()?;
        self.lock().insert_user(new_user)
    }

    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        self.ensure_online()?;
        Ok(self.lock().users.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.ensure_online()?;
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        self.ensure_online()?;
        Ok(self.lock().users.values().cloned().collect())
    }

    async fn update(&self, user_id: i32, changes: UpdateUser) -> AppResult<Option<User>> {
        self.ensure_online()?;
        assert!(!changes.is_empty(), "empty change set reached the store");

        let mut tables = self.lock();
        let Some(mut user) = tables.users.get(&user_id).cloned() else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(age) = changes.age {
            user.age = age;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(phone) = changes.phone {
            user.phone = phone;
        }
        if let Some(password) = changes.password {
            user.password = password;
        }
        tables.check_user(&user)?;
        tables.users.insert(user_id, user.clone());
        Ok(Some(user))
    }

    async fn delete(&self, user_id: i32) -> AppResult<usize> {
        self.ensure_online()?;
        Ok(self.lock().users.remove(&user_id).map_or(0, |_| 1))
    }

    async fn seed(&self, rows: Vec<NewUser>) -> AppResult<usize> {
        self.ensure_online()?;
        let mut tables = self.lock();
        let mut inserted = 0;
        for row in rows {
            match tables.insert_user(row) {
                Ok(_) => inserted += 1,
                Err(AppError::ConstraintViolation {
                    kind: ConstraintKind::Unique,
                    ..
                }) => {}
                Err(other) => return Err(other),
            }
        }
        Ok(inserted)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn create(&self, new_role: NewRole) -> AppResult<Role> {
        self.ensure_online()?;
        self.lock().insert_role(new_role)
    }

    async fn find_by_id(&self, role_id: i32) -> AppResult<Option<Role>> {
        self.ensure_online()?;
        Ok(self.lock().roles.get(&role_id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Role>> {
        self.ensure_online()?;
        Ok(self.lock().roles.values().cloned().collect())
    }

    async fn seed(&self, rows: Vec<NewRole>) -> AppResult<usize> {
        self.ensure_online()?;
        let mut tables = self.lock();
        let mut inserted = 0;
        for row in rows {
            if row.id.is_some_and(|id| tables.roles.contains_key(&id)) {
                continue;
            }
            match tables.insert_role(row) {
                Ok(_) => inserted += 1,
                Err(AppError::ConstraintViolation {
                    kind: ConstraintKind::Unique,
                    ..
                }) => {}
                Err(other) => return Err(other),
            }
        }
        Ok(inserted)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        self.ensure_online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> NewUser {
        NewUser {
            role_id: 1,
            name: "Ana".to_string(),
            age: 30,
            email: "ana@x.com".to_string(),
            phone: "123456789".to_string(),
            password: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let store = MemoryStore::with_default_roles();
        UserStore::create(&store, ana()).await.unwrap();
        let err = UserStore::create(&store, ana()).await.unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::Unique));
    }

    #[tokio::test]
    async fn test_unknown_role_is_foreign_key_violation() {
        let store = MemoryStore::with_default_roles();
        let mut user = ana();
        user.role_id = 99;
        let err = UserStore::create(&store, user).await.unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));
    }

    #[tokio::test]
    async fn test_failed_update_leaves_row_untouched() {
        let store = MemoryStore::with_default_roles();
        let user = UserStore::create(&store, ana()).await.unwrap();
        let changes = UpdateUser {
            age: Some(10),
            ..Default::default()
        };
        assert!(UserStore::update(&store, user.id, changes).await.is_err());
        assert_eq!(store.raw_user(user.id).unwrap().age, 30);
    }

    #[tokio::test]
    async fn test_role_seed_skips_existing_ids() {
        let store = MemoryStore::with_default_roles();
        let inserted = RoleStore::seed(&store, vec![NewRole::with_id(1, "Administrador")])
            .await
            .unwrap();
        assert_eq!(inserted, 0);

        let role = RoleStore::create(&store, NewRole::new("Coordenador"))
            .await
            .unwrap();
        assert_eq!(role.id, 4);
    }

    #[tokio::test]
    async fn test_offline_store_reports_connection_failure() {
        let store = MemoryStore::with_default_roles();
        store.set_offline(true);
        assert!(matches!(
            store.ping().await,
            Err(AppError::ConnectionFailure { .. })
        ));
    }
}
