//! User service for business logic operations.
//!
//! Provides a higher-level API for user operations, encapsulating
//! business rules and coordinating with the repository layer.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User};
use crate::repositories::UserStore;
use crate::utils::password::hash_password;

/// Input for [`UserService::create_user`]. `password` is plaintext here and
/// never reaches the store unhashed.
#[derive(Debug, Clone)]
pub struct NewUserInput {
    pub role_id: i32,
    pub name: String,
    pub age: i32,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Result of a partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(User),
    /// No field was supplied, so the store was not contacted.
    NoChanges,
}

/// User service for handling user-related business logic.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserStore>,
}

impl UserService {
    /// Creates a new UserService with the given repository.
    pub fn new(repo: Arc<dyn UserStore>) -> Self {
        Self { repo }
    }

    /// Hashes the password and inserts the user.
    ///
    /// # Errors
    /// `ConstraintViolation` for a duplicate email, an unknown role, an age
    /// below 18, or an empty name/phone.
    pub async fn create_user(&self, input: NewUserInput) -> AppResult<User> {
        let new_user = NewUser {
            role_id: input.role_id,
            name: input.name,
            age: input.age,
            email: input.email,
            phone: input.phone,
            password: hash_password(&input.password)?,
        };

        let user = self.repo.create(new_user).await?;
        tracing::info!(user_id = user.id, role_id = user.role_id, "User created");
        Ok(user)
    }

    /// Gets a user by their ID.
    ///
    /// # Returns
    /// The user if found, or `NotFound` error
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }

    /// Lists all users ordered by id.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list_all().await
    }

    /// Applies the supplied fields to a user.
    ///
    /// A supplied password is hashed first. An empty change set returns
    /// `NoChanges` without reaching the store; a missing row is `NotFound`.
    pub async fn update_user(&self, id: i32, mut changes: UpdateUser) -> AppResult<UpdateOutcome> {
        if changes.is_empty() {
            tracing::debug!(user_id = id, "Update with no fields, skipping store");
            return Ok(UpdateOutcome::NoChanges);
        }

        if let Some(plain) = changes.password.take() {
            changes.password = Some(hash_password(&plain)?);
        }

        match self.repo.update(id, changes).await? {
            Some(user) => {
                tracing::info!(user_id = id, "User updated");
                Ok(UpdateOutcome::Updated(user))
            }
            None => Err(AppError::not_found("user", "id", id)),
        }
    }

    /// Deletes a user, or reports `NotFound` when no row matched.
    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        let affected = self.repo.delete(id).await?;
        if affected == 0 {
            return Err(AppError::not_found("user", "id", id));
        }
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConstraintKind;
    use crate::repositories::memory::MemoryStore;
    use crate::utils::password::verify_password;

    fn service() -> (UserService, MemoryStore) {
        let store = MemoryStore::with_default_roles();
        (UserService::new(Arc::new(store.clone())), store)
    }

    fn ana() -> NewUserInput {
        NewUserInput {
            role_id: 1,
            name: "Ana".to_string(),
            age: 30,
            email: "ana@x.com".to_string(),
            phone: "123456789".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let (service, _) = service();
        let first = service.create_user(ana()).await.unwrap();
        let mut other = ana();
        other.email = "rui@x.com".to_string();
        let second = service.create_user(other).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_create_stores_hash_not_plaintext() {
        let (service, store) = service();
        let user = service.create_user(ana()).await.unwrap();
        let stored = store.raw_user(user.id).unwrap();
        assert_ne!(stored.password, "secret");
        assert!(stored.password.starts_with("$argon2id$"));
        assert!(verify_password("secret", &stored.password).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (service, _) = service();
        service.create_user(ana()).await.unwrap();
        let err = service.create_user(ana()).await.unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::Unique));
    }

    #[tokio::test]
    async fn test_underage_rejected() {
        let (service, _) = service();
        for age in [0, 1, 17] {
            let mut input = ana();
            input.age = age;
            let err = service.create_user(input).await.unwrap_err();
            assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));
        }
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let (service, _) = service();
        assert!(service.get_user(42).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_empty_update_is_no_op() {
        let (service, store) = service();
        let user = service.create_user(ana()).await.unwrap();
        store.set_offline(true);

        // an offline store would fail any call that reached it
        let outcome = service
            .update_user(user.id, UpdateUser::default())
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NoChanges);
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_field() {
        let (service, _) = service();
        let user = service.create_user(ana()).await.unwrap();

        let changes = UpdateUser {
            name: Some("X".to_string()),
            ..Default::default()
        };
        let UpdateOutcome::Updated(updated) = service.update_user(user.id, changes).await.unwrap()
        else {
            panic!("Expected Updated outcome");
        };

        assert_eq!(updated.name, "X");
        assert_eq!(updated.age, user.age);
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.phone, user.phone);
        assert_eq!(updated.password, user.password);
    }

    #[tokio::test]
    async fn test_update_zero_age_is_applied_and_rejected() {
        let (service, _) = service();
        let user = service.create_user(ana()).await.unwrap();

        let changes = UpdateUser {
            age: Some(0),
            ..Default::default()
        };
        let err = service.update_user(user.id, changes).await.unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));
    }

    #[tokio::test]
    async fn test_update_hashes_new_password() {
        let (service, store) = service();
        let user = service.create_user(ana()).await.unwrap();

        let changes = UpdateUser {
            password: Some("changed".to_string()),
            ..Default::default()
        };
        service.update_user(user.id, changes).await.unwrap();

        let stored = store.raw_user(user.id).unwrap();
        assert!(verify_password("changed", &stored.password).unwrap());
        assert!(!verify_password("secret", &stored.password).unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let (service, _) = service();
        let changes = UpdateUser {
            name: Some("X".to_string()),
            ..Default::default()
        };
        assert!(
            service
                .update_user(99, changes)
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let (service, _) = service();
        let user = service.create_user(ana()).await.unwrap();
        service.delete_user(user.id).await.unwrap();
        assert!(service.delete_user(user.id).await.unwrap_err().is_not_found());
    }
}
