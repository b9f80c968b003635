//! Credential checks for `POST /login`.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::repositories::UserStore;
use crate::utils::password::verify_password;

/// Identity returned on a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub name: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Checks an email/password pair.
    ///
    /// # Errors
    /// - `NotFound` when no user has this email
    /// - `Unauthorized` when the password does not match
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!("Login attempt for unknown email");
            return Err(AppError::not_found("user", "email", email));
        };

        if !verify_password(password, &user.password)? {
            tracing::info!(user_id = user.id, "Login rejected: wrong password");
            return Err(AppError::unauthorized("Incorrect password"));
        }

        tracing::info!(user_id = user.id, "Login succeeded");
        Ok(AuthenticatedUser {
            id: user.id,
            name: user.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::repositories::memory::MemoryStore;
    use crate::services::{NewUserInput, UserService};

    async fn service_with_ana() -> (AuthService, MemoryStore) {
        let store = MemoryStore::with_default_roles();
        let users = UserService::new(Arc::new(store.clone()));
        users
            .create_user(NewUserInput {
                role_id: 1,
                name: "Ana".to_string(),
                age: 30,
                email: "ana@x.com".to_string(),
                phone: "123456789".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        (AuthService::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_correct_password() {
        let (auth, _) = service_with_ana().await;
        let user = auth.authenticate("ana@x.com", "secret").await.unwrap();
        assert_eq!(
            user,
            AuthenticatedUser {
                id: 1,
                name: "Ana".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let (auth, _) = service_with_ana().await;
        let err = auth.authenticate("ana@x.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_unknown_email() {
        let (auth, _) = service_with_ana().await;
        let err = auth.authenticate("nobody@x.com", "secret").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let (auth, _) = service_with_ana().await;
        let err = auth.authenticate("ANA@x.com", "secret").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_plaintext_stored_password_is_rejected() {
        let store = MemoryStore::with_default_roles();
        UserStore::create(
            &store,
            NewUser {
                role_id: 2,
                name: "Rui".to_string(),
                age: 40,
                email: "rui@x.com".to_string(),
                phone: "987654321".to_string(),
                password: "secret".to_string(),
            },
        )
        .await
        .unwrap();

        let auth = AuthService::new(Arc::new(store));
        let err = auth.authenticate("rui@x.com", "secret").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }
}
