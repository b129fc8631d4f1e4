//! Local account list used when the backend cannot be reached and the
//! deployment opts into offline auth. Passwords are stored as argon2 hashes.

use std::sync::Arc;

use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHash};
use models::{normalize_role, Role, Session, UserRecord};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::errors::AuthError;
use crate::errors::ServiceError;
use crate::storage::KeyValueStorage;

pub const MOCK_USERS_KEY: &str = "scp_mock_users";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineUser {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: Option<String>,
}

pub struct OfflineDirectory {
    storage: Arc<dyn KeyValueStorage>,
}

fn role_or_student(role: Option<&str>) -> String {
    normalize_role(role).map(|r| r.to_string()).unwrap_or_else(|| Role::Student.to_string())
}

/// Session minted locally; the token is never sent to a real server.
pub fn offline_session(email: &str, role: Option<&str>, name: Option<&str>) -> Session {
    let now = chrono::Utc::now().timestamp_millis();
    let name = name
        .map(str::to_string)
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());
    Session {
        access_token: format!("offline-token-{now}"),
        user: UserRecord {
            id: Some(format!("offline-{now}")),
            name: Some(name),
            email: Some(email.to_string()),
            role: Some(role_or_student(role)),
            ..Default::default()
        },
    }
}

impl OfflineDirectory {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self { Self { storage } }

    /// Stored accounts; corrupt data reads as no accounts.
    pub async fn users(&self) -> Vec<OfflineUser> {
        let Some(raw) = self.storage.get_item(MOCK_USERS_KEY).await else { return Vec::new() };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "offline user list is corrupt; ignoring");
            Vec::new()
        })
    }

    async fn save_users(&self, users: &[OfflineUser]) -> Result<(), ServiceError> {
        let raw = serde_json::to_string(users).map_err(|e| ServiceError::Storage(e.to_string()))?;
        self.storage.set_item(MOCK_USERS_KEY, raw).await
    }

    pub async fn login(&self, email: &str, password: &str, role: Option<&str>) -> Result<Session, ServiceError> {
        let users = self.users().await;
        let user = users
            .iter()
            .find(|u| u.email == email && verify(password, &u.password_hash))
            .ok_or(AuthError::OfflineAccountNotFound)?;
        info!(%email, "offline login");
        Ok(offline_session(&user.email, user.role.as_deref().or(role), user.name.as_deref()))
    }

    pub async fn register(&self, name: &str, email: &str, password: &str, role: Option<&str>) -> Result<Session, ServiceError> {
        let mut users = self.users().await;
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::OfflineConflict.into());
        }
        let role = role_or_student(role);
        users.push(OfflineUser {
            name: Some(name.to_string()),
            email: email.to_string(),
            password_hash: hash(password)?,
            role: Some(role.clone()),
        });
        self.save_users(&users).await?;
        info!(%email, %role, "offline account registered");
        Ok(offline_session(email, Some(&role), Some(name)))
    }
}

fn hash(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}

fn verify(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn register_then_login() -> Result<(), ServiceError> {
        let dir = OfflineDirectory::new(Arc::new(MemoryStorage::new()));
        let session = dir.register("Ravi", "ravi@campus.edu", "secret1", Some("user")).await?;
        assert!(session.access_token.starts_with("offline-token-"));
        assert_eq!(session.user.role.as_deref(), Some("student"));

        let again = dir.login("ravi@campus.edu", "secret1", Some("student")).await?;
        assert_eq!(again.user.name.as_deref(), Some("Ravi"));
        assert!(!dir.users().await[0].password_hash.contains("secret1"));
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_and_duplicates_fail() -> Result<(), ServiceError> {
        let dir = OfflineDirectory::new(Arc::new(MemoryStorage::new()));
        dir.register("Ravi", "ravi@campus.edu", "secret1", None).await?;
        let err = dir.login("ravi@campus.edu", "nope", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Backend is offline. Use a registered local account first.");
        let err = dir.register("Ravi", "ravi@campus.edu", "secret1", None).await.unwrap_err();
        assert_eq!(err.to_string(), "This email is already registered in offline mode.");
        Ok(())
    }

    #[test]
    fn session_name_defaults_to_email_local_part() {
        let s = offline_session("meera@campus.edu", None, None);
        assert_eq!(s.user.name.as_deref(), Some("meera"));
        assert_eq!(s.user.role.as_deref(), Some("student"));
    }
}
