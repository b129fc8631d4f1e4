//! Session persistence: access token plus minimal user record.

use std::sync::Arc;

use models::{Session, UserRecord};
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::storage::KeyValueStorage;

pub const AUTH_TOKEN_KEY: &str = "scp_access_token";
pub const AUTH_USER_KEY: &str = "scp_auth_user";

/// Owns the two session keys in client storage. A session "exists" iff a
/// non-empty token is stored.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self { Self { storage } }

    /// Persist token and user, replacing any prior session. A session
    /// without a token is ignored. The user goes first so a half-finished
    /// write never leaves a token without its user.
    pub async fn save(&self, session: &Session) -> Result<(), ServiceError> {
        if session.access_token.trim().is_empty() {
            debug!("refusing to store a session without an access token");
            return Ok(());
        }
        let user = serde_json::to_string(&session.user).map_err(|e| ServiceError::Storage(e.to_string()))?;
        self.storage
            .set_items(&[(AUTH_USER_KEY, user), (AUTH_TOKEN_KEY, session.access_token.clone())])
            .await
    }

    pub async fn access_token(&self) -> Option<String> {
        self.storage.get_item(AUTH_TOKEN_KEY).await.filter(|t| !t.is_empty())
    }

    /// Stored user record; unparsable JSON counts as "no session".
    pub async fn user(&self) -> Option<UserRecord> {
        let raw = self.storage.get_item(AUTH_USER_KEY).await?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "stored user record is corrupt; ignoring");
                None
            }
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.access_token().await.is_some()
    }

    /// Remove both keys. Safe to call with nothing stored.
    pub async fn clear(&self) -> Result<(), ServiceError> {
        self.storage.remove_items(&[AUTH_TOKEN_KEY, AUTH_USER_KEY]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;

    /// Accepts every key except the token.
    struct TokenRejectingStorage(MemoryStorage);

    #[async_trait]
    impl KeyValueStorage for TokenRejectingStorage {
        async fn get_item(&self, key: &str) -> Option<String> {
            self.0.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: String) -> Result<(), ServiceError> {
            if key == AUTH_TOKEN_KEY {
                return Err(ServiceError::Storage("disk full".into()));
            }
            self.0.set_item(key, value).await
        }

        async fn remove_item(&self, key: &str) -> Result<(), ServiceError> {
            self.0.remove_item(key).await
        }
    }

    fn session(token: &str) -> Session {
        Session {
            access_token: token.into(),
            user: UserRecord {
                id: Some("u1".into()),
                name: Some("Asha".into()),
                email: Some("asha@campus.edu".into()),
                role: Some("student".into()),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn save_get_clear_roundtrip() -> Result<(), ServiceError> {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        assert!(!store.is_authenticated().await);

        store.save(&session("tok-1")).await?;
        assert!(store.is_authenticated().await);
        assert_eq!(store.user().await.and_then(|u| u.email).as_deref(), Some("asha@campus.edu"));

        store.save(&session("tok-2")).await?;
        assert_eq!(store.access_token().await.as_deref(), Some("tok-2"));

        store.clear().await?;
        store.clear().await?;
        assert!(!store.is_authenticated().await);
        assert!(store.user().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn empty_token_is_not_saved() -> Result<(), ServiceError> {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.save(&session("")).await?;
        assert!(storage.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn failed_token_write_is_not_a_session() {
        let store = SessionStore::new(Arc::new(TokenRejectingStorage(MemoryStorage::new())));
        assert!(store.save(&session("tok-1")).await.is_err());
        assert!(!store.is_authenticated().await);
        assert!(store.access_token().await.is_none());
    }

    #[tokio::test]
    async fn corrupt_user_json_means_no_user() -> Result<(), ServiceError> {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(AUTH_TOKEN_KEY, "tok".into()).await?;
        storage.set_item(AUTH_USER_KEY, "{oops".into()).await?;
        let store = SessionStore::new(storage);
        assert!(store.user().await.is_none());
        assert!(store.is_authenticated().await);
        Ok(())
    }
}
