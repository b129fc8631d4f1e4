//! Runtime wiring
//!
//! Builds every long-lived component from an [`AppConfig`] so binaries and
//! integration tests share one construction path.

use std::sync::Arc;

use configs::AppConfig;
use tracing::info;

use crate::admin::AdminService;
use crate::auth::offline::OfflineDirectory;
use crate::auth::AuthService;
use crate::board::{ApiBackend, BoardConfig, BoardView, ComplaintBoard};
use crate::complaints::ComplaintService;
use crate::errors::ServiceError;
use crate::guard::{AuthGuard, MismatchPolicy, Navigator};
use crate::http::ApiClient;
use crate::routing::PathResolver;
use crate::session::SessionStore;
use crate::storage::{JsonFileStorage, KeyValueStorage};
use crate::users::UserService;

/// Fully wired client.
pub struct Portal {
    pub config: AppConfig,
    pub sessions: Arc<SessionStore>,
    pub client: Arc<ApiClient>,
    pub auth: AuthService,
    pub complaints: Arc<ComplaintService>,
    pub admin: Arc<AdminService>,
    pub users: UserService,
    pub guard: AuthGuard,
}

impl Portal {
    /// Open the configured session file and build on top of it.
    pub async fn from_config(config: AppConfig, navigator: Arc<dyn Navigator>) -> Result<Self, ServiceError> {
        let storage = JsonFileStorage::open(config.storage.path.clone()).await?;
        Self::with_storage(config, storage, navigator)
    }

    pub fn with_storage(
        config: AppConfig,
        storage: Arc<dyn KeyValueStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ServiceError> {
        let sessions = Arc::new(SessionStore::new(storage.clone()));
        let client = Arc::new(ApiClient::from_config(&config.api, sessions.clone())?);

        let mut auth = AuthService::new(client.clone(), sessions.clone());
        if config.api.enable_offline_auth_fallback {
            auth = auth.with_offline_fallback(OfflineDirectory::new(storage));
        }
        let paths = PathResolver::from_config(&config.navigation);
        let guard = AuthGuard::new(sessions.clone(), paths, navigator);

        info!(base_url = %client.base_url(), offline = config.api.enable_offline_auth_fallback, "portal client ready");
        Ok(Self {
            complaints: Arc::new(ComplaintService::new(client.clone())),
            admin: Arc::new(AdminService::new(client.clone())),
            users: UserService::new(client.clone()),
            config,
            sessions,
            client,
            auth,
            guard,
        })
    }

    pub fn board(&self, view: BoardView) -> ComplaintBoard<ApiBackend> {
        self.board_with(BoardConfig::for_view(view))
    }

    pub fn board_with(&self, config: BoardConfig) -> ComplaintBoard<ApiBackend> {
        let backend = ApiBackend::new(self.complaints.clone(), self.admin.clone());
        ComplaintBoard::new(backend, config)
    }

    /// Mismatch handling for login views, from `[guard]`.
    pub fn mismatch_policy(&self) -> MismatchPolicy {
        MismatchPolicy::from(self.config.guard.logout_on_role_mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::RecordingNavigator;
    use crate::storage::MemoryStorage;
    use models::Role;

    #[tokio::test]
    async fn wires_guard_against_shared_sessions() -> Result<(), ServiceError> {
        let mut config = AppConfig::default();
        config.normalize_and_validate().map_err(|e| ServiceError::validation(e.to_string()))?;
        let nav = Arc::new(RecordingNavigator::new());
        let portal = Portal::with_storage(config, Arc::new(MemoryStorage::new()), nav.clone())?;

        assert_eq!(portal.client.base_url(), configs::LOCAL_API);
        let outcome = portal.guard.require_auth(&[Role::Admin]).await?;
        assert!(!outcome.is_allowed());
        assert_eq!(nav.last().as_deref(), Some("/index.html"));

        portal.sessions.save(&crate::test_support::session_with_role("admin")).await?;
        assert!(portal.guard.require_auth(&[Role::Admin]).await?.is_allowed());
        Ok(())
    }
}
