//! Role-based access decisions taken at the start of every view.

use std::sync::{Arc, Mutex};

use models::{Role, RoleName, UserRecord};
use tracing::info;

use crate::errors::ServiceError;
use crate::routing::PathResolver;
use crate::session::SessionStore;

/// Where redirects go. The browser would replace `window.location`; the CLI
/// prints the target; tests record it.
pub trait Navigator: Send + Sync {
    fn replace(&self, target: &str);
}

/// Navigator that only remembers where it was sent.
#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self { Self::default() }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.visits().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, target: &str) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(target.to_string());
        }
    }
}

/// What the stored session says about access to a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessState {
    Anonymous,
    /// Role is allowed, or the view accepts any authenticated user.
    Matching(Option<RoleName>),
    WrongRole(Role),
    UnknownRole,
}

/// Pure classification of a stored session against a view's allowed roles.
pub fn classify(authenticated: bool, user: Option<&UserRecord>, allowed: &[Role]) -> AccessState {
    if !authenticated {
        return AccessState::Anonymous;
    }
    let role = user.and_then(UserRecord::role_name);
    if allowed.is_empty() {
        return AccessState::Matching(role);
    }
    match role.as_ref().and_then(RoleName::known) {
        Some(r) if allowed.contains(&r) => AccessState::Matching(role),
        Some(r) => AccessState::WrongRole(r),
        None => AccessState::UnknownRole,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allowed,
    Redirected { to: String, session_cleared: bool },
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool { matches!(self, GuardOutcome::Allowed) }
}

/// Outcome on login/register views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginPageOutcome {
    ShowForm { session_cleared: bool },
    Redirected { to: String },
}

/// What a login page does with a session for some other role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchPolicy {
    KeepSession,
    ClearSession,
}

impl From<bool> for MismatchPolicy {
    fn from(clear: bool) -> Self {
        if clear { MismatchPolicy::ClearSession } else { MismatchPolicy::KeepSession }
    }
}

pub struct AuthGuard {
    sessions: Arc<SessionStore>,
    paths: PathResolver,
    navigator: Arc<dyn Navigator>,
}

impl AuthGuard {
    pub fn new(sessions: Arc<SessionStore>, paths: PathResolver, navigator: Arc<dyn Navigator>) -> Self {
        Self { sessions, paths, navigator }
    }

    pub fn paths(&self) -> &PathResolver { &self.paths }

    pub async fn access_state(&self, allowed: &[Role]) -> AccessState {
        let authenticated = self.sessions.is_authenticated().await;
        let user = if authenticated { self.sessions.user().await } else { None };
        classify(authenticated, user.as_ref(), allowed)
    }

    /// Gate a protected view. Anything but `Allowed` has already navigated.
    pub async fn require_auth(&self, allowed: &[Role]) -> Result<GuardOutcome, ServiceError> {
        let outcome = match self.access_state(allowed).await {
            AccessState::Matching(_) => return Ok(GuardOutcome::Allowed),
            AccessState::Anonymous => GuardOutcome::Redirected { to: self.paths.home_path(), session_cleared: false },
            AccessState::WrongRole(role) => GuardOutcome::Redirected {
                to: self.paths.dashboard_path(Some(role.as_str())),
                session_cleared: false,
            },
            AccessState::UnknownRole => {
                self.sessions.clear().await?;
                GuardOutcome::Redirected { to: self.paths.home_path(), session_cleared: true }
            }
        };
        if let GuardOutcome::Redirected { to, .. } = &outcome {
            self.navigator.replace(to);
        }
        Ok(outcome)
    }

    /// On login/register views: skip the form when already signed in with
    /// the expected role (or any role when none is expected).
    pub async fn redirect_if_logged_in(
        &self,
        expected: Option<Role>,
        policy: MismatchPolicy,
    ) -> Result<LoginPageOutcome, ServiceError> {
        if !self.sessions.is_authenticated().await {
            return Ok(LoginPageOutcome::ShowForm { session_cleared: false });
        }

        let role = self.sessions.user().await.as_ref().and_then(UserRecord::role_name);
        let Some(current) = role.as_ref().and_then(RoleName::known) else {
            self.sessions.clear().await?;
            return Ok(LoginPageOutcome::ShowForm { session_cleared: true });
        };

        if expected.is_some_and(|want| want != current) {
            let cleared = policy == MismatchPolicy::ClearSession;
            if cleared {
                self.sessions.clear().await?;
            }
            return Ok(LoginPageOutcome::ShowForm { session_cleared: cleared });
        }

        let to = self.paths.dashboard_path(Some(current.as_str()));
        self.navigator.replace(&to);
        Ok(LoginPageOutcome::Redirected { to })
    }

    /// Drop the session and go to the role's login page.
    pub async fn logout_and_redirect(&self, role: &str) -> Result<String, ServiceError> {
        self.sessions.clear().await?;
        let to = self.paths.login_path(Some(role));
        info!(%role, "signed out");
        self.navigator.replace(&to);
        Ok(to)
    }
}
