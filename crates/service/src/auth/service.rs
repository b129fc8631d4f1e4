use std::sync::Arc;

use models::{normalize_role, RoleName, Session, UserRecord};
use serde_json::{json, Map, Value};
use tracing::{info, instrument, warn};

use super::domain::{LoginInput, RegisterInput};
use super::errors::AuthError;
use super::offline::OfflineDirectory;
use crate::errors::{ApiError, ServiceError};
use crate::http::{ApiClient, Method};
use crate::routing::{login_endpoints, register_endpoints};
use crate::session::SessionStore;

/// Login, registration and logout against the portal API.
///
/// When an [`OfflineDirectory`] is configured it is consulted only if the
/// backend produced no HTTP response at all.
pub struct AuthService {
    client: Arc<ApiClient>,
    sessions: Arc<SessionStore>,
    offline: Option<OfflineDirectory>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>, sessions: Arc<SessionStore>) -> Self {
        Self { client, sessions, offline: None }
    }

    pub fn with_offline_fallback(mut self, directory: OfflineDirectory) -> Self {
        self.offline = Some(directory);
        self
    }

    #[instrument(skip(self, input), fields(email = %input.email, role = ?input.role))]
    pub async fn login(&self, input: LoginInput) -> Result<Session, ServiceError> {
        input.validate()?;
        let role = normalize_role(input.role.as_deref());
        let email = input.email.trim();

        let outcome = self
            .post_credentials(login_endpoints(role.as_ref().map(RoleName::as_str)), json!({ "email": email, "password": input.password }))
            .await;
        let session = match outcome {
            Ok(raw) => normalize_login_response(&raw, role.as_ref(), email)?,
            Err(e) => match (&self.offline, e.is_network_unavailable()) {
                (Some(offline), true) => {
                    warn!(error = %e, "backend unreachable; trying offline accounts");
                    offline.login(email, &input.password, role.as_ref().map(RoleName::as_str)).await?
                }
                _ => return Err(e.into()),
            },
        };
        self.sessions.save(&session).await?;
        info!(user = %session.user.display_name(email), "logged in");
        Ok(session)
    }

    /// Registers and signs in. A registration response without a token is
    /// followed by a regular login with the same credentials.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<Session, ServiceError> {
        input.validate()?;
        let role = normalize_role(Some(input.role_or_default()));
        let role_str = role.as_ref().map(RoleName::as_str);
        let email = input.email.trim();
        let name = input.name.trim();

        let outcome = self
            .post_credentials(register_endpoints(role_str), json!({ "name": name, "email": email, "password": input.password }))
            .await;
        let raw = match outcome {
            Ok(raw) => raw,
            Err(e) => match (&self.offline, e.is_network_unavailable()) {
                (Some(offline), true) => {
                    warn!(error = %e, "backend unreachable; registering offline account");
                    let session = offline.register(name, email, &input.password, role_str).await?;
                    self.sessions.save(&session).await?;
                    return Ok(session);
                }
                _ => return Err(e.into()),
            },
        };

        match normalize_login_response(&raw, role.as_ref(), email) {
            Ok(session) => {
                self.sessions.save(&session).await?;
                info!("registered");
                Ok(session)
            }
            Err(AuthError::MissingToken) => {
                info!("registration returned no token; signing in");
                self.login(LoginInput {
                    email: email.to_string(),
                    password: input.password,
                    role: role.map(|r| r.to_string()),
                })
                .await
            }
            Err(other) => Err(other.into()),
        }
    }

    pub async fn logout(&self) -> Result<(), ServiceError> {
        self.sessions.clear().await?;
        info!("logged out");
        Ok(())
    }

    async fn post_credentials(&self, endpoints: &[&str], payload: Value) -> Result<Value, ApiError> {
        self.client.try_endpoints(Method::Post, endpoints, Some(&payload)).await
    }
}

/// Build a [`Session`] from whatever shape the login endpoint returned.
///
/// The token may sit at `access_token`, `token`, `accessToken` or
/// `data.access_token`; the user at `user` or `data.user`. The role falls
/// back to a top-level `role`, then `fallback_role`; the email to
/// `fallback_email`.
pub fn normalize_login_response(
    raw: &Value,
    fallback_role: Option<&RoleName>,
    fallback_email: &str,
) -> Result<Session, AuthError> {
    let token = ["access_token", "token", "accessToken"]
        .iter()
        .find_map(|key| non_empty_str(raw.get(key)))
        .or_else(|| non_empty_str(raw.get("data").and_then(|d| d.get("access_token"))))
        .ok_or(AuthError::MissingToken)?;

    let user_value = raw
        .get("user")
        .filter(|u| u.is_object())
        .or_else(|| raw.get("data").and_then(|d| d.get("user")).filter(|u| u.is_object()))
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    let mut user: UserRecord = serde_json::from_value(user_value).unwrap_or_default();

    let role = normalize_role(user.role.as_deref())
        .or_else(|| normalize_role(raw.get("role").and_then(Value::as_str)))
        .or_else(|| fallback_role.cloned());
    user.role = role.map(|r| r.to_string());
    if user.email.as_deref().map_or(true, str::is_empty) {
        user.email = raw
            .get("email")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(fallback_email.to_string()));
    }

    Ok(Session { access_token: token.to_string(), user })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
