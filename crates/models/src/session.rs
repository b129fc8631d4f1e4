use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::role::{normalize_role, RoleName};

/// Minimal user record kept alongside the access token.
///
/// Fields the server sends beyond the four we care about are preserved in
/// `extra` so nothing is lost when the record is written back to storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, deserialize_with = "crate::lenient_id::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn role_name(&self) -> Option<RoleName> {
        normalize_role(self.role.as_deref())
    }

    /// Name, else email, else the given fallback.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.email.as_deref().filter(|e| !e.is_empty()))
            .unwrap_or(fallback)
    }
}

/// Authenticated session: bearer token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: UserRecord,
}
