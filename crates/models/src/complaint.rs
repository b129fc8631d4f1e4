use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Complaint lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    Assigned,
    InProgress,
    Resolved,
    Escalated,
    Rejected,
}

/// Lowercase, trim and turn inner spaces into underscores, so `"In Progress"`
/// and `"in_progress"` compare equal.
pub fn normalize_status(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 6] = [
        ComplaintStatus::Pending,
        ComplaintStatus::Assigned,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Escalated,
        ComplaintStatus::Rejected,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_status(raw).as_str() {
            "pending" => Some(Self::Pending),
            "assigned" => Some(Self::Assigned),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "escalated" => Some(Self::Escalated),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Escalated => "escalated",
            Self::Rejected => "rejected",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Escalated => "Escalated",
            Self::Rejected => "Rejected",
        }
    }

    /// Three-way visual bucket used by every list view.
    pub fn badge_class(status: Option<Self>) -> &'static str {
        match status {
            Some(Self::Resolved) => "resolved",
            Some(Self::Escalated) => "escalated",
            _ => "pending",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComplaintStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ModelError::UnknownStatus(s.trim().to_string()))
    }
}

/// Complaint as returned by the API. Read-only from the client's side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    #[serde(default, deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::lenient_string::deserialize")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::lenient_string::deserialize")]
    pub description: String,
    #[serde(default, deserialize_with = "crate::lenient_string::deserialize")]
    pub status: String,
    #[serde(default, deserialize_with = "crate::lenient_id::deserialize")]
    pub department_id: Option<String>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient_id::deserialize")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(crate::lenient_id::deserialize(deserializer)?.unwrap_or_default())
}

impl Complaint {
    pub fn status_kind(&self) -> Option<ComplaintStatus> {
        ComplaintStatus::parse(&self.status)
    }

    pub fn normalized_status(&self) -> String {
        normalize_status(&self.status)
    }

    /// Label from the status table, else the raw normalized value.
    pub fn status_label(&self) -> String {
        match self.status_kind() {
            Some(s) => s.label().to_string(),
            None => self.normalized_status(),
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.department_id.as_deref().map_or(true, str::is_empty)
    }

    /// Overlay fields from a server update, keeping what the update omits.
    pub fn merge(&mut self, update: Complaint) {
        if !update.title.is_empty() { self.title = update.title; }
        if !update.description.is_empty() { self.description = update.description; }
        if !update.status.is_empty() { self.status = update.status; }
        if update.department_id.is_some() { self.department_id = update.department_id; }
        if update.department_name.is_some() { self.department_name = update.department_name; }
        if update.user_id.is_some() { self.user_id = update.user_id; }
        if update.created_at.is_some() { self.created_at = update.created_at; }
        if update.updated_at.is_some() { self.updated_at = update.updated_at; }
    }
}

/// One audit line in a complaint's history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HistoryEntry {
    pub fn readable_action(&self) -> String {
        let action = self.action.as_deref().unwrap_or("").trim();
        if action.is_empty() {
            "Updated".to_string()
        } else {
            action.replace('_', " ")
        }
    }
}
