use common::text::{format_date, prefix, short_id, truncate};
use models::{Complaint, ComplaintStatus};
use serde::Serialize;

pub const UNASSIGNED: &str = "Unassigned";
pub const UNKNOWN_SUBMITTER: &str = "Unknown";

/// One printable line of a complaint table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplaintRow {
    pub id: String,
    pub short_id: String,
    pub title: String,
    pub department: String,
    pub submitter: String,
    pub status: String,
    pub status_label: String,
    pub badge: &'static str,
    pub created: String,
}

impl ComplaintRow {
    pub fn project(complaint: &Complaint, title_width: usize) -> Self {
        let department = match (&complaint.department_name, &complaint.department_id) {
            (Some(name), _) if !name.trim().is_empty() => name.clone(),
            (_, Some(id)) if !id.is_empty() => prefix(id, 8).to_string(),
            _ => UNASSIGNED.to_string(),
        };
        let submitter = complaint
            .user_id
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(|u| prefix(u, 12).to_string())
            .unwrap_or_else(|| UNKNOWN_SUBMITTER.to_string());
        ComplaintRow {
            id: complaint.id.clone(),
            short_id: short_id(&complaint.id),
            title: truncate(&complaint.title, title_width),
            department,
            submitter,
            status: complaint.normalized_status(),
            status_label: complaint.status_label(),
            badge: ComplaintStatus::badge_class(complaint.status_kind()),
            created: format_date(complaint.created_at.as_deref()),
        }
    }
}
