//! Complaint endpoints used by students and departments.

use std::sync::Arc;

use models::{Complaint, ComplaintStatus, Department, HistoryEntry};
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::http::envelope::{decode_ack, decode_list, decode_one};
use crate::http::{ApiClient, Method};

pub const COMPLAINT_LIST_ENDPOINTS: [&str; 2] = ["/complaints/my", "/complaints"];
pub const CREATE_COMPLAINT_ENDPOINTS: [&str; 2] = ["/complaints", "/complaints/create"];
pub const DEPARTMENT_LIST_ENDPOINTS: [&str; 1] = ["/departments"];

/// Payload for a new complaint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
}

impl NewComplaint {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(ServiceError::validation("Title and description are required."));
        }
        Ok(())
    }
}

pub(crate) fn status_path(id: &str) -> String { format!("/complaints/{id}/status") }

pub(crate) fn status_ack(id: &str, status: ComplaintStatus) -> Complaint {
    Complaint { id: id.to_string(), status: status.as_str().to_string(), ..Default::default() }
}

pub struct ComplaintService {
    client: Arc<ApiClient>,
}

impl ComplaintService {
    pub fn new(client: Arc<ApiClient>) -> Self { Self { client } }

    /// Complaints visible to the signed-in user. Departments receive the
    /// complaints assigned to them.
    #[instrument(skip(self))]
    pub async fn my_complaints(&self) -> Result<Vec<Complaint>, ServiceError> {
        let raw = self.client.try_endpoints(Method::Get, &COMPLAINT_LIST_ENDPOINTS, None).await?;
        Ok(decode_list(raw)?)
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: NewComplaint) -> Result<Complaint, ServiceError> {
        input.validate()?;
        let body = NewComplaint {
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            department_id: input.department_id.filter(|d| !d.trim().is_empty()),
        };
        let body = serde_json::to_value(&body).map_err(|e| ServiceError::validation(e.to_string()))?;
        let raw = self.client.try_endpoints(Method::Post, &CREATE_COMPLAINT_ENDPOINTS, Some(&body)).await?;
        let created: Complaint = decode_one(raw)?;
        info!(id = %created.id, "complaint created");
        Ok(created)
    }

    pub async fn by_id(&self, id: &str) -> Result<Complaint, ServiceError> {
        let raw = self.client.get(&format!("/complaints/{id}")).await?;
        Ok(decode_one(raw)?)
    }

    pub async fn history(&self, id: &str) -> Result<Vec<HistoryEntry>, ServiceError> {
        let raw = self.client.get(&format!("/complaints/{id}/history")).await?;
        Ok(decode_list(raw)?)
    }

    /// A bare acknowledgement yields the requested change as the result.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: ComplaintStatus) -> Result<Complaint, ServiceError> {
        let raw = self.client.patch(&status_path(id), &json!({ "status": status.as_str() })).await?;
        Ok(decode_ack(raw)?.unwrap_or_else(|| status_ack(id, status)))
    }

    pub async fn departments(&self) -> Result<Vec<Department>, ServiceError> {
        let raw = self.client.try_endpoints(Method::Get, &DEPARTMENT_LIST_ENDPOINTS, None).await?;
        Ok(decode_list(raw)?)
    }
}
