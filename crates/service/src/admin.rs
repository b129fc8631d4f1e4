//! Admin-only complaint management.

use std::sync::Arc;

use models::{Complaint, ComplaintStatus, Department};
use serde_json::json;
use tracing::{info, instrument};

use crate::complaints::{status_ack, status_path, DEPARTMENT_LIST_ENDPOINTS};
use crate::errors::ServiceError;
use crate::http::envelope::{decode_ack, decode_list};
use crate::http::{ApiClient, Method};

pub const ALL_COMPLAINTS_ENDPOINTS: [&str; 1] = ["/complaints"];

pub struct AdminService {
    client: Arc<ApiClient>,
}

impl AdminService {
    pub fn new(client: Arc<ApiClient>) -> Self { Self { client } }

    pub async fn all_complaints(&self) -> Result<Vec<Complaint>, ServiceError> {
        let raw = self.client.try_endpoints(Method::Get, &ALL_COMPLAINTS_ENDPOINTS, None).await?;
        Ok(decode_list(raw)?)
    }

    pub async fn departments(&self) -> Result<Vec<Department>, ServiceError> {
        let raw = self.client.try_endpoints(Method::Get, &DEPARTMENT_LIST_ENDPOINTS, None).await?;
        Ok(decode_list(raw)?)
    }

    #[instrument(skip(self))]
    pub async fn assign(&self, id: &str, department_id: &str) -> Result<Complaint, ServiceError> {
        if department_id.trim().is_empty() {
            return Err(ServiceError::validation("Please select a department first."));
        }
        let raw = self
            .client
            .patch(&format!("/complaints/{id}/assign"), &json!({ "department_id": department_id }))
            .await?;
        info!("complaint assigned");
        Ok(decode_ack(raw)?.unwrap_or_else(|| Complaint {
            id: id.to_string(),
            department_id: Some(department_id.to_string()),
            ..Default::default()
        }))
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: ComplaintStatus) -> Result<Complaint, ServiceError> {
        let raw = self.client.patch(&status_path(id), &json!({ "status": status.as_str() })).await?;
        info!("status updated");
        Ok(decode_ack(raw)?.unwrap_or_else(|| status_ack(id, status)))
    }
}
