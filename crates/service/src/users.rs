use std::sync::Arc;

use models::user::validate_name;
use models::UserProfile;
use serde_json::json;

use crate::errors::ServiceError;
use crate::http::envelope::{decode_ack, decode_one};
use crate::http::ApiClient;

pub const MY_PROFILE_ENDPOINT: &str = "/users/me";

/// Profile of the signed-in user.
pub struct UserService {
    client: Arc<ApiClient>,
}

impl UserService {
    pub fn new(client: Arc<ApiClient>) -> Self { Self { client } }

    pub async fn me(&self) -> Result<UserProfile, ServiceError> {
        let raw = self.client.get(MY_PROFILE_ENDPOINT).await?;
        Ok(decode_one(raw)?)
    }

    pub async fn update_me(&self, name: &str) -> Result<UserProfile, ServiceError> {
        validate_name(name)?;
        let name = name.trim();
        let raw = self.client.patch(MY_PROFILE_ENDPOINT, &json!({ "name": name })).await?;
        Ok(decode_ack(raw)?.unwrap_or_else(|| UserProfile { name: Some(name.to_string()), ..Default::default() }))
    }
}
