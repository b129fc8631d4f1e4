use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Profile returned by `/users/me`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "crate::lenient_id::deserialize")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !email.contains('@') { return Err(ModelError::Validation("Please enter a valid email address.".into())); }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() { return Err(ModelError::Validation("Name is required.".into())); }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validators() {
        assert!(validate_email("a@b.io").is_ok());
        assert!(validate_email("ab.io").is_err());
        assert!(validate_name("  ").is_err());
        assert!(validate_name("Asha").is_ok());
    }
}
