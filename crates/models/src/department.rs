use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(default, deserialize_with = "crate::lenient_id::deserialize")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient_string::deserialize")]
    pub name: String,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub department_code: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
