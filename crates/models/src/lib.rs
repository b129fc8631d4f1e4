//! Domain records exchanged with the complaint portal API.
//!
//! Everything here is plain data plus pure normalization helpers; no I/O.

pub mod errors;
pub mod role;
pub mod session;
pub mod complaint;
pub mod department;
pub mod user;

pub use complaint::{Complaint, ComplaintStatus, HistoryEntry};
pub use department::Department;
pub use role::{normalize_role, Role, RoleName};
pub use session::{Session, UserRecord};
pub use user::UserProfile;

/// Accept ids sent either as JSON strings or numbers.
pub(crate) mod lenient_id {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }
}

/// `null` reads as an empty string.
pub(crate) mod lenient_string {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }
}
