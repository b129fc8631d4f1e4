use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Canonical portal roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Department,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Department, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Department => "department",
            Role::Admin => "admin",
        }
    }

    fn from_alias(normalized: &str) -> Option<Role> {
        match normalized {
            "user" | "student" => Some(Role::Student),
            "department" => Some(Role::Department),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_role(Some(s)) {
            Some(RoleName::Known(role)) => Ok(role),
            _ => Err(ModelError::Validation(format!("unknown role: {}", s.trim()))),
        }
    }
}

/// Result of role normalization: a canonical role, or the cleaned-up input
/// when it names nothing we know.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleName {
    Known(Role),
    Other(String),
}

impl RoleName {
    pub fn as_str(&self) -> &str {
        match self {
            RoleName::Known(role) => role.as_str(),
            RoleName::Other(raw) => raw,
        }
    }

    pub fn known(&self) -> Option<Role> {
        match self {
            RoleName::Known(role) => Some(*role),
            RoleName::Other(_) => None,
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Role> for RoleName {
    fn from(role: Role) -> Self {
        RoleName::Known(role)
    }
}

/// Trim, lowercase and collapse aliases (`user` → `student`).
///
/// Absent or blank input yields `None`; unrecognized input is passed through
/// in its cleaned form. Normalizing an already-normalized value is a no-op.
pub fn normalize_role(input: Option<&str>) -> Option<RoleName> {
    let cleaned = input?.trim().to_lowercase();
    if cleaned.is_empty() {
        return None;
    }
    Some(match Role::from_alias(&cleaned) {
        Some(role) => RoleName::Known(role),
        None => RoleName::Other(cleaned),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_alias_collapses_to_student() {
        assert_eq!(normalize_role(Some("USER ")), Some(RoleName::Known(Role::Student)));
        assert_eq!(normalize_role(Some("Student")), Some(RoleName::Known(Role::Student)));
    }

    #[test]
    fn absent_or_blank_is_no_role() {
        assert_eq!(normalize_role(None), None);
        assert_eq!(normalize_role(Some("")), None);
        assert_eq!(normalize_role(Some("   ")), None);
    }

    #[test]
    fn unknown_passes_through_cleaned() {
        assert_eq!(normalize_role(Some(" Guest ")), Some(RoleName::Other("guest".into())));
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["admin", "USER ", "Department", " guest"] {
            let once = normalize_role(Some(raw)).expect("role");
            let twice = normalize_role(Some(once.as_str())).expect("role");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("guest".parse::<Role>().is_err());
    }
}
