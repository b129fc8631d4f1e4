use serde::{Deserialize, Serialize};

use super::errors::AuthError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    /// Role of the login view; required.
    pub role: Option<String>,
}

impl LoginInput {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.role.as_deref().map_or(true, |r| r.trim().is_empty()) {
            return Err(AuthError::Validation("Missing role configuration for this login page.".into()));
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation("Email and password are required.".into()));
        }
        Ok(())
    }
}

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Defaults to student when absent.
    pub role: Option<String>,
}

impl RegisterInput {
    pub fn validate(&self) -> Result<(), AuthError> {
        if [self.name.trim(), self.email.trim(), self.password.as_str(), self.confirm_password.as_str()].iter().any(|f| f.is_empty()) {
            return Err(AuthError::Validation("All fields are required.".into()));
        }
        models::user::validate_email(self.email.trim()).map_err(|e| AuthError::Validation(e.to_string()))?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!("Password must be at least {MIN_PASSWORD_LEN} characters.")));
        }
        if self.password != self.confirm_password {
            return Err(AuthError::Validation("Passwords do not match.".into()));
        }
        Ok(())
    }

    pub fn role_or_default(&self) -> &str {
        self.role.as_deref().filter(|r| !r.trim().is_empty()).unwrap_or("student")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(name: &str, password: &str, confirm: &str) -> RegisterInput {
        RegisterInput {
            name: name.into(),
            email: "asha@campus.edu".into(),
            password: password.into(),
            confirm_password: confirm.into(),
            role: None,
        }
    }

    #[test]
    fn register_validation_messages() {
        let msg = |r: RegisterInput| r.validate().unwrap_err().to_string();
        assert_eq!(msg(reg("", "secret1", "secret1")), "All fields are required.");
        assert_eq!(msg(reg("Asha", "abc", "abc")), "Password must be at least 6 characters.");
        assert_eq!(msg(reg("Asha", "secret1", "secret2")), "Passwords do not match.");
        assert!(reg("Asha", "secret1", "secret1").validate().is_ok());
        assert_eq!(reg("Asha", "secret1", "secret1").role_or_default(), "student");
    }

    #[test]
    fn login_requires_role() {
        let input = LoginInput { email: "a@b.io".into(), password: "x".into(), role: None };
        assert_eq!(input.validate().unwrap_err().to_string(), "Missing role configuration for this login page.");
        let input = LoginInput { role: Some("admin".into()), ..input };
        assert!(input.validate().is_ok());
    }
}
