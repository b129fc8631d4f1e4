use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("Login response did not include an access token.")]
    MissingToken,
    #[error("Backend is offline. Use a registered local account first.")]
    OfflineAccountNotFound,
    #[error("This email is already registered in offline mode.")]
    OfflineConflict,
    #[error("hashing error: {0}")]
    HashError(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::MissingToken => 1002,
            AuthError::OfflineAccountNotFound => 1003,
            AuthError::OfflineConflict => 1004,
            AuthError::HashError(_) => 1101,
        }
    }
}
