//! Auth module: login/register against the API, session persistence and the
//! optional offline account directory.

pub mod domain;
pub mod errors;
pub mod offline;
pub mod service;

pub use service::AuthService;
