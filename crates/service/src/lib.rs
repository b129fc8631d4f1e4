//! Client library for the complaint portal API.
//! - Session persistence, endpoint-fallback HTTP client and role guard.
//! - Domain services for students, departments and admins.
//! - `ComplaintBoard` drives every complaint list view.

pub mod errors;
pub mod storage;
pub mod session;
pub mod http;
pub mod routing;
pub mod guard;
pub mod auth;
pub mod complaints;
pub mod admin;
pub mod users;
pub mod board;
pub mod runtime;
#[cfg(test)]
pub mod test_support;

pub use errors::{ApiError, ServiceError};
pub use runtime::Portal;
