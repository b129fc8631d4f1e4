//! HTTP plumbing: the bearer-authenticated JSON client, the ordered endpoint
//! fallback and response envelope unwrapping.

pub mod client;
pub mod envelope;
pub mod fallback;

pub use client::{ApiClient, Method};
pub use fallback::{first_available, FallbackPolicy};
