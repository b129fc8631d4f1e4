//! Shared helpers for the portal workspace: logging setup and small
//! text/date formatting utilities used when projecting API records into
//! printable rows.

pub mod utils;

pub use utils::text;
