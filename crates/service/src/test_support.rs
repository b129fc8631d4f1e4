#![cfg(test)]
use std::sync::Arc;

use models::{Session, UserRecord};

use crate::session::SessionStore;
use crate::storage::MemoryStorage;

pub fn memory_sessions() -> Arc<SessionStore> {
    Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())))
}

pub fn session_with_role(role: &str) -> Session {
    Session {
        access_token: format!("token-{role}"),
        user: UserRecord {
            id: Some(format!("{role}-1")),
            name: Some(format!("{role} user")),
            email: Some(format!("{role}@campus.edu")),
            role: Some(role.to_string()),
            ..Default::default()
        },
    }
}
