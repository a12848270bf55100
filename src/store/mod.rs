//! Persistence Layer
//! Mission: One store contract, two interchangeable backends
//!
//! The durable backend keeps users and submissions in SQLite; the in-memory
//! backend keeps them in process-lifetime lists. Handlers only ever see the
//! trait objects, so the backends swap without touching the HTTP layer.

use crate::auth::models::{Role, User};
use crate::config::Config;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A stored submission. `author` is the submitting user's name, resolved only
/// by backends that can join against the user table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub data: String,
    pub user_id: Option<Uuid>,
    pub author: Option<String>,
    pub created_at: String,
}

/// Store failures that handlers can tell apart.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUser,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// User records: created at registration, looked up at login. No update or
/// delete exists anywhere in the system.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError>;

    /// First match in insertion order, or `None`.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

/// Submission records: appended by users, listed by admins, never modified.
#[async_trait::async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn append(&self, data: &str, user_id: Option<Uuid>) -> Result<Submission, StoreError>;

    /// Every submission ever stored, in insertion order, unpaginated.
    async fn list_all(&self) -> Result<Vec<Submission>, StoreError>;
}

/// Open the backend selected by configuration.
///
/// `INTAKE_DB=memory` selects the in-memory lists; anything else is treated
/// as a SQLite path.
pub fn open_backend(
    config: &Config,
) -> Result<(Arc<dyn UserStore>, Arc<dyn SubmissionStore>)> {
    if config.db == "memory" {
        let store = Arc::new(MemoryStore::new(config.strict_validation));
        let users: Arc<dyn UserStore> = store.clone();
        let submissions: Arc<dyn SubmissionStore> = store;
        Ok((users, submissions))
    } else {
        let store = Arc::new(SqliteStore::new(&config.db)?);
        let users: Arc<dyn UserStore> = store.clone();
        let submissions: Arc<dyn SubmissionStore> = store;
        Ok((users, submissions))
    }
}
