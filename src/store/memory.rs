//! In-Memory Storage
//! Mission: Process-lifetime user and submission lists behind one lock each
//!
//! Everything here is lost on restart. The lenient default reproduces the
//! legacy behavior of never checking usernames for uniqueness; strict mode
//! does the duplicate check and the insert under a single write lock, so
//! concurrent registrations cannot both slip through.

use crate::auth::models::{Role, User};
use crate::store::{StoreError, Submission, SubmissionStore, UserStore};
use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

/// In-memory backend implementing both store contracts.
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    submissions: RwLock<Vec<Submission>>,
    strict: bool,
}

impl MemoryStore {
    pub fn new(strict: bool) -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            submissions: RwLock::new(Vec::new()),
            strict,
        }
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: Utc::now().to_rfc3339(),
        };

        let mut users = self.users.write();
        if self.strict && users.iter().any(|u| u.username == username) {
            return Err(StoreError::DuplicateUser);
        }
        users.push(user.clone());

        info!("Created user: {} ({})", user.username, user.role.as_str());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}

#[async_trait::async_trait]
impl SubmissionStore for MemoryStore {
    async fn append(&self, data: &str, user_id: Option<Uuid>) -> Result<Submission, StoreError> {
        let submission = Submission {
            id: Uuid::new_v4(),
            data: data.to_string(),
            user_id,
            author: None, // no username resolution in this backend
            created_at: Utc::now().to_rfc3339(),
        };

        self.submissions.write().push(submission.clone());
        Ok(submission)
    }

    async fn list_all(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(self.submissions.read().clone())
    }
}
