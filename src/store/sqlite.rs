//! SQLite Storage
//! Mission: Durable user and submission records

use crate::auth::models::{Role, User};
use crate::store::{StoreError, Submission, SubmissionStore, UserStore};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;
use uuid::Uuid;

/// Durable backend implementing both store contracts.
///
/// Username uniqueness is enforced by the unique index regardless of the
/// validation mode. Listings resolve the author's username with a join.
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Open (or create) the database and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS submissions (
                id TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                user_id TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            [],
        )?;

        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        let id: String = row.get(0)?;
        let role: String = row.get(3)?;
        Ok(User {
            id: Uuid::parse_str(&id).unwrap_or_default(),
            username: row.get(1)?,
            password_hash: row.get(2)?,
            role: Role::lenient(&role),
            created_at: row.get(4)?,
        })
    }
}

/// True when the error is SQLite telling us a unique index was violated.
fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation)
}

#[async_trait::async_trait]
impl UserStore for SqliteStore {
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

        let conn = Connection::open(&self.db_path)
            .context("Failed to open database")?;
        let inserted = conn.execute(
            "INSERT INTO users (id, username, password_hash, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id.to_string(),
                user.username,
                user.password_hash,
                user.role.as_str(),
                user.created_at,
            ],
        );

        match inserted {
            Ok(_) => {
                info!("Created user: {} ({})", user.username, user.role.as_str());
                Ok(user)
            }
            Err(e) if is_constraint_violation(&e) => Err(StoreError::DuplicateUser),
            Err(e) => Err(StoreError::Backend(
                anyhow::Error::new(e).context("Failed to insert user"),
            )),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let conn = Connection::open(&self.db_path)
            .context("Failed to open database")?;

        let mut stmt = conn
            .prepare(
                "SELECT id, username, password_hash, role, created_at
                 FROM users WHERE username = ?1",
            )
            .context("Failed to prepare user lookup")?;

        match stmt.query_row(params![username], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Backend(e.into())),
        }
    }
}

#[async_trait::async_trait]
impl SubmissionStore for SqliteStore {
    async fn append(&self, data: &str, user_id: Option<Uuid>) -> Result<Submission, StoreError> {
        let submission = Submission {
            id: Uuid::new_v4(),
            data: data.to_string(),
            user_id,
            author: None,
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = Connection::open(&self.db_path)
            .context("Failed to open database")?;
        conn.execute(
            "INSERT INTO submissions (id, data, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                submission.id.to_string(),
                submission.data,
                submission.user_id.map(|id| id.to_string()),
                submission.created_at,
            ],
        )
        .context("Failed to insert submission")?;

        Ok(submission)
    }

    async fn list_all(&self) -> Result<Vec<Submission>, StoreError> {
        let conn = Connection::open(&self.db_path)
            .context("Failed to open database")?;

        // rowid preserves insertion order; the join resolves the author name.
        let mut stmt = conn
            .prepare(
                "SELECT s.id, s.data, s.user_id, u.username, s.created_at
                 FROM submissions s
                 LEFT JOIN users u ON u.id = s.user_id
                 ORDER BY s.rowid",
            )
            .context("Failed to prepare submission listing")?;

        let submissions = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let user_id: Option<String> = row.get(2)?;
                Ok(Submission {
                    id: Uuid::parse_str(&id).unwrap_or_default(),
                    data: row.get(1)?,
                    user_id: user_id.and_then(|s| Uuid::parse_str(&s).ok()),
                    author: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })
            .context("Failed to query submissions")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read submission rows")?;

        Ok(submissions)
    }
}
