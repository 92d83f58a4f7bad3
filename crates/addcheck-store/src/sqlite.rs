//! `SQLite` storage for users and attempts.

// SQLite hands back i64 for counts; they are non-negative.
#![allow(clippy::cast_sign_loss)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use tracing::{debug, instrument};

use addcheck_core::error::StoreError;
use addcheck_core::model::{Attempt, AttemptId, HistoryPage, NewAttempt, PageRequest, User, UserId};
use addcheck_core::traits::{AttemptStore, Clock, SystemClock, UserStore};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS attempts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    a INTEGER NOT NULL,
    b INTEGER NOT NULL,
    student_answer INTEGER NOT NULL,
    correct_answer INTEGER NOT NULL,
    is_correct INTEGER NOT NULL,
    timestamp INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_attempts_user_recent
    ON attempts(user_id, timestamp DESC, id DESC);
";

const ATTEMPT_COLUMNS: &str =
    "id, user_id, a, b, student_answer, correct_answer, is_correct, timestamp";

/// Helper to acquire mutex lock with poison recovery.
fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("SQLite store mutex was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

fn backend(err: rusqlite::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn extended_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => Some(e.extended_code),
        _ => None,
    }
}

/// `SQLite`-backed user and attempt store.
///
/// Timestamps are stored as microseconds since the Unix epoch so ordering
/// in SQL matches chronological ordering. Foreign keys are enforced, so an
/// attempt for an unknown user is rejected by the insert itself.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
    clock: Arc<dyn Clock>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Backend(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let conn = Connection::open(&path).map_err(backend)?;
        Self::from_connection(conn, Some(path))
    }

    /// An in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        Self::from_connection(conn, None)
    }

    fn from_connection(conn: Connection, db_path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON").map_err(backend)?;
        conn.busy_timeout(Duration::from_secs(5)).map_err(backend)?;
        // In-memory databases do not support WAL.
        if let Err(e) = conn.pragma_update(None, "journal_mode", "WAL") {
            debug!("WAL journal mode unavailable: {e}");
        }
        conn.execute_batch(SCHEMA).map_err(backend)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used to stamp inserts.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the database path (None for in-memory).
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn parse_attempt_row(row: &Row<'_>) -> rusqlite::Result<Attempt> {
        Ok(Attempt {
            id: AttemptId(row.get(0)?),
            user_id: UserId(row.get(1)?),
            a: row.get(2)?,
            b: row.get(3)?,
            student_answer: row.get(4)?,
            correct_answer: row.get(5)?,
            is_correct: row.get(6)?,
            timestamp: from_micros(row, 7)?,
        })
    }

    fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: UserId(row.get(0)?),
            email: row.get(1)?,
            password_hash: row.get(2)?,
            created_at: from_micros(row, 3)?,
        })
    }
}

fn from_micros(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let micros: i64 = row.get(idx)?;
    DateTime::<Utc>::from_timestamp_micros(micros)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, micros))
}

impl AttemptStore for SqliteStore {
    #[instrument(skip(self), fields(user = %attempt.user_id))]
    fn save(&self, attempt: &NewAttempt) -> Result<AttemptId, StoreError> {
        let conn = acquire_lock(&self.conn);
        let timestamp = self.clock.now().timestamp_micros();
        let inserted = conn.execute(
            "INSERT INTO attempts (user_id, a, b, student_answer, correct_answer, is_correct, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                attempt.user_id.0,
                attempt.a,
                attempt.b,
                attempt.student_answer,
                attempt.correct_answer,
                attempt.is_correct,
                timestamp,
            ],
        );

        match inserted {
            Ok(_) => {
                let id = AttemptId(conn.last_insert_rowid());
                debug!(%id, "attempt inserted");
                Ok(id)
            }
            Err(e) if extended_code(&e) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                Err(StoreError::UserNotFound(attempt.user_id))
            }
            Err(e) => Err(backend(e)),
        }
    }

    fn list_for_user(&self, user: UserId, page: PageRequest) -> Result<HistoryPage, StoreError> {
        let conn = acquire_lock(&self.conn);
        let total: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM attempts WHERE user_id = ?1",
                params![user.0],
                |row| row.get(0),
            )
            .map_err(backend)?;

        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {ATTEMPT_COLUMNS} FROM attempts
                 WHERE user_id = ?1
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?2 OFFSET ?3"
            ))
            .map_err(backend)?;
        let items = stmt
            .query_map(
                params![user.0, i64::from(page.per_page()), offset],
                Self::parse_attempt_row,
            )
            .map_err(backend)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(backend)?;

        Ok(HistoryPage {
            items,
            total: total as u64,
            page: page.page(),
            per_page: page.per_page(),
        })
    }

    fn get(&self, id: AttemptId) -> Result<Option<Attempt>, StoreError> {
        let conn = acquire_lock(&self.conn);
        conn.query_row(
            &format!("SELECT {ATTEMPT_COLUMNS} FROM attempts WHERE id = ?1"),
            params![id.0],
            Self::parse_attempt_row,
        )
        .optional()
        .map_err(backend)
    }
}

impl UserStore for SqliteStore {
    fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let conn = acquire_lock(&self.conn);
        let created_at = self.clock.now();
        let inserted = conn.execute(
            "INSERT INTO users (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
            params![email, password_hash, created_at.timestamp_micros()],
        );

        match inserted {
            Ok(_) => {
                let id = UserId(conn.last_insert_rowid());
                debug!(%id, "user created");
                conn.query_row(
                    "SELECT id, email, password_hash, created_at FROM users WHERE id = ?1",
                    params![id.0],
                    Self::parse_user_row,
                )
                .map_err(backend)
            }
            Err(e) if extended_code(&e) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                Err(StoreError::DuplicateEmail(email.to_string()))
            }
            Err(e) => Err(backend(e)),
        }
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let conn = acquire_lock(&self.conn);
        conn.query_row(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?1",
            params![email],
            Self::parse_user_row,
        )
        .optional()
        .map_err(backend)
    }

    fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let conn = acquire_lock(&self.conn);
        conn.query_row(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = ?1",
            params![id.0],
            Self::parse_user_row,
        )
        .optional()
        .map_err(backend)
    }
}
