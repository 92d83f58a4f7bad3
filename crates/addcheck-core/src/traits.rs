//! Storage and clock seams.
//!
//! Implemented by the `addcheck-store` crate (SQLite and in-memory).

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::model::{Attempt, AttemptId, HistoryPage, NewAttempt, PageRequest, User, UserId};

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of insert timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Server wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ---------------------------------------------------------------------------
// Attempt storage
// ---------------------------------------------------------------------------

/// Persistence for attempts.
pub trait AttemptStore: Send + Sync {
    /// Insert one attempt as a single atomic write, stamping it with the
    /// store clock and the next identifier.
    ///
    /// Fails with [`StoreError::UserNotFound`] if `attempt.user_id` does not
    /// reference an existing user.
    fn save(&self, attempt: &NewAttempt) -> Result<AttemptId, StoreError>;

    /// A page of the user's attempts, newest first: timestamp descending,
    /// ties broken by identifier descending. Pages past the end are empty.
    fn list_for_user(&self, user: UserId, page: PageRequest) -> Result<HistoryPage, StoreError>;

    fn get(&self, id: AttemptId) -> Result<Option<Attempt>, StoreError>;
}

// ---------------------------------------------------------------------------
// User storage
// ---------------------------------------------------------------------------

/// Registration data for users. Password hashing and verification belong to
/// the authentication collaborator; the store only keeps the hash.
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken.
    fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError>;
}
