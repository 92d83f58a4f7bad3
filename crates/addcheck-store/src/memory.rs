//! In-memory store for tests and throwaway sessions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use addcheck_core::error::StoreError;
use addcheck_core::model::{Attempt, AttemptId, HistoryPage, NewAttempt, PageRequest, User, UserId};
use addcheck_core::traits::{AttemptStore, Clock, SystemClock, UserStore};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    attempts: Vec<Attempt>,
}

/// A store that keeps everything in mutex-guarded vectors.
///
/// Follows the same contract as [`SqliteStore`](crate::SqliteStore):
/// identifiers start at 1 and only grow, saves for unknown users fail, and
/// history is ordered by timestamp then identifier, both descending.
pub struct MemoryStore {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Number of attempts saved so far, across all users.
    pub fn attempt_count(&self) -> usize {
        self.tables().attempts.len()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AttemptStore for MemoryStore {
    fn save(&self, attempt: &NewAttempt) -> Result<AttemptId, StoreError> {
        let mut tables = self.tables();
        if !tables.users.iter().any(|u| u.id == attempt.user_id) {
            return Err(StoreError::UserNotFound(attempt.user_id));
        }
        let id = AttemptId(tables.attempts.len() as i64 + 1);
        tables.attempts.push(Attempt {
            id,
            user_id: attempt.user_id,
            a: attempt.a,
            b: attempt.b,
            student_answer: attempt.student_answer,
            correct_answer: attempt.correct_answer,
            is_correct: attempt.is_correct,
            timestamp: self.clock.now(),
        });
        Ok(id)
    }

    fn list_for_user(&self, user: UserId, page: PageRequest) -> Result<HistoryPage, StoreError> {
        let tables = self.tables();
        let mut owned: Vec<&Attempt> = tables
            .attempts
            .iter()
            .filter(|a| a.user_id == user)
            .collect();
        owned.sort_by(|x, y| y.timestamp.cmp(&x.timestamp).then(y.id.cmp(&x.id)));

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = owned
            .iter()
            .skip(offset)
            .take(page.per_page() as usize)
            .map(|a| (*a).clone())
            .collect();

        Ok(HistoryPage {
            items,
            total: owned.len() as u64,
            page: page.page(),
            per_page: page.per_page(),
        })
    }

    fn get(&self, id: AttemptId) -> Result<Option<Attempt>, StoreError> {
        let tables = self.tables();
        Ok(tables.attempts.iter().find(|a| a.id == id).cloned())
    }
}

impl UserStore for MemoryStore {
    fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail(email.to_string()));
        }
        let user = User {
            id: UserId(tables.users.len() as i64 + 1),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: self.clock.now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let tables = self.tables();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}
