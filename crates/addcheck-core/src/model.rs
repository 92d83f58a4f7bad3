//! Core data model types for addcheck.
//!
//! Users, attempts, pagination and the practice problems handed to users.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::evaluator::{evaluate, Evaluation};

/// Stable user identifier handed in by the authentication collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned to an attempt by the store. Monotonically increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(pub i64);

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user.
///
/// Note: Custom Debug impl masks the password hash to keep it out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"***")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// One stored submission and its evaluation outcome. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub id: AttemptId,
    pub user_id: UserId,
    pub a: i64,
    pub b: i64,
    pub student_answer: i64,
    pub correct_answer: i64,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}

/// Insert payload for an attempt. The store assigns `id` and `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttempt {
    pub user_id: UserId,
    pub a: i64,
    pub b: i64,
    pub student_answer: i64,
    pub correct_answer: i64,
    pub is_correct: bool,
}

impl NewAttempt {
    /// Evaluate the submission and build the insert payload from the result.
    pub fn new(user_id: UserId, a: i64, b: i64, student_answer: i64) -> Result<Self, InputError> {
        let evaluation = evaluate(a, b, student_answer)?;
        Ok(Self::from_evaluation(user_id, a, b, student_answer, evaluation))
    }

    /// Build the payload from an evaluation that has already been computed.
    pub fn from_evaluation(
        user_id: UserId,
        a: i64,
        b: i64,
        student_answer: i64,
        evaluation: Evaluation,
    ) -> Self {
        Self {
            user_id,
            a,
            b,
            student_answer,
            correct_answer: evaluation.correct,
            is_correct: evaluation.is_correct,
        }
    }
}

/// Default number of attempts shown per history page.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// A 1-based page request. Page 0 is treated as page 1 and a page size of
/// 0 as a page size of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// One page of a user's attempt history, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub items: Vec<Attempt>,
    /// Total attempts for the user across all pages.
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl HistoryPage {
    pub fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: request.page(),
            per_page: request.per_page(),
        }
    }

    /// Number of pages needed to show every attempt.
    pub fn pages(&self) -> u32 {
        let per_page = u64::from(self.per_page.max(1));
        u32::try_from(self.total.div_ceil(per_page)).unwrap_or(u32::MAX)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages()
    }
}

/// Upper bound used for operands of generated problems.
pub const DEFAULT_MAX_OPERAND: i64 = 10;

/// An addition problem offered to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub a: i64,
    pub b: i64,
}

impl Problem {
    /// Draw both operands uniformly from `0..=max_operand`.
    pub fn random(max_operand: i64) -> Self {
        Self::random_with(&mut rand::thread_rng(), max_operand)
    }

    pub fn random_with<R: Rng + ?Sized>(rng: &mut R, max_operand: i64) -> Self {
        let max = max_operand.max(0);
        Self {
            a: rng.gen_range(0..=max),
            b: rng.gen_range(0..=max),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = ?", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_attempt_carries_evaluation() {
        let attempt = NewAttempt::new(UserId(1), 3, 4, 8).unwrap();
        assert_eq!(attempt.correct_answer, 7);
        assert!(!attempt.is_correct);
        assert_eq!(attempt.student_answer, 8);
        assert!(NewAttempt::new(UserId(1), i64::MAX, 1, 0).is_err());
    }

    #[test]
    fn page_request_clamps_to_one() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page(), 1);
        assert_eq!(req.per_page(), 1);
        assert_eq!(req.offset(), 0);

        assert_eq!(PageRequest::new(3, 10).offset(), 20);
    }

    #[test]
    fn history_page_navigation() {
        let page = HistoryPage {
            items: vec![],
            total: 25,
            page: 2,
            per_page: 10,
        };
        assert_eq!(page.pages(), 3);
        assert!(page.has_prev());
        assert!(page.has_next());

        let last = HistoryPage { page: 3, ..page };
        assert!(!last.has_next());

        let empty = HistoryPage::empty(PageRequest::default());
        assert_eq!(empty.pages(), 0);
        assert!(!empty.has_prev());
        assert!(!empty.has_next());
    }

    #[test]
    fn random_problem_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let p = Problem::random_with(&mut rng, DEFAULT_MAX_OPERAND);
            assert!((0..=10).contains(&p.a));
            assert!((0..=10).contains(&p.b));
        }
    }

    #[test]
    fn user_debug_masks_password() {
        let user = User {
            id: UserId(1),
            email: "kid@example.com".into(),
            password_hash: "pbkdf2:secret".into(),
            created_at: Utc::now(),
        };
        let debug = format!("{user:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("***"));
    }
}
