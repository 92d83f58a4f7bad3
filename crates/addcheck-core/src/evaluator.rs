//! Answer evaluation.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Outcome of checking one submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// The canonical result `a + b`.
    pub correct: i64,
    pub is_correct: bool,
}

/// Check `submitted` against `a + b`.
///
/// Pure. Operand bounds are a UI concern and are not enforced here, but a
/// sum that does not fit in an `i64` is rejected as
/// [`InputError::SumOutOfRange`], so `correct` is always exactly `a + b`.
pub fn evaluate(a: i64, b: i64, submitted: i64) -> Result<Evaluation, InputError> {
    let correct = a.checked_add(b).ok_or(InputError::SumOutOfRange { a, b })?;
    Ok(Evaluation {
        correct,
        is_correct: submitted == correct,
    })
}
