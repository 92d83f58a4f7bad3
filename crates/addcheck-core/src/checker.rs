//! The check-answer pipeline.
//!
//! Evaluate, persist, then annotate. The attempt is committed before any
//! annotation work starts, and annotation failures are logged and dropped:
//! the caller always gets the evaluation result once the save succeeded.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::annotator::{annotate_to_string, GraphFormat};
use crate::error::{CheckError, InputError};
use crate::evaluator::{evaluate, Evaluation};
use crate::model::{AttemptId, NewAttempt, UserId};
use crate::ontology::OntologyContext;
use crate::traits::AttemptStore;

/// Raw form fields as submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub a: String,
    pub b: String,
    pub answer: String,
}

impl Submission {
    pub fn new(a: impl Into<String>, b: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            answer: answer.into(),
        }
    }

    /// Parse all three fields, reporting the first one that is not an integer.
    pub fn parse(&self) -> Result<(i64, i64, i64), InputError> {
        Ok((
            parse_field("a", &self.a)?,
            parse_field("b", &self.b)?,
            parse_field("answer", &self.answer)?,
        ))
    }
}

/// Parse one integer field, ignoring surrounding whitespace.
pub fn parse_field(field: &'static str, value: &str) -> Result<i64, InputError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| InputError::NotAnInteger {
            field,
            value: value.to_string(),
        })
}

/// The check-answer result payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub attempt_id: AttemptId,
    pub is_correct: bool,
    pub correct: i64,
    pub message: String,
    /// Serialized semantic record; `None` if annotation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

/// User-facing feedback line.
pub fn feedback_message(a: i64, b: i64, evaluation: Evaluation) -> String {
    if evaluation.is_correct {
        format!("Correct! {a} + {b} = {}", evaluation.correct)
    } else {
        format!("Try again. {a} + {b} = {}", evaluation.correct)
    }
}

/// Runs check-answer requests against a shared ontology and store.
pub struct AnswerChecker<'a, S: ?Sized> {
    ontology: &'a OntologyContext,
    store: &'a S,
    format: GraphFormat,
}

impl<'a, S: AttemptStore + ?Sized> AnswerChecker<'a, S> {
    pub fn new(ontology: &'a OntologyContext, store: &'a S) -> Self {
        Self {
            ontology,
            store,
            format: GraphFormat::default(),
        }
    }

    /// Syntax used for the serialized semantic record.
    pub fn with_format(mut self, format: GraphFormat) -> Self {
        self.format = format;
        self
    }

    /// Validate raw input, then run [`check_values`](Self::check_values).
    pub fn check(&self, user: UserId, submission: &Submission) -> Result<CheckOutcome, CheckError> {
        let (a, b, answer) = submission.parse()?;
        self.check_values(user, a, b, answer)
    }

    pub fn check_values(
        &self,
        user: UserId,
        a: i64,
        b: i64,
        submitted: i64,
    ) -> Result<CheckOutcome, CheckError> {
        let evaluation = evaluate(a, b, submitted)?;
        let attempt = NewAttempt::from_evaluation(user, a, b, submitted, evaluation);
        let attempt_id = self.store.save(&attempt)?;
        debug!(%user, %attempt_id, is_correct = evaluation.is_correct, "attempt saved");

        let annotation =
            match annotate_to_string(self.ontology, attempt_id, a, b, submitted, self.format) {
                Ok(text) => {
                    info!(%attempt_id, "student attempt ({}):\n{text}", self.format);
                    Some(text)
                }
                Err(e) => {
                    warn!(%attempt_id, "semantic annotation failed: {e}");
                    None
                }
            };

        Ok(CheckOutcome {
            attempt_id,
            is_correct: evaluation.is_correct,
            correct: evaluation.correct,
            message: feedback_message(a, b, evaluation),
            annotation,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use oxrdf::Graph;

    use super::*;
    use crate::error::StoreError;
    use crate::model::{Attempt, HistoryPage, PageRequest};
    use crate::ontology::OntologyFormat;

    /// Accepts saves for user 1 only and hands out ids from 100.
    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<NewAttempt>>,
    }

    impl AttemptStore for RecordingStore {
        fn save(&self, attempt: &NewAttempt) -> Result<AttemptId, StoreError> {
            if attempt.user_id != UserId(1) {
                return Err(StoreError::UserNotFound(attempt.user_id));
            }
            let mut saved = self.saved.lock().unwrap();
            saved.push(*attempt);
            Ok(AttemptId(99 + saved.len() as i64))
        }

        fn list_for_user(&self, _: UserId, page: PageRequest) -> Result<HistoryPage, StoreError> {
            Ok(HistoryPage::empty(page))
        }

        fn get(&self, _: AttemptId) -> Result<Option<Attempt>, StoreError> {
            Ok(None)
        }
    }

    fn ontology() -> OntologyContext {
        OntologyContext::from_reader(
            include_str!("../../../ontology/math-addition.ttl").as_bytes(),
            OntologyFormat::Turtle,
        )
        .unwrap()
    }

    #[test]
    fn correct_answer_end_to_end() {
        let ctx = ontology();
        let store = RecordingStore::default();
        let checker = AnswerChecker::new(&ctx, &store);

        let outcome = checker.check_values(UserId(1), 3, 4, 7).unwrap();
        assert!(outcome.is_correct);
        assert_eq!(outcome.correct, 7);
        assert_eq!(outcome.message, "Correct! 3 + 4 = 7");
        assert_eq!(outcome.attempt_id, AttemptId(100));

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].correct_answer, 7);
        assert!(saved[0].is_correct);
    }

    #[test]
    fn wrong_answer_end_to_end() {
        let ctx = ontology();
        let store = RecordingStore::default();
        let outcome = AnswerChecker::new(&ctx, &store)
            .check_values(UserId(1), 3, 4, 8)
            .unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.correct, 7);
        assert_eq!(outcome.message, "Try again. 3 + 4 = 7");
    }

    #[test]
    fn annotation_uses_store_assigned_id() {
        let ctx = ontology();
        let store = RecordingStore::default();
        let checker = AnswerChecker::new(&ctx, &store).with_format(GraphFormat::NTriples);
        checker.check_values(UserId(1), 1, 1, 2).unwrap();
        let outcome = checker.check_values(UserId(1), 2, 2, 4).unwrap();

        let text = outcome.annotation.expect("annotation");
        assert!(text.contains("Expr_101>"), "{text}");
        assert!(text.contains("Num_2_101>"), "{text}");
    }

    #[test]
    fn annotation_failure_does_not_fail_the_check() {
        let broken = OntologyContext::from_parts(
            Graph::new(),
            vec![(String::new(), "not an iri".to_string())],
        );
        let store = RecordingStore::default();
        let outcome = AnswerChecker::new(&broken, &store)
            .check_values(UserId(1), 5, 5, 10)
            .unwrap();
        assert!(outcome.is_correct);
        assert!(outcome.annotation.is_none());
        assert_eq!(store.saved.lock().unwrap().len(), 1);
    }

    #[test]
    fn unknown_user_is_rejected() {
        let ctx = ontology();
        let store = RecordingStore::default();
        let err = AnswerChecker::new(&ctx, &store)
            .check_values(UserId(2), 1, 2, 3)
            .unwrap_err();
        assert!(matches!(err, CheckError::Store(StoreError::UserNotFound(UserId(2)))));
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn non_numeric_input_never_reaches_the_store() {
        let ctx = ontology();
        let store = RecordingStore::default();
        let err = AnswerChecker::new(&ctx, &store)
            .check(UserId(1), &Submission::new("3", "four", "7"))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "b must be an integer, got \"four\"");
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn overflowing_sum_never_reaches_the_store() {
        let ctx = ontology();
        let store = RecordingStore::default();
        let err = AnswerChecker::new(&ctx, &store)
            .check(UserId(1), &Submission::new("9223372036854775807", "1", "0"))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(
            err,
            CheckError::Input(InputError::SumOutOfRange { a: i64::MAX, b: 1 })
        ));
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn submission_parsing_trims_whitespace() {
        assert_eq!(Submission::new(" 3", "4 ", " 7 ").parse().unwrap(), (3, 4, 7));
        assert_eq!(parse_field("a", "-2").unwrap(), -2);
        assert!(parse_field("a", "").is_err());
        assert!(parse_field("a", "2.5").is_err());
    }

    #[test]
    fn outcome_json_payload() {
        let outcome = CheckOutcome {
            attempt_id: AttemptId(3),
            is_correct: true,
            correct: 7,
            message: "Correct! 3 + 4 = 7".into(),
            annotation: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["attempt_id"], 3);
        assert_eq!(json["is_correct"], true);
        assert_eq!(json["correct"], 7);
        assert!(json.get("annotation").is_none());
    }
}
