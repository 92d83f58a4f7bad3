//! Error types shared across the addcheck crates.
//!
//! Storage errors live here rather than in `addcheck-store` so the answer
//! checker can tell a missing user apart from a backend failure without
//! string matching.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::UserId;

/// The ontology document could not be read or parsed. Fatal at startup.
#[derive(Debug, Error)]
pub enum OntologyLoadError {
    /// The file could not be opened or read.
    #[error("failed to read ontology {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid in the selected RDF syntax.
    #[error("failed to parse ontology: {0}")]
    Parse(String),

    /// No RDF syntax could be chosen for the document.
    #[error("unsupported ontology format: {0}")]
    UnsupportedFormat(String),
}

/// Errors raised by attempt and user storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced user does not exist.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// A user with this email is already registered.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// The underlying database failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Building or serializing a semantic record failed.
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// A minted or resolved IRI is not a valid IRI.
    #[error("invalid IRI <{iri}>: {message}")]
    Iri { iri: String, message: String },

    /// The RDF serializer failed.
    #[error("failed to serialize graph: {0}")]
    Serialize(#[from] std::io::Error),
}

impl AnnotationError {
    pub(crate) fn invalid_iri(iri: impl Into<String>, err: impl std::fmt::Display) -> Self {
        AnnotationError::Iri {
            iri: iri.into(),
            message: err.to_string(),
        }
    }
}

/// A submitted field was rejected before evaluation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} must be an integer, got {value:?}")]
    NotAnInteger { field: &'static str, value: String },

    /// `a + b` does not fit in an `i64`.
    #[error("{a} + {b} is out of range")]
    SumOutOfRange { a: i64, b: i64 },
}

/// Errors surfaced to the caller of the check-answer pipeline.
///
/// Annotation failures are absent: they are logged and
/// swallowed by the checker.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CheckError {
    /// Returns `true` if the caller sent bad input (a validation failure
    /// rather than a server fault).
    pub fn is_validation(&self) -> bool {
        matches!(self, CheckError::Input(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_message_names_field() {
        let err = InputError::NotAnInteger {
            field: "answer",
            value: "seven".into(),
        };
        assert_eq!(err.to_string(), "answer must be an integer, got \"seven\"");
    }

    #[test]
    fn out_of_range_sum_is_a_validation_failure() {
        let err: CheckError = InputError::SumOutOfRange { a: i64::MAX, b: 1 }.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "9223372036854775807 + 1 is out of range");
    }

    #[test]
    fn check_error_classification() {
        let input: CheckError = InputError::NotAnInteger {
            field: "a",
            value: "x".into(),
        }
        .into();
        assert!(input.is_validation());

        let store: CheckError = StoreError::UserNotFound(UserId(9)).into();
        assert!(!store.is_validation());
        assert_eq!(store.to_string(), "user 9 not found");
    }
}
