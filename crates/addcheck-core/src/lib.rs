//! addcheck-core — answer evaluation, ontology loading and semantic annotation.
//!
//! This crate defines the data model, the storage traits and the
//! check-answer pipeline that the rest of addcheck builds on.

pub mod annotator;
pub mod checker;
pub mod error;
pub mod evaluator;
pub mod iri;
pub mod model;
pub mod ontology;
pub mod traits;

pub use annotator::{annotate, GraphFormat, SemanticRecord};
pub use checker::{AnswerChecker, CheckOutcome, Submission};
pub use error::{AnnotationError, CheckError, InputError, OntologyLoadError, StoreError};
pub use evaluator::{evaluate, Evaluation};
pub use ontology::{OntologyContext, OntologyFormat};
