//! Semantic annotation of attempts.
//!
//! Projects one attempt into a small ontology-typed graph: an
//! `AdditionExpression` instance that `hasAdded` two `Number` instances and
//! `hasResult` a third, each `Number` carrying an `xsd:integer` `hasValue`.
//! Instance IRIs are scoped by the attempt identifier, so distinct attempts
//! never share instances.

use std::fmt;
use std::io;
use std::str::FromStr;

use oxrdf::vocab::{rdf, xsd};
use oxrdf::{Graph, Literal, NamedNode, NamedNodeRef, TripleRef};
use oxrdfio::{RdfFormat, RdfSerializer};
use serde::{Deserialize, Serialize};

use crate::error::AnnotationError;
use crate::iri::{self, InstanceKind};
use crate::model::AttemptId;
use crate::ontology::OntologyContext;

/// Prefix bound to the ontology namespace in Turtle output.
pub const MATH_PREFIX: &str = "math";

const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// Text syntax for serialized semantic records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    #[default]
    Turtle,
    NTriples,
}

impl GraphFormat {
    fn rdf_format(self) -> RdfFormat {
        match self {
            GraphFormat::Turtle => RdfFormat::Turtle,
            GraphFormat::NTriples => RdfFormat::NTriples,
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphFormat::Turtle => write!(f, "turtle"),
            GraphFormat::NTriples => write!(f, "ntriples"),
        }
    }
}

impl FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "turtle" | "ttl" => Ok(GraphFormat::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(GraphFormat::NTriples),
            other => Err(format!("unknown graph format: {other}")),
        }
    }
}

/// The typed instance graph for one attempt. Ephemeral: built, serialized,
/// logged and dropped.
#[derive(Debug, Clone)]
pub struct SemanticRecord {
    attempt_id: AttemptId,
    base_iri: String,
    expression: NamedNode,
    graph: Graph,
}

impl SemanticRecord {
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    /// The `AdditionExpression` instance.
    pub fn expression(&self) -> NamedNodeRef<'_> {
        self.expression.as_ref()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Number of distinct triples in the record.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Serialize the record. Turtle output binds the `math` prefix to the
    /// ontology namespace. Triples are written in lexical order, so the same
    /// record always yields the same text.
    pub fn serialize(&self, format: GraphFormat) -> Result<String, AnnotationError> {
        let mut serializer = RdfSerializer::from_format(format.rdf_format());
        if format == GraphFormat::Turtle {
            serializer = serializer
                .with_prefix(MATH_PREFIX, self.base_iri.as_str())
                .map_err(|e| AnnotationError::invalid_iri(self.base_iri.clone(), e))?
                .with_prefix("xsd", XSD_NAMESPACE)
                .map_err(|e| AnnotationError::invalid_iri(XSD_NAMESPACE, e))?;
        }

        let mut triples: Vec<(String, TripleRef<'_>)> =
            self.graph.iter().map(|t| (t.to_string(), t)).collect();
        triples.sort_by(|x, y| x.0.cmp(&y.0));

        let mut writer = serializer.for_writer(Vec::new());
        for (_, triple) in triples {
            writer.serialize_triple(triple)?;
        }
        let bytes = writer.finish()?;
        String::from_utf8(bytes)
            .map_err(|e| AnnotationError::Serialize(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}

/// Build the semantic record for an attempt.
///
/// The result instance carries the submitted value, so a wrong answer is
/// recorded as the student wrote it. When two values coincide (e.g.
/// `a == b`) their instances share an IRI and the record holds fewer
/// `Number` instances.
pub fn annotate(
    ctx: &OntologyContext,
    attempt_id: AttemptId,
    a: i64,
    b: i64,
    submitted: i64,
) -> Result<SemanticRecord, AnnotationError> {
    let base = ctx.base_iri();
    let expression = instance(base, InstanceKind::Expression, &[attempt_id.0])?;
    let num_a = instance(base, InstanceKind::Number, &[a, attempt_id.0])?;
    let num_b = instance(base, InstanceKind::Number, &[b, attempt_id.0])?;
    let num_res = instance(base, InstanceKind::Number, &[submitted, attempt_id.0])?;

    let addition_expression = ctx.term("AdditionExpression")?;
    let number = ctx.term("Number")?;
    let has_added = ctx.term("hasAdded")?;
    let has_result = ctx.term("hasResult")?;
    let has_value = ctx.term("hasValue")?;

    let mut graph = Graph::new();
    graph.insert(TripleRef::new(
        expression.as_ref(),
        rdf::TYPE,
        addition_expression.as_ref(),
    ));
    graph.insert(TripleRef::new(expression.as_ref(), has_added.as_ref(), num_a.as_ref()));
    graph.insert(TripleRef::new(expression.as_ref(), has_added.as_ref(), num_b.as_ref()));
    graph.insert(TripleRef::new(expression.as_ref(), has_result.as_ref(), num_res.as_ref()));

    for (node, value) in [(&num_a, a), (&num_b, b), (&num_res, submitted)] {
        let literal = Literal::new_typed_literal(value.to_string(), xsd::INTEGER);
        graph.insert(TripleRef::new(node.as_ref(), rdf::TYPE, number.as_ref()));
        graph.insert(TripleRef::new(node.as_ref(), has_value.as_ref(), literal.as_ref()));
    }

    Ok(SemanticRecord {
        attempt_id,
        base_iri: base.to_string(),
        expression,
        graph,
    })
}

/// Annotate and serialize in one step.
pub fn annotate_to_string(
    ctx: &OntologyContext,
    attempt_id: AttemptId,
    a: i64,
    b: i64,
    submitted: i64,
    format: GraphFormat,
) -> Result<String, AnnotationError> {
    annotate(ctx, attempt_id, a, b, submitted)?.serialize(format)
}

fn instance(base: &str, kind: InstanceKind, discriminators: &[i64]) -> Result<NamedNode, AnnotationError> {
    let iri = iri::mint(base, kind, discriminators);
    NamedNode::new(iri.as_str()).map_err(|e| AnnotationError::invalid_iri(iri.clone(), e))
}
