//! Ontology loading and base IRI resolution.
//!
//! The ontology is read once at startup into an immutable
//! [`OntologyContext`] that is then shared by reference. Required terms are
//! checked for presence only: a missing class or property is logged and
//! recorded, never fatal.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use oxrdf::vocab::rdf;
use oxrdf::{Graph, NamedNode, NamedNodeRef, SubjectRef, Triple};
use oxrdfio::{RdfFormat, RdfParser};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AnnotationError, OntologyLoadError};
use crate::iri;

/// Fallback base IRI when neither a namespace binding nor an ontology
/// declaration names one.
pub const DEFAULT_BASE_IRI: &str =
    "http://www.semanticweb.org/nitesh/ontologies/2025/11/math-addition#";

/// Namespace prefix that marks the domain namespace when no default prefix
/// is bound.
pub const DOMAIN_PREFIX: &str = "math-addition";

pub const REQUIRED_CLASSES: [&str; 2] = ["Number", "AdditionExpression"];
pub const REQUIRED_PROPERTIES: [&str; 3] = ["hasAdded", "hasResult", "hasValue"];

const OWL_ONTOLOGY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");

/// RDF syntaxes accepted for the ontology document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OntologyFormat {
    #[serde(rename = "xml")]
    RdfXml,
    Turtle,
    NTriples,
}

impl OntologyFormat {
    /// Pick a syntax from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "owl" | "rdf" | "xml" => Some(OntologyFormat::RdfXml),
            "ttl" => Some(OntologyFormat::Turtle),
            "nt" => Some(OntologyFormat::NTriples),
            _ => None,
        }
    }

    fn rdf_format(self) -> RdfFormat {
        match self {
            OntologyFormat::RdfXml => RdfFormat::RdfXml,
            OntologyFormat::Turtle => RdfFormat::Turtle,
            OntologyFormat::NTriples => RdfFormat::NTriples,
        }
    }
}

impl fmt::Display for OntologyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OntologyFormat::RdfXml => write!(f, "xml"),
            OntologyFormat::Turtle => write!(f, "turtle"),
            OntologyFormat::NTriples => write!(f, "ntriples"),
        }
    }
}

impl FromStr for OntologyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xml" | "rdfxml" | "rdf/xml" | "owl" => Ok(OntologyFormat::RdfXml),
            "turtle" | "ttl" => Ok(OntologyFormat::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(OntologyFormat::NTriples),
            other => Err(format!("unknown ontology format: {other}")),
        }
    }
}

/// Whether a required term is a class or a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    Class,
    Property,
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermKind::Class => write!(f, "class"),
            TermKind::Property => write!(f, "property"),
        }
    }
}

/// A required term that does not appear as a subject in the ontology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingTerm {
    pub kind: TermKind,
    pub name: String,
    pub iri: String,
}

/// The loaded ontology. Read-only after construction.
#[derive(Debug, Clone)]
pub struct OntologyContext {
    base_iri: String,
    graph: Graph,
    namespaces: Vec<(String, String)>,
    required_classes: Vec<String>,
    required_properties: Vec<String>,
    missing: Vec<MissingTerm>,
}

impl OntologyContext {
    /// Load the ontology at `path`, choosing the syntax from its extension.
    pub fn load(path: &Path) -> Result<Self, OntologyLoadError> {
        let format = OntologyFormat::from_path(path).ok_or_else(|| {
            OntologyLoadError::UnsupportedFormat(format!(
                "cannot infer RDF syntax from {}",
                path.display()
            ))
        })?;
        Self::load_with_format(path, format)
    }

    /// Load the ontology at `path` using an explicit syntax.
    pub fn load_with_format(path: &Path, format: OntologyFormat) -> Result<Self, OntologyLoadError> {
        let file = File::open(path).map_err(|source| OntologyLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ctx = Self::from_reader(BufReader::new(file), format)?;
        info!(
            path = %path.display(),
            base_iri = %ctx.base_iri,
            triples = ctx.graph.len(),
            missing = ctx.missing.len(),
            "ontology loaded"
        );
        Ok(ctx)
    }

    /// Parse an ontology document from any reader.
    pub fn from_reader<R: Read>(reader: R, format: OntologyFormat) -> Result<Self, OntologyLoadError> {
        let mut parser = RdfParser::from_format(format.rdf_format()).for_reader(reader);
        let mut graph = Graph::new();
        for quad in parser.by_ref() {
            let quad = quad.map_err(|e| OntologyLoadError::Parse(e.to_string()))?;
            graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
        }
        // Prefixes are only complete once the whole document has been read.
        let namespaces = parser
            .prefixes()
            .map(|(prefix, iri)| (prefix.to_string(), iri.to_string()))
            .collect();
        Ok(Self::from_parts(graph, namespaces))
    }

    /// Build a context from an already parsed graph and its namespace
    /// bindings, checking the default required terms.
    pub fn from_parts(graph: Graph, namespaces: Vec<(String, String)>) -> Self {
        Self::with_required_terms(graph, namespaces, &REQUIRED_CLASSES, &REQUIRED_PROPERTIES)
    }

    pub fn with_required_terms(
        graph: Graph,
        namespaces: Vec<(String, String)>,
        classes: &[&str],
        properties: &[&str],
    ) -> Self {
        let base_iri = infer_base_iri(&namespaces, &graph);
        let required_classes: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
        let required_properties: Vec<String> = properties.iter().map(|p| p.to_string()).collect();
        let missing = find_missing_terms(&graph, &base_iri, &required_classes, &required_properties);
        Self {
            base_iri,
            graph,
            namespaces,
            required_classes,
            required_properties,
            missing,
        }
    }

    /// Namespace for ontology terms and minted instances. Always ends with `#`.
    pub fn base_iri(&self) -> &str {
        &self.base_iri
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// `(prefix, iri)` bindings declared by the document.
    pub fn namespaces(&self) -> &[(String, String)] {
        &self.namespaces
    }

    pub fn required_classes(&self) -> &[String] {
        &self.required_classes
    }

    pub fn required_properties(&self) -> &[String] {
        &self.required_properties
    }

    /// Required terms that were absent at load time.
    pub fn missing_terms(&self) -> &[MissingTerm] {
        &self.missing
    }

    /// Returns `true` if every required class and property is present.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Resolve a term name such as `"hasValue"` under the base IRI.
    ///
    /// The term does not have to exist in the ontology.
    pub fn term(&self, name: &str) -> Result<NamedNode, AnnotationError> {
        let iri = iri::term(&self.base_iri, name);
        NamedNode::new(iri.as_str()).map_err(|e| AnnotationError::invalid_iri(iri.clone(), e))
    }
}

/// Recover the ontology base IRI.
///
/// 1. A namespace bound to the default (empty) prefix, else one bound to
///    [`DOMAIN_PREFIX`].
/// 2. The graph's own identifier: the subject typed `owl:Ontology`.
/// 3. [`DEFAULT_BASE_IRI`].
///
/// The result always ends with `#`.
pub fn infer_base_iri(namespaces: &[(String, String)], graph: &Graph) -> String {
    let bound = namespaces
        .iter()
        .find(|(prefix, _)| prefix.is_empty())
        .or_else(|| {
            namespaces
                .iter()
                .find(|(prefix, _)| prefix.as_str() == DOMAIN_PREFIX)
        })
        .map(|(_, iri)| iri.as_str());

    if let Some(iri) = bound {
        return iri::normalize_base(iri);
    }

    if let Some(iri) = ontology_identifier(graph) {
        return iri::normalize_base(&iri);
    }

    DEFAULT_BASE_IRI.to_string()
}

fn ontology_identifier(graph: &Graph) -> Option<String> {
    graph
        .subjects_for_predicate_object(rdf::TYPE, OWL_ONTOLOGY)
        .find_map(|subject| match subject {
            SubjectRef::NamedNode(node) => Some(node.as_str().to_string()),
            _ => None,
        })
}

fn find_missing_terms(
    graph: &Graph,
    base_iri: &str,
    classes: &[String],
    properties: &[String],
) -> Vec<MissingTerm> {
    let wanted = classes
        .iter()
        .map(|name| (TermKind::Class, name))
        .chain(properties.iter().map(|name| (TermKind::Property, name)));

    let mut missing = Vec::new();
    for (kind, name) in wanted {
        let iri = iri::term(base_iri, name);
        let present = NamedNodeRef::new(&iri)
            .map(|node| graph.triples_for_subject(node).next().is_some())
            .unwrap_or(false);
        if !present {
            warn!(%kind, term = %name, %iri, "required {kind} {name} not found in ontology");
            missing.push(MissingTerm {
                kind,
                name: name.clone(),
                iri,
            });
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED_OWL: &str = include_str!("../../../ontology/math-addition.owl");
    const BUNDLED_TTL: &str = include_str!("../../../ontology/math-addition.ttl");

    fn turtle(doc: &str) -> OntologyContext {
        OntologyContext::from_reader(doc.as_bytes(), OntologyFormat::Turtle).unwrap()
    }

    #[test]
    fn default_prefix_wins() {
        let ctx = turtle(
            r#"@prefix : <http://x/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
:Number a owl:Class ."#,
        );
        assert_eq!(ctx.base_iri(), "http://x/#");
    }

    #[test]
    fn domain_prefix_used_without_default() {
        let ctx = turtle(
            r#"@prefix math-addition: <http://y/math#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
math-addition:Number a owl:Class ."#,
        );
        assert_eq!(ctx.base_iri(), "http://y/math#");
        assert!(ctx
            .namespaces()
            .iter()
            .any(|(prefix, iri)| prefix == "math-addition" && iri == "http://y/math#"));
    }

    #[test]
    fn ontology_identifier_fallback() {
        let ctx = turtle(
            r#"@prefix owl: <http://www.w3.org/2002/07/owl#> .
<http://z/onto> a owl:Ontology ."#,
        );
        assert_eq!(ctx.base_iri(), "http://z/onto#");
    }

    #[test]
    fn hardcoded_default_when_nothing_bound() {
        let base = infer_base_iri(&[], &Graph::new());
        assert_eq!(base, DEFAULT_BASE_IRI);
        assert!(base.ends_with('#'));
    }

    #[test]
    fn unrelated_prefixes_are_ignored() {
        let namespaces = vec![
            ("owl".to_string(), "http://www.w3.org/2002/07/owl#".to_string()),
            ("rdfs".to_string(), "http://www.w3.org/2000/01/rdf-schema#".to_string()),
        ];
        assert_eq!(infer_base_iri(&namespaces, &Graph::new()), DEFAULT_BASE_IRI);
    }

    #[test]
    fn bundled_rdfxml_is_complete() {
        let ctx =
            OntologyContext::from_reader(BUNDLED_OWL.as_bytes(), OntologyFormat::RdfXml).unwrap();
        assert_eq!(ctx.base_iri(), DEFAULT_BASE_IRI);
        assert!(ctx.is_complete(), "missing: {:?}", ctx.missing_terms());
        assert!(!ctx.graph().is_empty());
    }

    #[test]
    fn bundled_turtle_is_complete() {
        let ctx = turtle(BUNDLED_TTL);
        assert_eq!(ctx.base_iri(), DEFAULT_BASE_IRI);
        assert!(ctx.is_complete(), "missing: {:?}", ctx.missing_terms());
    }

    #[test]
    fn missing_property_is_a_warning_not_an_error() {
        let ctx = turtle(
            r#"@prefix : <http://x/math#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
:Number a owl:Class .
:AdditionExpression a owl:Class .
:hasAdded a owl:ObjectProperty .
:hasResult a owl:ObjectProperty ."#,
        );
        assert!(!ctx.is_complete());
        assert_eq!(
            ctx.missing_terms(),
            &[MissingTerm {
                kind: TermKind::Property,
                name: "hasValue".into(),
                iri: "http://x/math#hasValue".into(),
            }]
        );
    }

    #[test]
    fn term_present_only_as_object_counts_as_missing() {
        let ctx = turtle(
            r#"@prefix : <http://x/math#> .
:something :refersTo :Number ."#,
        );
        assert!(ctx
            .missing_terms()
            .iter()
            .any(|t| t.name == "Number" && t.kind == TermKind::Class));
    }

    #[test]
    fn parse_error_is_reported() {
        let err = OntologyContext::from_reader("this is not turtle".as_bytes(), OntologyFormat::Turtle)
            .unwrap_err();
        assert!(matches!(err, OntologyLoadError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = OntologyContext::load(Path::new("/nonexistent/math.owl")).unwrap_err();
        assert!(matches!(err, OntologyLoadError::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = OntologyContext::load(Path::new("ontology.docx")).unwrap_err();
        assert!(matches!(err, OntologyLoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("math.ttl");
        std::fs::write(&path, BUNDLED_TTL).unwrap();
        let ctx = OntologyContext::load(&path).unwrap();
        assert!(ctx.is_complete());
    }

    #[test]
    fn format_detection_and_parsing() {
        assert_eq!(
            OntologyFormat::from_path(Path::new("Math-additions.owl")),
            Some(OntologyFormat::RdfXml)
        );
        assert_eq!(
            OntologyFormat::from_path(Path::new("math.TTL")),
            Some(OntologyFormat::Turtle)
        );
        assert_eq!(OntologyFormat::from_path(Path::new("math")), None);
        assert_eq!("rdfxml".parse::<OntologyFormat>().unwrap(), OntologyFormat::RdfXml);
        assert_eq!("ttl".parse::<OntologyFormat>().unwrap(), OntologyFormat::Turtle);
        assert!("json".parse::<OntologyFormat>().is_err());
    }

    #[test]
    fn term_resolves_under_base() {
        let ctx = turtle("@prefix : <http://x/math#> .\n:Number a :Thing .");
        assert_eq!(ctx.term("hasValue").unwrap().as_str(), "http://x/math#hasValue");
    }
}
