//! IRI construction for ontology terms and attempt instances.
//!
//! Every IRI the annotator asserts is built here, never by ad hoc string
//! concatenation at the call site.

/// The kinds of instances minted for an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceKind {
    /// The `AdditionExpression` instance.
    Expression,
    /// A `Number` instance (operand or result).
    Number,
}

impl InstanceKind {
    pub fn local_prefix(self) -> &'static str {
        match self {
            InstanceKind::Expression => "Expr",
            InstanceKind::Number => "Num",
        }
    }
}

/// Ensure a namespace IRI ends with `#`.
///
/// `"http://x/"` becomes `"http://x/#"`; an IRI already ending in `#` is
/// returned unchanged.
pub fn normalize_base(iri: &str) -> String {
    if iri.ends_with('#') {
        iri.to_string()
    } else {
        format!("{iri}#")
    }
}

/// IRI of a named ontology term (class or property) under `base`.
pub fn term(base: &str, name: &str) -> String {
    format!("{base}{name}")
}

/// Mint an instance IRI `{base}{Kind}_{d1}_{d2}...`.
///
/// The last discriminator is the attempt identifier, which keeps instances
/// of distinct attempts from colliding.
pub fn mint(base: &str, kind: InstanceKind, discriminators: &[i64]) -> String {
    let mut iri = format!("{base}{}", kind.local_prefix());
    for d in discriminators {
        iri.push('_');
        iri.push_str(&d.to_string());
    }
    iri
}
