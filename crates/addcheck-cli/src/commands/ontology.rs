//! The `addcheck ontology` command.

use anyhow::Result;

use super::Settings;

pub fn execute(settings: &Settings) -> Result<()> {
    let config = settings.load()?;
    let ctx = config.load_ontology()?;

    println!("Ontology: {}", config.ontology_path.display());
    println!("Base IRI: {}", ctx.base_iri());
    println!("Triples: {}", ctx.graph().len());
    if !ctx.namespaces().is_empty() {
        println!("Namespaces:");
        for (prefix, iri) in ctx.namespaces() {
            println!("  {prefix}: <{iri}>");
        }
    }
    println!("Classes: {}", ctx.required_classes().join(", "));
    println!("Properties: {}", ctx.required_properties().join(", "));

    if ctx.is_complete() {
        println!("All required terms present.");
    } else {
        for term in ctx.missing_terms() {
            println!("  WARNING: missing {} {} ({})", term.kind, term.name, term.iri);
        }
        println!(
            "\n{} required term(s) missing; annotations will still use the base IRI.",
            ctx.missing_terms().len()
        );
    }

    Ok(())
}
