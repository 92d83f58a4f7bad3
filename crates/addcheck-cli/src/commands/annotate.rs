//! The `addcheck annotate` command.

use anyhow::{Context, Result};

use addcheck_core::annotator::{annotate, GraphFormat};
use addcheck_core::model::AttemptId;
use addcheck_core::traits::AttemptStore;

use super::Settings;

pub fn execute(settings: &Settings, attempt_id: i64, format: Option<String>) -> Result<()> {
    let config = settings.load()?;
    let format = match format {
        Some(f) => f.parse::<GraphFormat>().map_err(anyhow::Error::msg)?,
        None => config.graph_format,
    };

    let ontology = config.load_ontology()?;
    let store = config.open_store()?;

    let id = AttemptId(attempt_id);
    let attempt = store
        .get(id)?
        .with_context(|| format!("attempt {id} not found"))?;

    let record = annotate(&ontology, id, attempt.a, attempt.b, attempt.student_answer)?;
    tracing::debug!(
        id = %record.attempt_id(),
        user = %attempt.user_id,
        triples = record.len(),
        "re-annotated stored attempt"
    );
    print!("{}", record.serialize(format)?);

    Ok(())
}
