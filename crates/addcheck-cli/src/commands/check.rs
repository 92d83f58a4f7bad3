//! The `addcheck check` command.

use anyhow::Result;

use addcheck_core::checker::{AnswerChecker, Submission};
use addcheck_core::model::UserId;

use super::Settings;

pub fn execute(
    settings: &Settings,
    user_id: i64,
    a: String,
    b: String,
    answer: String,
    json: bool,
    show_graph: bool,
) -> Result<()> {
    let config = settings.load()?;
    let ontology = config.load_ontology()?;
    let store = config.open_store()?;

    let checker = AnswerChecker::new(&ontology, &store).with_format(config.graph_format);
    let mut outcome = checker.check(UserId(user_id), &Submission::new(a, b, answer))?;

    if !show_graph {
        outcome.annotation = None;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("{}", outcome.message);
    println!("Attempt {} saved.", outcome.attempt_id);
    if show_graph {
        match &outcome.annotation {
            Some(graph) => println!("\n{graph}"),
            None => println!("\n(semantic record unavailable, see log)"),
        }
    }

    Ok(())
}
