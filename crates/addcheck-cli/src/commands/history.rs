//! The `addcheck history` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use addcheck_core::model::{HistoryPage, PageRequest, UserId};
use addcheck_core::traits::AttemptStore;

use super::Settings;

pub fn execute(
    settings: &Settings,
    user_id: i64,
    page: u32,
    per_page: Option<u32>,
    json: bool,
) -> Result<()> {
    let config = settings.load()?;
    let store = config.open_store()?;

    let request = PageRequest::new(page, per_page.unwrap_or(config.per_page));
    let history = store.list_for_user(UserId(user_id), request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    if history.total == 0 {
        println!("No attempts yet for user {user_id}.");
        return Ok(());
    }

    print_table(&history);
    println!(
        "Page {} of {} ({} attempt(s))",
        history.page,
        history.pages(),
        history.total
    );
    if history.has_next() {
        println!("Next: addcheck history --user-id {user_id} --page {}", history.page + 1);
    }

    Ok(())
}

fn print_table(history: &HistoryPage) {
    let mut table = Table::new();
    table.set_header(vec!["Id", "Problem", "Answer", "Correct", "Result", "When"]);

    for attempt in &history.items {
        table.add_row(vec![
            Cell::new(attempt.id),
            Cell::new(format!("{} + {}", attempt.a, attempt.b)),
            Cell::new(attempt.student_answer),
            Cell::new(attempt.correct_answer),
            Cell::new(if attempt.is_correct { "correct" } else { "wrong" }),
            Cell::new(attempt.timestamp.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }

    println!("{table}");
}
