//! The `addcheck problem` command.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use addcheck_core::model::Problem;

use super::Settings;

pub fn execute(settings: &Settings, max: Option<i64>, seed: Option<u64>) -> Result<()> {
    let max = match max {
        Some(max) => max,
        None => settings.load()?.max_operand,
    };
    if max < 0 {
        anyhow::bail!("--max must not be negative, got {max}");
    }

    let problem = match seed {
        Some(seed) => Problem::random_with(&mut StdRng::seed_from_u64(seed), max),
        None => Problem::random(max),
    };
    println!("{problem}");
    Ok(())
}
