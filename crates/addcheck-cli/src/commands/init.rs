//! The `addcheck init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("addcheck.toml").exists() {
        println!("addcheck.toml already exists, skipping.");
    } else {
        std::fs::write("addcheck.toml", SAMPLE_CONFIG)?;
        println!("Created addcheck.toml");
    }

    std::fs::create_dir_all("ontology")?;
    let ontology_path = Path::new("ontology/math-addition.ttl");
    if ontology_path.exists() {
        println!("ontology/math-addition.ttl already exists, skipping.");
    } else {
        std::fs::write(ontology_path, BUNDLED_ONTOLOGY)?;
        println!("Created ontology/math-addition.ttl");
    }

    println!("\nNext steps:");
    println!("  1. Run: addcheck ontology");
    println!("  2. Run: addcheck user add --email you@example.com --password-hash <hash>");
    println!("  3. Run: addcheck check --user-id 1 --a 3 --b 4 --answer 7");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# addcheck configuration

ontology_path = "ontology/math-addition.ttl"
# ontology_format = "turtle"   # xml | turtle | ntriples; guessed from the extension if unset
database_path = "addcheck.db"
per_page = 10
graph_format = "turtle"
max_operand = 10
"#;

const BUNDLED_ONTOLOGY: &str = include_str!("../../../../ontology/math-addition.ttl");
