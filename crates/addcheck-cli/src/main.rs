//! addcheck CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::Settings;

#[derive(Parser)]
#[command(
    name = "addcheck",
    version,
    about = "Addition practice with an ontology-annotated attempt log"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Ontology document (overrides config)
    #[arg(long, global = true)]
    ontology: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and the bundled ontology
    Init,

    /// Load the ontology and report what was found
    Ontology,

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Print a random addition problem
    Problem {
        /// Largest operand (default: from config)
        #[arg(long)]
        max: Option<i64>,

        /// Seed for a reproducible problem
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check an answer, store the attempt and annotate it
    Check {
        /// Id of the submitting user
        #[arg(long)]
        user_id: i64,

        /// First operand
        #[arg(long, allow_hyphen_values = true)]
        a: String,

        /// Second operand
        #[arg(long, allow_hyphen_values = true)]
        b: String,

        /// The submitted sum
        #[arg(long, allow_hyphen_values = true)]
        answer: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Print the semantic record
        #[arg(long)]
        show_graph: bool,
    },

    /// Show a user's attempts, newest first
    History {
        /// Id of the user
        #[arg(long)]
        user_id: i64,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Attempts per page (default: from config)
        #[arg(long)]
        per_page: Option<u32>,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the semantic record of a stored attempt
    Annotate {
        /// Id of the attempt
        #[arg(long)]
        attempt_id: i64,

        /// Output format: turtle, ntriples (default: from config)
        #[arg(long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a user
    Add {
        #[arg(long)]
        email: String,

        /// Password hash produced by the authentication layer. Stored as
        /// given; addcheck never hashes or verifies passwords.
        #[arg(long)]
        password_hash: String,
    },

    /// Look up a user by email
    Show {
        #[arg(long)]
        email: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("addcheck=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings {
        config: cli.config,
        database: cli.database,
        ontology: cli.ontology,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Ontology => commands::ontology::execute(&settings),
        Commands::User { action } => match action {
            UserAction::Add {
                email,
                password_hash,
            } => commands::user::add(&settings, email, password_hash),
            UserAction::Show { email } => commands::user::show(&settings, email),
        },
        Commands::Problem { max, seed } => commands::problem::execute(&settings, max, seed),
        Commands::Check {
            user_id,
            a,
            b,
            answer,
            json,
            show_graph,
        } => commands::check::execute(&settings, user_id, a, b, answer, json, show_graph),
        Commands::History {
            user_id,
            page,
            per_page,
            json,
        } => commands::history::execute(&settings, user_id, page, per_page, json),
        Commands::Annotate { attempt_id, format } => {
            commands::annotate::execute(&settings, attempt_id, format)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
