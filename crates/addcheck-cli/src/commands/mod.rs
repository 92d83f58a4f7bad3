//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::Result;

use addcheck_store::config::{load_config_from, AddcheckConfig};

pub mod annotate;
pub mod check;
pub mod history;
pub mod init;
pub mod ontology;
pub mod problem;
pub mod user;

/// Global command-line options shared by every subcommand.
pub struct Settings {
    pub config: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub ontology: Option<PathBuf>,
}

impl Settings {
    /// Load the config file, then apply command-line overrides on top.
    pub fn load(&self) -> Result<AddcheckConfig> {
        let mut config = load_config_from(self.config.as_deref())?;
        if let Some(db) = &self.database {
            config.database_path = db.clone();
        }
        if let Some(ontology) = &self.ontology {
            config.ontology_path = ontology.clone();
        }
        Ok(config)
    }
}
