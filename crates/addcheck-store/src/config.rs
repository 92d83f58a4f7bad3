//! Configuration and store factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use addcheck_core::annotator::GraphFormat;
use addcheck_core::model::{DEFAULT_MAX_OPERAND, DEFAULT_PER_PAGE};
use addcheck_core::ontology::{OntologyContext, OntologyFormat};

use crate::sqlite::SqliteStore;

/// Top-level addcheck configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddcheckConfig {
    /// Ontology document loaded at startup.
    #[serde(default = "default_ontology_path")]
    pub ontology_path: PathBuf,
    /// Force an RDF syntax instead of guessing from the extension.
    #[serde(default)]
    pub ontology_format: Option<OntologyFormat>,
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Attempts per history page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Syntax of the semantic record printed for each attempt.
    #[serde(default)]
    pub graph_format: GraphFormat,
    /// Largest operand used for generated problems.
    #[serde(default = "default_max_operand")]
    pub max_operand: i64,
}

fn default_ontology_path() -> PathBuf {
    PathBuf::from("ontology/math-addition.ttl")
}
fn default_database_path() -> PathBuf {
    PathBuf::from("addcheck.db")
}
fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}
fn default_max_operand() -> i64 {
    DEFAULT_MAX_OPERAND
}

impl Default for AddcheckConfig {
    fn default() -> Self {
        Self {
            ontology_path: default_ontology_path(),
            ontology_format: None,
            database_path: default_database_path(),
            per_page: default_per_page(),
            graph_format: GraphFormat::default(),
            max_operand: default_max_operand(),
        }
    }
}

impl AddcheckConfig {
    /// Load the configured ontology. Missing required terms are logged by
    /// the loader; only unreadable or unparseable documents fail.
    pub fn load_ontology(&self) -> Result<OntologyContext> {
        let ctx = match self.ontology_format {
            Some(format) => OntologyContext::load_with_format(&self.ontology_path, format),
            None => OntologyContext::load(&self.ontology_path),
        };
        ctx.with_context(|| format!("failed to load ontology: {}", self.ontology_path.display()))
    }

    /// Open the configured database.
    pub fn open_store(&self) -> Result<SqliteStore> {
        SqliteStore::open(&self.database_path)
            .with_context(|| format!("failed to open database: {}", self.database_path.display()))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Apply `ADDCHECK_DATABASE` / `ADDCHECK_ONTOLOGY` overrides.
fn apply_env_overrides(config: &mut AddcheckConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(db) = lookup("ADDCHECK_DATABASE") {
        config.database_path = PathBuf::from(db);
    }
    if let Some(ontology) = lookup("ADDCHECK_ONTOLOGY") {
        config.ontology_path = PathBuf::from(ontology);
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `addcheck.toml` in the current directory
/// 2. `~/.config/addcheck/config.toml`
///
/// Environment variable overrides: `ADDCHECK_DATABASE`, `ADDCHECK_ONTOLOGY`.
pub fn load_config() -> Result<AddcheckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AddcheckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("addcheck.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<AddcheckConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AddcheckConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    config.ontology_path = resolve_path(&config.ontology_path);
    config.database_path = resolve_path(&config.database_path);

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("addcheck"))
}
