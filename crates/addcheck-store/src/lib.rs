//! addcheck-store — persistence and configuration.
//!
//! Implements the `AttemptStore` and `UserStore` traits on SQLite and in
//! memory, and loads the `addcheck.toml` configuration.

pub mod config;
pub mod memory;
pub mod sqlite;
pub mod testing;

pub use config::{load_config, load_config_from, AddcheckConfig};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
