//! Adapters layer: Concrete implementations of ports.
//!
//! - `rng`: ChaCha20 and scripted random sources
//! - `sqlite`: SQLite prediction history
//! - `sanitize`: identifier filtering for logs

pub mod rng;
pub mod sanitize;
pub mod sqlite;

pub use rng::{ChaChaSource, ScriptedSource};
pub use sqlite::{SqliteStore, StorageError};
