//! # CardioPredict
//!
//! Multi-model cardiovascular risk assessment.
//!
//! This crate provides:
//! - Four parallel scoring models combined into a confidence-weighted ensemble
//! - Synthetic ECG interpretation with a bounded risk contribution
//! - Risk factor ranking
//! - Local prediction history in SQLite
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (patient attributes, scores, ECG, records)
//! - `ports`: Trait definitions for external operations (randomness, storage)
//! - `adapters`: Concrete implementations (ChaCha20, SQLite, log sanitizing)
//! - `application`: Scoring engine and the services built on it

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod ports;

pub use domain::{PatientAttributes, PredictionRecord, PredictionResult, RiskLevel};

/// Result type for CardioPredict operations
pub type Result<T, E = CardioError> = std::result::Result<T, E>;

/// Main error type for CardioPredict
#[derive(Debug, thiserror::Error)]
pub enum CardioError {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Random source unavailable: {0}")]
    Random(String),
}
