//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the scoring engine and the outside world (randomness, storage).

mod random;
mod storage;

pub use random::RandomSource;
pub use storage::{PredictionPage, PredictionStore};
