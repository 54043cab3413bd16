//! Domain layer: Core business types.
//!
//! Plain data types for patients, scores, ECG interpretations and saved
//! records. Nothing here touches storage or the injected random sources;
//! record IDs come from an entropy-seeded ChaCha20 generator of their own.

mod ecg;
mod history;
mod patient;
mod prediction;
mod risk;

pub use ecg::{
    EcgAnalysis, Rhythm, StSegment, TWave, MAX_ECG_RISK_CONTRIBUTION,
    NO_SIGNIFICANT_ABNORMALITIES,
};
pub use history::HistoryFilter;
pub use patient::{ExerciseLevel, PatientAttributes, Sex};
pub use prediction::{ModelScore, ModelSummary, PredictionRecord, PredictionResult};
pub use risk::RiskLevel;
