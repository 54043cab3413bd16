//! Application layer: Use cases and services.
//!
//! The scoring engine (`scoring`, `ecg`, `ensemble`, `risk_factors`) is pure
//! and draws all randomness from an injected `RandomSource`. `RiskPredictor`
//! ties it together; `PredictionService` and `PredictionWorker` add history
//! and background execution on top.

pub mod ecg;
pub mod ensemble;
mod predictor;
mod report;
pub mod risk_factors;
pub mod scoring;
mod service;
mod worker;

pub use ecg::EcgSimulator;
pub use predictor::RiskPredictor;
pub use report::{render_record_report, render_report, render_report_at};
pub use service::PredictionService;
pub use worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};
