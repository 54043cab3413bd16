//! Prediction orchestrator.
//!
//! Runs the full pipeline against one random source:
//! 1. Simulate an ECG interpretation (only when a recording was supplied)
//! 2. Score the patient with every model
//! 3. Boost each model by the ECG contribution
//! 4. Aggregate into the ensemble score
//! 5. Rank the top risk factors

use crate::domain::{PatientAttributes, PredictionResult};
use crate::ports::RandomSource;

use super::ecg::EcgSimulator;
use super::ensemble::{aggregate, apply_ecg_boost};
use super::risk_factors::rank_risk_factors;
use super::scoring::score_all;

/// Cardiovascular risk predictor.
///
/// Owns its random source; `predict` takes `&mut self`, so concurrent callers
/// must synchronize externally (see `PredictionService`).
pub struct RiskPredictor<R: RandomSource> {
    rng: R,
}

impl<R: RandomSource> RiskPredictor<R> {
    /// Create a predictor drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Access the underlying random source.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Consume the predictor, returning its random source.
    pub fn into_inner(self) -> R {
        self.rng
    }

    /// Produce a full assessment for one patient.
    ///
    /// Inputs are not validated; out-of-range values flow through the scoring
    /// and clamping rules.
    pub fn predict(&mut self, patient: &PatientAttributes, ecg_requested: bool) -> PredictionResult {
        let ecg = ecg_requested.then(|| EcgSimulator::simulate(&mut self.rng));
        if let Some(analysis) = &ecg {
            tracing::debug!(
                rhythm = %analysis.rhythm,
                heart_rate = analysis.heart_rate,
                contribution = analysis.risk_contribution,
                "ECG interpreted"
            );
        }

        let mut predictions = score_all(patient, &mut self.rng);
        let contribution = ecg.as_ref().map_or(0, |a| a.risk_contribution);
        apply_ecg_boost(&mut predictions, contribution, &mut self.rng);

        let (ensemble_score, ensemble_risk_level) = aggregate(&predictions);
        let top_risk_factors = rank_risk_factors(patient, ecg.as_ref());

        tracing::info!(
            "Prediction complete: ensemble={}, risk={}, ecg={}",
            ensemble_score,
            ensemble_risk_level,
            ecg.is_some()
        );

        PredictionResult {
            predictions,
            ensemble_score,
            ensemble_risk_level,
            top_risk_factors,
            ecg_analysis: ecg,
        }
    }
}
