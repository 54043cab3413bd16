//! Prediction result and persisted record types.

use serde::{Deserialize, Serialize};

use super::{EcgAnalysis, PatientAttributes, RiskLevel};

/// Output of one scoring model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelScore {
    /// Display name, e.g. "Random Forest"
    pub model_name: String,

    /// Model family label, e.g. "Ensemble"
    pub model_type: String,

    /// Risk score in [0, 100]
    pub risk_score: u8,

    /// Confidence in [0, 100]
    pub confidence: u8,

    /// Band derived from `risk_score`
    pub risk_level: RiskLevel,
}

impl ModelScore {
    /// Create a score; the risk level is derived.
    #[must_use]
    pub fn new(
        model_name: impl Into<String>,
        model_type: impl Into<String>,
        risk_score: u8,
        confidence: u8,
    ) -> Self {
        let risk_score = risk_score.min(100);
        Self {
            model_name: model_name.into(),
            model_type: model_type.into(),
            risk_score,
            confidence: confidence.min(100),
            risk_level: RiskLevel::from_score(risk_score),
        }
    }

    /// Add points to the score, saturating at 100, and re-derive the level.
    pub fn add_points(&mut self, points: u32) {
        let boosted = (u32::from(self.risk_score) + points).min(100);
        self.risk_score = boosted as u8;
        self.risk_level = RiskLevel::from_score(self.risk_score);
    }

    #[must_use]
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            model_name: self.model_name.clone(),
            risk_score: self.risk_score,
            confidence: self.confidence,
            risk_level: self.risk_level,
        }
    }
}

/// Composite result of one orchestration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Per-model scores in declaration order
    pub predictions: Vec<ModelScore>,

    /// Confidence-weighted mean of the model scores
    pub ensemble_score: u8,

    pub ensemble_risk_level: RiskLevel,

    /// Up to five labels, most important first
    pub top_risk_factors: Vec<String>,

    /// Present only when an ECG was supplied
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ecg_analysis: Option<EcgAnalysis>,
}

/// Per-model summary kept in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub model_name: String,
    pub risk_score: u8,
    pub confidence: u8,
    pub risk_level: RiskLevel,
}

/// Flattened, persisted form of an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    /// Unique identifier
    pub id: String,

    /// Inputs the assessment was computed from
    pub attributes: PatientAttributes,

    /// Whether an ECG recording was supplied
    pub has_ecg: bool,

    pub ensemble_score: u8,

    pub ensemble_risk_level: RiskLevel,

    pub top_risk_factors: Vec<String>,

    pub model_results: Vec<ModelSummary>,

    pub ecg_analysis: Option<EcgAnalysis>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PredictionRecord {
    /// Flatten a result for storage.
    #[must_use]
    pub fn new(attributes: PatientAttributes, has_ecg: bool, result: &PredictionResult) -> Self {
        Self {
            id: uuid_v4(),
            attributes,
            has_ecg,
            ensemble_score: result.ensemble_score,
            ensemble_risk_level: result.ensemble_risk_level,
            top_risk_factors: result.top_risk_factors.clone(),
            model_results: result.predictions.iter().map(ModelScore::summary).collect(),
            ecg_analysis: result.ecg_analysis.clone(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Generate a random UUID v4 for record identifiers.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> PredictionResult {
        PredictionResult {
            predictions: vec![
                ModelScore::new("Logistic Regression", "Linear", 40, 80),
                ModelScore::new("SVM", "Kernel", 55, 84),
            ],
            ensemble_score: 48,
            ensemble_risk_level: RiskLevel::Moderate,
            top_risk_factors: vec!["Family History".to_string()],
            ecg_analysis: None,
        }
    }

    #[test]
    fn test_model_score_derives_level() {
        let score = ModelScore::new("SVM", "Kernel", 74, 80);
        assert_eq!(score.risk_level, RiskLevel::High);

        let clamped = ModelScore::new("SVM", "Kernel", 140, 120);
        assert_eq!(clamped.risk_score, 100);
        assert_eq!(clamped.confidence, 100);
        assert_eq!(clamped.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_add_points_saturates_and_reclassifies() {
        let mut score = ModelScore::new("Random Forest", "Ensemble", 70, 85);
        score.add_points(5);
        assert_eq!(score.risk_score, 75);
        assert_eq!(score.risk_level, RiskLevel::Critical);

        score.add_points(400);
        assert_eq!(score.risk_score, 100);
    }

    #[test]
    fn test_record_flattens_result() {
        let result = sample_result();
        let record = PredictionRecord::new(PatientAttributes::default(), false, &result);

        assert_eq!(record.id.len(), 36);
        assert_eq!(record.ensemble_score, 48);
        assert_eq!(record.model_results.len(), 2);
        assert_eq!(record.model_results[1].model_name, "SVM");
        assert_eq!(record.model_results[1].risk_level, RiskLevel::High);
        assert!(record.ecg_analysis.is_none());
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = ModelScore::new("Neural Network", "Deep Learning", 30, 90).summary();
        let json = serde_json::to_value(&summary).expect("Should serialize");
        assert_eq!(json["modelName"], "Neural Network");
        assert_eq!(json["riskScore"], 30);
        assert_eq!(json["riskLevel"], "moderate");
    }

    #[test]
    fn test_uuid_generation() {
        let id1 = uuid_v4();
        let id2 = uuid_v4();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36);
    }
}
