//! Heuristic scoring models.
//!
//! Four fixed linear heuristics, each a row in [`MODELS`] evaluated by the
//! same function. Every term is non-negative in its risk direction, so
//! raising a risk attribute never lowers a score and raising HDL or exercise
//! never raises one.

use crate::domain::{ModelScore, PatientAttributes, Sex};
use crate::ports::RandomSource;

/// `weight * max(0, x - baseline)`.
#[derive(Debug, Clone, Copy)]
pub struct Above {
    pub baseline: f64,
    pub weight: f64,
}

impl Above {
    fn eval(&self, x: f64) -> f64 {
        (x - self.baseline).max(0.0) * self.weight
    }
}

/// `weight * max(0, ceiling - x)`, for protective attributes.
#[derive(Debug, Clone, Copy)]
pub struct Below {
    pub ceiling: f64,
    pub weight: f64,
}

impl Below {
    fn eval(&self, x: f64) -> f64 {
        (self.ceiling - x).max(0.0) * self.weight
    }
}

/// Blood sugar contribution.
#[derive(Debug, Clone, Copy)]
pub enum SugarTerm {
    Ignored,
    Linear(Above),
    /// First matching `(threshold, points)` pair, highest threshold first.
    Steps(&'static [(f64, f64)]),
}

impl SugarTerm {
    fn eval(&self, sugar: f64) -> f64 {
        match self {
            Self::Ignored => 0.0,
            Self::Linear(term) => term.eval(sugar),
            Self::Steps(steps) => steps
                .iter()
                .find(|(threshold, _)| sugar > *threshold)
                .map_or(0.0, |(_, points)| *points),
        }
    }
}

/// Coefficient set of one model.
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    pub name: &'static str,
    pub model_type: &'static str,
    pub age: Above,
    pub male: f64,
    pub systolic: Above,
    pub diastolic: Option<Above>,
    pub cholesterol: Above,
    pub ldl: Option<Above>,
    pub hdl: Option<Below>,
    pub bmi: Above,
    pub smoking: f64,
    pub family_history: f64,
    /// Addend per exercise level (none, light, moderate, heavy); non-increasing.
    pub exercise: [f64; 4],
    pub blood_sugar: SugarTerm,
    /// Noise is uniform in `[-noise, noise)`.
    pub noise: f64,
    pub base_confidence: u8,
    pub confidence_spread: f64,
}

/// The model table, in result order.
pub const MODELS: [ModelSpec; 4] = [
    ModelSpec {
        name: "Logistic Regression",
        model_type: "Linear",
        age: Above { baseline: 30.0, weight: 0.8 },
        male: 5.0,
        systolic: Above { baseline: 120.0, weight: 0.3 },
        diastolic: None,
        cholesterol: Above { baseline: 200.0, weight: 0.08 },
        ldl: None,
        hdl: None,
        bmi: Above { baseline: 25.0, weight: 1.5 },
        smoking: 12.0,
        family_history: 8.0,
        exercise: [6.0, 3.0, 0.0, 0.0],
        blood_sugar: SugarTerm::Linear(Above { baseline: 100.0, weight: 0.15 }),
        noise: 3.0,
        base_confidence: 78,
        confidence_spread: 10.0,
    },
    ModelSpec {
        name: "Random Forest",
        model_type: "Ensemble",
        age: Above { baseline: 35.0, weight: 0.7 },
        male: 4.0,
        systolic: Above { baseline: 120.0, weight: 0.35 },
        diastolic: None,
        cholesterol: Above { baseline: 190.0, weight: 0.09 },
        ldl: Some(Above { baseline: 100.0, weight: 0.12 }),
        hdl: None,
        bmi: Above { baseline: 24.0, weight: 1.8 },
        smoking: 15.0,
        family_history: 10.0,
        exercise: [7.0, 2.0, -3.0, -3.0],
        blood_sugar: SugarTerm::Ignored,
        noise: 4.0,
        base_confidence: 82,
        confidence_spread: 8.0,
    },
    ModelSpec {
        name: "Neural Network",
        model_type: "Deep Learning",
        age: Above { baseline: 28.0, weight: 0.9 },
        male: 6.0,
        systolic: Above { baseline: 115.0, weight: 0.28 },
        diastolic: Some(Above { baseline: 75.0, weight: 0.25 }),
        cholesterol: Above { baseline: 180.0, weight: 0.07 },
        ldl: None,
        hdl: Some(Below { ceiling: 50.0, weight: 0.2 }),
        bmi: Above { baseline: 23.0, weight: 1.4 },
        smoking: 14.0,
        family_history: 9.0,
        exercise: [0.0, 0.0, 0.0, 0.0],
        blood_sugar: SugarTerm::Steps(&[(126.0, 8.0), (100.0, 4.0)]),
        noise: 2.5,
        base_confidence: 85,
        confidence_spread: 7.0,
    },
    ModelSpec {
        name: "SVM",
        model_type: "Kernel",
        age: Above { baseline: 32.0, weight: 0.75 },
        male: 5.0,
        systolic: Above { baseline: 118.0, weight: 0.32 },
        diastolic: None,
        cholesterol: Above { baseline: 195.0, weight: 0.085 },
        ldl: None,
        hdl: None,
        bmi: Above { baseline: 25.0, weight: 1.6 },
        smoking: 13.0,
        family_history: 9.0,
        exercise: [5.0, 0.0, 0.0, -2.0],
        blood_sugar: SugarTerm::Ignored,
        noise: 3.5,
        base_confidence: 76,
        confidence_spread: 12.0,
    },
];

impl ModelSpec {
    /// Noise-free weighted sum for `patient`.
    #[must_use]
    pub fn raw_score(&self, patient: &PatientAttributes) -> f64 {
        let mut score = self.age.eval(patient.age);
        if patient.sex == Sex::Male {
            score += self.male;
        }
        score += self.systolic.eval(patient.systolic_bp);
        score += self.diastolic.map_or(0.0, |t| t.eval(patient.diastolic_bp));
        score += self.cholesterol.eval(patient.cholesterol);
        score += self.ldl.map_or(0.0, |t| t.eval(patient.ldl));
        score += self.hdl.map_or(0.0, |t| t.eval(patient.hdl));
        score += self.bmi.eval(patient.bmi);
        if patient.smoking {
            score += self.smoking;
        }
        if patient.family_history {
            score += self.family_history;
        }
        score += self.exercise[patient.exercise.index()];
        score += self.blood_sugar.eval(patient.blood_sugar);
        score
    }

    /// Score `patient`, drawing score noise then confidence noise.
    pub fn evaluate<R: RandomSource + ?Sized>(
        &self,
        patient: &PatientAttributes,
        rng: &mut R,
    ) -> ModelScore {
        let noisy = self.raw_score(patient) + rng.symmetric(self.noise);
        let risk_score = clamp_score(noisy);
        let confidence = f64::from(self.base_confidence)
            + (self.confidence_spread * rng.next_unit()).round();

        ModelScore::new(self.name, self.model_type, risk_score, confidence as u8)
    }
}

/// Clamp into [0, 100] and round to the nearest integer; NaN scores as 0.
#[must_use]
pub fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}

/// Run every model in table order.
pub fn score_all<R: RandomSource + ?Sized>(
    patient: &PatientAttributes,
    rng: &mut R,
) -> Vec<ModelScore> {
    MODELS.iter().map(|model| model.evaluate(patient, rng)).collect()
}
