//! Patient attribute types for cardiovascular risk scoring.
//!
//! Values are accepted as entered. Out-of-range numbers are never rejected by
//! the scoring engine; they flow through the linear formulas and are clamped
//! at the score boundary. [`PatientAttributes::validate`] is advisory only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Biological sex category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            other => Err(format!("Unknown sex category: {other}")),
        }
    }
}

/// Self-reported physical activity level.
///
/// Declaration order is also intensity order; scoring tables index by
/// [`ExerciseLevel::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseLevel {
    None,
    Light,
    Moderate,
    Heavy,
}

impl ExerciseLevel {
    /// Position in the none/light/moderate/heavy ordering.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Light => 1,
            Self::Moderate => 2,
            Self::Heavy => 3,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
        }
    }
}

impl fmt::Display for ExerciseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Light => write!(f, "Light"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Heavy => write!(f, "Heavy"),
        }
    }
}

impl FromStr for ExerciseLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "heavy" => Ok(Self::Heavy),
            other => Err(format!("Unknown exercise level: {other}")),
        }
    }
}

/// Clinical inputs for one risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAttributes {
    /// Age in years
    pub age: f64,

    /// Biological sex category
    #[serde(alias = "gender")]
    pub sex: Sex,

    /// Systolic blood pressure in mmHg
    #[serde(rename = "systolicBP")]
    pub systolic_bp: f64,

    /// Diastolic blood pressure in mmHg
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: f64,

    /// Total cholesterol in mg/dL
    pub cholesterol: f64,

    /// HDL cholesterol in mg/dL
    pub hdl: f64,

    /// LDL cholesterol in mg/dL
    pub ldl: f64,

    /// Fasting blood sugar in mg/dL
    pub blood_sugar: f64,

    /// Body-mass index
    pub bmi: f64,

    pub smoking: bool,

    /// Family history of cardiovascular disease
    pub family_history: bool,

    pub exercise: ExerciseLevel,
}

impl Default for PatientAttributes {
    /// The pre-filled intake form values.
    fn default() -> Self {
        Self {
            age: 52.0,
            sex: Sex::Male,
            systolic_bp: 138.0,
            diastolic_bp: 88.0,
            cholesterol: 245.0,
            hdl: 42.0,
            ldl: 155.0,
            blood_sugar: 110.0,
            bmi: 28.5,
            smoking: false,
            family_history: true,
            exercise: ExerciseLevel::Light,
        }
    }
}

impl PatientAttributes {
    /// Check values against physiological ranges.
    ///
    /// Scoring never calls this. Callers may use it to warn about suspicious
    /// input; rejecting input would change scores for the same fixtures.
    ///
    /// # Errors
    /// Returns the list of out-of-range descriptions.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let ranges: [(&str, f64, f64, f64); 8] = [
            ("Age", self.age, 0.0, 120.0),
            ("Systolic BP", self.systolic_bp, 60.0, 260.0),
            ("Diastolic BP", self.diastolic_bp, 30.0, 160.0),
            ("Total cholesterol", self.cholesterol, 50.0, 600.0),
            ("HDL", self.hdl, 5.0, 200.0),
            ("LDL", self.ldl, 10.0, 400.0),
            ("Blood sugar", self.blood_sugar, 20.0, 600.0),
            ("BMI", self.bmi, 10.0, 80.0),
        ];

        for (name, value, lo, hi) in ranges {
            if !value.is_finite() || !(lo..=hi).contains(&value) {
                errors.push(format!("{name} {value} out of range [{lo}, {hi}]"));
            }
        }

        if self.diastolic_bp > self.systolic_bp {
            errors.push(format!(
                "Diastolic BP {} exceeds systolic BP {}",
                self.diastolic_bp, self.systolic_bp
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
