//! Synthetic ECG interpretation types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel finding meaning nothing else was reported.
pub const NO_SIGNIFICANT_ABNORMALITIES: &str = "No significant abnormalities";

/// Upper bound for the score points an ECG can add.
pub const MAX_ECG_RISK_CONTRIBUTION: u8 = 30;

/// Cardiac rhythm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rhythm {
    #[serde(rename = "Normal Sinus")]
    NormalSinus,
    #[serde(rename = "Sinus Tachycardia")]
    SinusTachycardia,
    #[serde(rename = "Sinus Bradycardia")]
    SinusBradycardia,
    #[serde(rename = "Atrial Fibrillation")]
    AtrialFibrillation,
    #[serde(rename = "Atrial Flutter")]
    AtrialFlutter,
}

impl Rhythm {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NormalSinus => "Normal Sinus",
            Self::SinusTachycardia => "Sinus Tachycardia",
            Self::SinusBradycardia => "Sinus Bradycardia",
            Self::AtrialFibrillation => "Atrial Fibrillation",
            Self::AtrialFlutter => "Atrial Flutter",
        }
    }
}

impl fmt::Display for Rhythm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// ST segment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StSegment {
    Normal,
    Elevated,
    Depressed,
}

impl fmt::Display for StSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Elevated => write!(f, "Elevated"),
            Self::Depressed => write!(f, "Depressed"),
        }
    }
}

/// T-wave morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TWave {
    Normal,
    Inverted,
    Peaked,
}

impl fmt::Display for TWave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Inverted => write!(f, "Inverted"),
            Self::Peaked => write!(f, "Peaked"),
        }
    }
}

/// Interpretation of a (simulated) ECG recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcgAnalysis {
    /// Beats per minute
    pub heart_rate: u32,

    pub rhythm: Rhythm,

    /// PR interval in ms; 0 when not applicable (atrial fibrillation)
    pub pr_interval: u32,

    /// QRS duration in ms
    pub qrs_duration: u32,

    /// QT interval in ms
    pub qt_interval: u32,

    pub st_segment: StSegment,

    pub t_wave: TWave,

    /// Ordered findings; never empty
    pub findings: Vec<String>,

    /// Additional risk points in [0, 30]
    pub risk_contribution: u8,
}

impl EcgAnalysis {
    /// Whether anything beyond the "no abnormalities" sentinel was found.
    #[must_use]
    pub fn has_abnormality(&self) -> bool {
        self.findings
            .first()
            .is_some_and(|f| f != NO_SIGNIFICANT_ABNORMALITIES)
    }

    /// PR interval for display: "N/A" when not applicable.
    #[must_use]
    pub fn pr_interval_display(&self) -> String {
        if self.pr_interval == 0 {
            "N/A".to_string()
        } else {
            format!("{} ms", self.pr_interval)
        }
    }
}
