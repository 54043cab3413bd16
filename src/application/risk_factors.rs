//! Risk factor ranking.
//!
//! Works from the raw attributes only; model outputs play no part.

use crate::domain::{EcgAnalysis, ExerciseLevel, PatientAttributes};

/// Label prepended when the ECG shows any abnormality.
pub const ECG_ABNORMALITY: &str = "ECG Abnormality";

/// Attribute-derived factors kept before the ECG label is considered.
const MAX_ATTRIBUTE_FACTORS: usize = 4;

/// Length cap of the final list.
pub const MAX_RISK_FACTORS: usize = 5;

/// A labelled factor with its ranking weight.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskFactor {
    pub label: &'static str,
    pub weight: f64,
}

/// Every triggered factor, in declaration order.
#[must_use]
pub fn candidate_factors(p: &PatientAttributes) -> Vec<RiskFactor> {
    let mut factors = Vec::new();
    let mut push = |label: &'static str, weight: f64| factors.push(RiskFactor { label, weight });

    if p.age > 45.0 {
        push("Age > 45", p.age - 45.0);
    }
    if p.systolic_bp > 130.0 {
        push("High Blood Pressure", (p.systolic_bp - 130.0) * 0.5);
    }
    if p.cholesterol > 240.0 {
        push("High Cholesterol", (p.cholesterol - 240.0) * 0.3);
    }
    if p.ldl > 130.0 {
        push("High LDL", (p.ldl - 130.0) * 0.3);
    }
    if p.hdl < 40.0 {
        push("Low HDL", (40.0 - p.hdl) * 0.4);
    }
    if p.bmi > 30.0 {
        push("Obesity (BMI > 30)", (p.bmi - 30.0) * 1.2);
    } else if p.bmi > 25.0 {
        push("Overweight", (p.bmi - 25.0) * 0.8);
    }
    if p.smoking {
        push("Smoking", 15.0);
    }
    if p.family_history {
        push("Family History", 10.0);
    }
    if p.blood_sugar > 126.0 {
        push("High Blood Sugar", 12.0);
    }
    if p.exercise == ExerciseLevel::None {
        push("Sedentary Lifestyle", 7.0);
    }

    factors
}

/// Top factor labels, most important first.
///
/// Ties keep declaration order. At most four attribute factors are kept; an
/// abnormal ECG adds [`ECG_ABNORMALITY`] in front.
#[must_use]
pub fn rank_risk_factors(p: &PatientAttributes, ecg: Option<&EcgAnalysis>) -> Vec<String> {
    let mut factors = candidate_factors(p);
    // Stable sort: equal weights stay in declaration order.
    factors.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    let mut labels: Vec<String> = Vec::with_capacity(MAX_RISK_FACTORS);
    if ecg.is_some_and(EcgAnalysis::has_abnormality) {
        labels.push(ECG_ABNORMALITY.to_string());
    }
    for factor in factors.into_iter().take(MAX_ATTRIBUTE_FACTORS) {
        if !labels.iter().any(|l| l == factor.label) {
            labels.push(factor.label.to_string());
        }
    }
    labels.truncate(MAX_RISK_FACTORS);
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Rhythm, Sex, StSegment, TWave, NO_SIGNIFICANT_ABNORMALITIES};

    fn ecg(findings: &[&str]) -> EcgAnalysis {
        EcgAnalysis {
            heart_rate: 80,
            rhythm: Rhythm::NormalSinus,
            pr_interval: 150,
            qrs_duration: 90,
            qt_interval: 400,
            st_segment: StSegment::Normal,
            t_wave: TWave::Normal,
            findings: findings.iter().map(|f| (*f).to_string()).collect(),
            risk_contribution: 0,
        }
    }

    #[test]
    fn test_intake_defaults() {
        // Age 7, BP 4, cholesterol 1.5, LDL 7.5, overweight 2.8, family 10
        let labels = rank_risk_factors(&PatientAttributes::default(), None);
        assert_eq!(labels, ["Family History", "High LDL", "Age > 45", "High Blood Pressure"]);
    }

    #[test]
    fn test_overweight_is_reported_when_it_ranks() {
        let p = PatientAttributes {
            age: 40.0,
            systolic_bp: 120.0,
            cholesterol: 200.0,
            ldl: 120.0,
            ..Default::default()
        };
        let labels = rank_risk_factors(&p, None);
        assert_eq!(labels, ["Family History", "Overweight"]);
    }

    #[test]
    fn test_obesity_excludes_overweight() {
        let p = PatientAttributes {
            bmi: 34.0,
            ..Default::default()
        };
        let candidates = candidate_factors(&p);
        assert!(candidates.iter().any(|f| f.label == "Obesity (BMI > 30)"));
        assert!(!candidates.iter().any(|f| f.label == "Overweight"));
    }

    #[test]
    fn test_ties_keep_declaration_order() {
        // Age weight 10 ties with family history 10; age is declared first.
        let p = PatientAttributes {
            age: 55.0,
            systolic_bp: 120.0,
            cholesterol: 200.0,
            ldl: 120.0,
            bmi: 22.0,
            ..Default::default()
        };
        assert_eq!(rank_risk_factors(&p, None), ["Age > 45", "Family History"]);
    }

    #[test]
    fn test_sorted_by_descending_weight() {
        let p = PatientAttributes {
            age: 70.0,
            systolic_bp: 170.0,
            cholesterol: 300.0,
            hdl: 30.0,
            ldl: 190.0,
            blood_sugar: 150.0,
            bmi: 36.0,
            smoking: true,
            family_history: true,
            sex: Sex::Female,
            exercise: ExerciseLevel::None,
            diastolic_bp: 95.0,
        };
        let candidates = candidate_factors(&p);
        assert_eq!(candidates.len(), 10);

        let labels = rank_risk_factors(&p, None);
        assert_eq!(labels.len(), 4);
        // age 25, BP 20, cholesterol 18, LDL 18
        assert_eq!(labels, ["Age > 45", "High Blood Pressure", "High Cholesterol", "High LDL"]);
    }

    #[test]
    fn test_ecg_abnormality_goes_first() {
        let abnormal = ecg(&["ST depression"]);
        let labels = rank_risk_factors(&PatientAttributes::default(), Some(&abnormal));
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0], ECG_ABNORMALITY);
        assert_eq!(labels[1], "Family History");

        let normal = ecg(&[NO_SIGNIFICANT_ABNORMALITIES]);
        let labels = rank_risk_factors(&PatientAttributes::default(), Some(&normal));
        assert!(!labels.iter().any(|l| l == ECG_ABNORMALITY));
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn test_no_factors_for_low_risk_patient() {
        let p = PatientAttributes {
            age: 30.0,
            systolic_bp: 115.0,
            cholesterol: 180.0,
            hdl: 55.0,
            ldl: 100.0,
            blood_sugar: 90.0,
            bmi: 22.0,
            family_history: false,
            ..Default::default()
        };
        assert!(rank_risk_factors(&p, None).is_empty());
    }
}
