//! Plain-text assessment report.

use chrono::{DateTime, Utc};

use crate::domain::{
    EcgAnalysis, ModelScore, PatientAttributes, PredictionRecord, PredictionResult,
    NO_SIGNIFICANT_ABNORMALITIES,
};

use super::scoring::MODELS;

const RULE: &str = "------------------------------------------------------------";

const DISCLAIMER: [&str; 2] = [
    "DISCLAIMER: This report is generated by a prototype prediction system and is for educational/research purposes only.",
    "It should not be used for clinical decision-making. Always consult a qualified healthcare professional.",
];

/// Render a report for `result`, stamped with the current time.
#[must_use]
pub fn render_report(patient: &PatientAttributes, result: &PredictionResult) -> String {
    render_report_at(patient, result, Utc::now())
}

/// Render a report with an explicit generation time.
#[must_use]
pub fn render_report_at(
    patient: &PatientAttributes,
    result: &PredictionResult,
    generated_at: DateTime<Utc>,
) -> String {
    let mut lines = vec![
        "CardioPredict".to_string(),
        "Multi-Model CVD Risk Assessment Report".to_string(),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        String::new(),
    ];

    section(&mut lines, "Patient Information");
    let patient_fields = [
        ("Age", patient.age.to_string()),
        ("Gender", capitalize(patient.sex.as_str())),
        ("Systolic BP", format!("{} mmHg", patient.systolic_bp)),
        ("Diastolic BP", format!("{} mmHg", patient.diastolic_bp)),
        ("Total Cholesterol", format!("{} mg/dL", patient.cholesterol)),
        ("HDL", format!("{} mg/dL", patient.hdl)),
        ("LDL", format!("{} mg/dL", patient.ldl)),
        ("Blood Sugar", format!("{} mg/dL", patient.blood_sugar)),
        ("BMI", patient.bmi.to_string()),
        ("Smoking", yes_no(patient.smoking)),
        ("Family History", yes_no(patient.family_history)),
        ("Exercise", capitalize(patient.exercise.as_str())),
    ];
    key_values(&mut lines, &patient_fields);

    section(&mut lines, "Ensemble Prediction");
    lines.push(format!(
        "  {} / 100 - {} RISK",
        result.ensemble_score, result.ensemble_risk_level
    ));
    lines.push(format!("  {}", result.ensemble_risk_level.description()));
    lines.push(String::new());

    if !result.top_risk_factors.is_empty() {
        section(&mut lines, "Top Risk Factors");
        for factor in &result.top_risk_factors {
            lines.push(format!("  ! {factor}"));
        }
        lines.push(String::new());
    }

    section(&mut lines, "Model Breakdown");
    for model in &result.predictions {
        lines.push(format!(
            "  {:<22} {:<16} {:>3}  {:>3}% conf  {}",
            model.model_name, model.model_type, model.risk_score, model.confidence, model.risk_level
        ));
    }
    lines.push(String::new());

    if let Some(ecg) = &result.ecg_analysis {
        ecg_section(&mut lines, ecg);
    }

    lines.extend(DISCLAIMER.iter().map(|l| (*l).to_string()));
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render a report for a saved record, stamped with its creation time.
///
/// Records keep only model summaries; the model family is recovered from the
/// model table by name.
#[must_use]
pub fn render_record_report(record: &PredictionRecord) -> String {
    let predictions = record
        .model_results
        .iter()
        .map(|summary| {
            let model_type = MODELS
                .iter()
                .find(|m| m.name == summary.model_name)
                .map_or("", |m| m.model_type);
            ModelScore::new(
                summary.model_name.clone(),
                model_type,
                summary.risk_score,
                summary.confidence,
            )
        })
        .collect();

    let result = PredictionResult {
        predictions,
        ensemble_score: record.ensemble_score,
        ensemble_risk_level: record.ensemble_risk_level,
        top_risk_factors: record.top_risk_factors.clone(),
        ecg_analysis: record.ecg_analysis.clone(),
    };
    render_report_at(&record.attributes, &result, record.created_at)
}

fn ecg_section(lines: &mut Vec<String>, ecg: &EcgAnalysis) {
    section(lines, "ECG Analysis");
    let fields = [
        ("Heart Rate", format!("{} bpm", ecg.heart_rate)),
        ("Rhythm", ecg.rhythm.to_string()),
        ("PR Interval", ecg.pr_interval_display()),
        ("QRS Duration", format!("{} ms", ecg.qrs_duration)),
        ("QT Interval", format!("{} ms", ecg.qt_interval)),
        ("ST Segment", ecg.st_segment.to_string()),
        ("T-Wave", ecg.t_wave.to_string()),
        ("Risk Impact", format!("+{} pts", ecg.risk_contribution)),
    ];
    key_values(lines, &fields);

    lines.push("  Findings:".to_string());
    for finding in &ecg.findings {
        let marker = if finding == NO_SIGNIFICANT_ABNORMALITIES { "+" } else { "!" };
        lines.push(format!("    {marker} {finding}"));
    }
    lines.push(String::new());
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(title.to_string());
    lines.push(RULE.to_string());
}

fn key_values(lines: &mut Vec<String>, fields: &[(&str, String)]) {
    for (key, value) in fields {
        lines.push(format!("  {key:<18} {value}"));
    }
    lines.push(String::new());
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ScriptedSource;
    use crate::application::RiskPredictor;
    use crate::domain::{Rhythm, RiskLevel, StSegment, TWave};

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-14T09:30:00Z")
            .expect("Should parse timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn test_report_without_ecg() {
        let patient = PatientAttributes::default();
        let result = RiskPredictor::new(ScriptedSource::constant(0.5)).predict(&patient, false);
        let report = render_report_at(&patient, &result, fixed_time());

        assert!(report.starts_with("CardioPredict\n"));
        assert!(report.contains("Generated: 2026-03-14 09:30:00 UTC"));
        assert!(report.contains("Patient Information"));
        assert!(report.contains("Gender"));
        assert!(report.contains("Male"));
        assert!(report.contains("28.5"));
        assert!(report.contains("53 / 100 - HIGH RISK"));
        assert!(report.contains("! Family History"));
        assert!(report.contains("83% conf"));
        assert!(report.contains("Random Forest"));
        assert!(!report.contains("ECG Analysis"));
        assert!(report.trim_end().ends_with("Always consult a qualified healthcare professional."));
    }

    #[test]
    fn test_report_shows_missing_pr_interval() {
        let patient = PatientAttributes::default();
        let mut result = RiskPredictor::new(ScriptedSource::constant(0.5)).predict(&patient, false);
        result.ecg_analysis = Some(EcgAnalysis {
            heart_rate: 118,
            rhythm: Rhythm::AtrialFibrillation,
            pr_interval: 0,
            qrs_duration: 96,
            qt_interval: 410,
            st_segment: StSegment::Normal,
            t_wave: TWave::Normal,
            findings: vec![
                "Atrial Fibrillation detected".to_string(),
                "Tachycardia".to_string(),
            ],
            risk_contribution: 19,
        });
        result.ensemble_risk_level = RiskLevel::Critical;

        let report = render_report_at(&patient, &result, fixed_time());
        assert!(report.contains("ECG Analysis"));
        assert!(report.contains("N/A"));
        assert!(report.contains("Atrial Fibrillation"));
        assert!(report.contains("+19 pts"));
        assert!(report.contains("! Tachycardia"));
    }

    #[test]
    fn test_record_report_matches_result_report() {
        let patient = PatientAttributes::default();
        let result = RiskPredictor::new(ScriptedSource::constant(0.5)).predict(&patient, false);
        let record = PredictionRecord::new(patient.clone(), false, &result);

        let from_record = render_record_report(&record);
        let direct = render_report_at(&patient, &result, record.created_at);
        assert_eq!(from_record, direct);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("moderate"), "Moderate");
        assert_eq!(capitalize(""), "");
    }
}
