//! Synthetic ECG interpretation.
//!
//! No signal is parsed. When a recording is supplied, a plausible
//! interpretation is drawn from fixed categorical distributions and scored by
//! a list of independent finding rules.

use crate::domain::{
    EcgAnalysis, Rhythm, StSegment, TWave, MAX_ECG_RISK_CONTRIBUTION,
    NO_SIGNIFICANT_ABNORMALITIES,
};
use crate::ports::RandomSource;

/// Rhythm prior, in selection order.
pub const RHYTHM_WEIGHTS: [(Rhythm, f64); 5] = [
    (Rhythm::NormalSinus, 0.45),
    (Rhythm::SinusTachycardia, 0.20),
    (Rhythm::SinusBradycardia, 0.10),
    (Rhythm::AtrialFibrillation, 0.15),
    (Rhythm::AtrialFlutter, 0.10),
];

const ST_OPTIONS: [StSegment; 3] = [StSegment::Normal, StSegment::Elevated, StSegment::Depressed];
const T_OPTIONS: [TWave; 3] = [TWave::Normal, TWave::Inverted, TWave::Peaked];

/// Index span for the ST and T draws. Normal sinus rhythm only reaches the
/// first two categories.
fn morphology_range(rhythm: Rhythm) -> f64 {
    if rhythm == Rhythm::NormalSinus {
        1.5
    } else {
        3.0
    }
}

/// Cumulative-subtraction choice.
///
/// Subtracts weights from `u` in order and returns the first category that
/// brings the remainder to zero or below; the last category absorbs any
/// rounding leftover.
///
/// # Panics
/// Panics if `options` is empty.
#[must_use]
pub fn weighted_choice<T: Copy>(options: &[(T, f64)], u: f64) -> T {
    let mut remainder = u;
    for (category, weight) in options {
        remainder -= weight;
        if remainder <= 0.0 {
            return *category;
        }
    }
    options[options.len() - 1].0
}

/// Floor-indexed choice: `options[floor(u * range)]`.
///
/// A draw on an exact boundary belongs to the higher category. The index is
/// capped at the last option.
///
/// # Panics
/// Panics if `options` is empty.
#[must_use]
pub fn indexed_choice<T: Copy>(options: &[T], u: f64, range: f64) -> T {
    let index = (u * range).floor().max(0.0) as usize;
    options[index.min(options.len() - 1)]
}

/// Inclusive heart-rate range for a rhythm.
#[must_use]
pub fn heart_rate_range(rhythm: Rhythm) -> (u32, u32) {
    match rhythm {
        Rhythm::SinusTachycardia => (100, 130),
        Rhythm::SinusBradycardia => (45, 60),
        Rhythm::AtrialFibrillation => (80, 150),
        Rhythm::NormalSinus | Rhythm::AtrialFlutter => (60, 90),
    }
}

/// Generator of synthetic ECG interpretations.
pub struct EcgSimulator;

impl EcgSimulator {
    /// Draw a rhythm, then the rest of the interpretation.
    pub fn simulate<R: RandomSource + ?Sized>(rng: &mut R) -> EcgAnalysis {
        let rhythm = weighted_choice(&RHYTHM_WEIGHTS, rng.next_unit());
        Self::simulate_with_rhythm(rng, rhythm)
    }

    /// Draw an interpretation for a fixed rhythm.
    pub fn simulate_with_rhythm<R: RandomSource + ?Sized>(
        rng: &mut R,
        rhythm: Rhythm,
    ) -> EcgAnalysis {
        let (hr_lo, hr_hi) = heart_rate_range(rhythm);
        let heart_rate = rng.int_between(hr_lo, hr_hi);

        let pr_interval = if rhythm == Rhythm::AtrialFibrillation {
            0
        } else {
            rng.int_between(120, 200)
        };
        let qrs_duration = rng.int_between(80, 130);
        let qt_interval = rng.int_between(350, 450);

        let range = morphology_range(rhythm);
        let st_segment = indexed_choice(&ST_OPTIONS, rng.next_unit(), range);
        let t_wave = indexed_choice(&T_OPTIONS, rng.next_unit(), range);

        let (findings, risk_contribution) = interpret(
            rhythm,
            heart_rate,
            pr_interval,
            qrs_duration,
            qt_interval,
            st_segment,
            t_wave,
        );

        EcgAnalysis {
            heart_rate,
            rhythm,
            pr_interval,
            qrs_duration,
            qt_interval,
            st_segment,
            t_wave,
            findings,
            risk_contribution,
        }
    }
}

/// Evaluate every finding rule; contributions accumulate, capped at 30.
fn interpret(
    rhythm: Rhythm,
    heart_rate: u32,
    pr_interval: u32,
    qrs_duration: u32,
    qt_interval: u32,
    st_segment: StSegment,
    t_wave: TWave,
) -> (Vec<String>, u8) {
    let mut findings = Vec::new();
    let mut total: u32 = 0;
    let mut note = |finding: String, points: u32| {
        findings.push(finding);
        total += points;
    };

    if rhythm != Rhythm::NormalSinus {
        let points = match rhythm {
            Rhythm::AtrialFibrillation => 15,
            Rhythm::AtrialFlutter => 12,
            _ => 5,
        };
        note(format!("{rhythm} detected"), points);
    }
    if heart_rate > 100 {
        note("Tachycardia".to_string(), 4);
    }
    if heart_rate < 50 {
        note("Bradycardia".to_string(), 3);
    }
    if pr_interval > 200 {
        note("Prolonged PR interval (possible 1st degree AV block)".to_string(), 5);
    }
    if qrs_duration > 120 {
        note("Wide QRS complex".to_string(), 6);
    }
    if qt_interval > 440 {
        note("Prolonged QT interval".to_string(), 5);
    }
    match st_segment {
        StSegment::Elevated => note("ST elevation (possible ischemia)".to_string(), 10),
        StSegment::Depressed => note("ST depression".to_string(), 7),
        StSegment::Normal => {}
    }
    match t_wave {
        TWave::Inverted => note("T-wave inversion".to_string(), 5),
        TWave::Peaked => note("Peaked T-waves".to_string(), 4),
        TWave::Normal => {}
    }

    if findings.is_empty() {
        findings.push(NO_SIGNIFICANT_ABNORMALITIES.to_string());
    }

    let capped = total.min(u32::from(MAX_ECG_RISK_CONTRIBUTION)) as u8;
    (findings, capped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ChaChaSource, ScriptedSource};

    #[test]
    fn test_rhythm_selection_law() {
        let pick = |u: f64| weighted_choice(&RHYTHM_WEIGHTS, u);
        assert_eq!(pick(0.0), Rhythm::NormalSinus);
        assert_eq!(pick(0.45), Rhythm::NormalSinus);
        assert_eq!(pick(0.46), Rhythm::SinusTachycardia);
        assert_eq!(pick(0.70), Rhythm::SinusBradycardia);
        assert_eq!(pick(0.80), Rhythm::AtrialFibrillation);
        assert_eq!(pick(0.95), Rhythm::AtrialFlutter);
    }

    #[test]
    fn test_leftover_falls_to_last_category() {
        let short = [(1u8, 0.2), (2u8, 0.3)];
        assert_eq!(weighted_choice(&short, 0.9), 2);
    }

    #[test]
    fn test_morphology_boundaries_take_higher_category() {
        let draw = |rhythm: Rhythm, u: f64| {
            let mut rng = ScriptedSource::new(vec![0.0, 0.0, 0.0, 0.0, u, u]);
            let ecg = EcgSimulator::simulate_with_rhythm(&mut rng, rhythm);
            (ecg.st_segment, ecg.t_wave)
        };

        assert_eq!(
            draw(Rhythm::AtrialFlutter, 1.0 / 3.0),
            (StSegment::Elevated, TWave::Inverted)
        );
        assert_eq!(
            draw(Rhythm::AtrialFlutter, 2.0 / 3.0),
            (StSegment::Depressed, TWave::Peaked)
        );
        assert_eq!(
            draw(Rhythm::AtrialFlutter, 0.333),
            (StSegment::Normal, TWave::Normal)
        );
        assert_eq!(
            draw(Rhythm::NormalSinus, 2.0 / 3.0),
            (StSegment::Elevated, TWave::Inverted)
        );
        assert_eq!(
            draw(Rhythm::NormalSinus, 0.66),
            (StSegment::Normal, TWave::Normal)
        );
    }

    #[test]
    fn test_indexed_choice_caps_index() {
        assert_eq!(indexed_choice(&[1u8, 2, 3], 0.999, 3.0), 3);
        assert_eq!(indexed_choice(&[1u8, 2, 3], 1.0, 3.0), 3);
        assert_eq!(indexed_choice(&[1u8, 2, 3], 0.0, 1.5), 1);
    }

    #[test]
    fn test_quiet_normal_sinus() {
        // rhythm, heart rate, PR, QRS, QT, ST, T
        let mut rng = ScriptedSource::new(vec![0.1, 0.5, 0.5, 0.2, 0.2, 0.1, 0.1]);
        let ecg = EcgSimulator::simulate(&mut rng);

        assert_eq!(ecg.rhythm, Rhythm::NormalSinus);
        assert_eq!(ecg.heart_rate, 75);
        assert_eq!(ecg.pr_interval, 160);
        assert_eq!(ecg.qrs_duration, 90);
        assert_eq!(ecg.qt_interval, 370);
        assert_eq!(ecg.st_segment, StSegment::Normal);
        assert_eq!(ecg.t_wave, TWave::Normal);
        assert_eq!(ecg.findings, vec![NO_SIGNIFICANT_ABNORMALITIES.to_string()]);
        assert_eq!(ecg.risk_contribution, 0);
        assert!(!ecg.has_abnormality());
        assert_eq!(rng.draws(), 7);
    }

    #[test]
    fn test_atrial_fibrillation_skips_pr_draw() {
        // rhythm, heart rate, QRS, QT, ST, T
        let mut rng = ScriptedSource::new(vec![0.8, 0.5, 0.0, 0.0, 0.0, 0.0]);
        let ecg = EcgSimulator::simulate(&mut rng);

        assert_eq!(ecg.rhythm, Rhythm::AtrialFibrillation);
        assert_eq!(ecg.pr_interval, 0);
        assert_eq!(ecg.heart_rate, 115);
        assert_eq!(
            ecg.findings,
            vec!["Atrial Fibrillation detected".to_string(), "Tachycardia".to_string()]
        );
        assert_eq!(ecg.risk_contribution, 19);
        assert_eq!(rng.draws(), 6);
    }

    #[test]
    fn test_contribution_is_capped() {
        // heart rate, PR, QRS, QT, ST, T: fast, long PR, wide QRS, long QT,
        // ST depressed, peaked T
        let mut rng = ScriptedSource::new(vec![0.99, 0.99, 0.99, 0.99, 0.99, 0.99]);
        let ecg = EcgSimulator::simulate_with_rhythm(&mut rng, Rhythm::AtrialFlutter);

        assert_eq!(ecg.heart_rate, 90);
        assert_eq!(ecg.st_segment, StSegment::Depressed);
        assert_eq!(ecg.t_wave, TWave::Peaked);
        assert!(ecg.findings.contains(&"Atrial Flutter detected".to_string()));
        assert!(ecg.findings.contains(&"Wide QRS complex".to_string()));
        assert!(ecg.findings.contains(&"Prolonged QT interval".to_string()));
        assert!(ecg.findings.contains(&"ST depression".to_string()));
        // 12 + 6 + 5 + 7 + 4 = 34 before the cap
        assert_eq!(ecg.risk_contribution, MAX_ECG_RISK_CONTRIBUTION);
    }

    #[test]
    fn test_bradycardia_finding() {
        let mut rng = ScriptedSource::new(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let ecg = EcgSimulator::simulate_with_rhythm(&mut rng, Rhythm::SinusBradycardia);

        assert_eq!(ecg.heart_rate, 45);
        assert_eq!(
            ecg.findings,
            vec!["Sinus Bradycardia detected".to_string(), "Bradycardia".to_string()]
        );
        assert_eq!(ecg.risk_contribution, 8);
    }

    #[test]
    fn test_random_interpretations_hold_invariants() {
        let mut rng = ChaChaSource::from_seed(7);
        for _ in 0..2000 {
            let ecg = EcgSimulator::simulate(&mut rng);
            let (lo, hi) = heart_rate_range(ecg.rhythm);

            assert!((lo..=hi).contains(&ecg.heart_rate));
            assert_eq!(ecg.pr_interval == 0, ecg.rhythm == Rhythm::AtrialFibrillation);
            assert!((80..=130).contains(&ecg.qrs_duration));
            assert!((350..=450).contains(&ecg.qt_interval));
            assert!(ecg.risk_contribution <= MAX_ECG_RISK_CONTRIBUTION);
            assert!(!ecg.findings.is_empty());
            if ecg.rhythm == Rhythm::NormalSinus {
                assert_ne!(ecg.st_segment, StSegment::Depressed);
                assert_ne!(ecg.t_wave, TWave::Peaked);
            }
        }
    }
}
