//! Ensemble aggregation.

use crate::domain::{ModelScore, RiskLevel};
use crate::ports::RandomSource;

/// Lower bound of the per-model ECG boost multiplier.
const BOOST_MIN: f64 = 0.7;
/// Width of the multiplier range, so `m` lies in `[0.7, 1.3)`.
const BOOST_SPAN: f64 = 0.6;

/// Add an ECG contribution to every model score.
///
/// Each model draws its own multiplier, so models may disagree about how much
/// the same finding matters. A zero contribution consumes no randomness.
pub fn apply_ecg_boost<R: RandomSource + ?Sized>(
    scores: &mut [ModelScore],
    contribution: u8,
    rng: &mut R,
) {
    if contribution == 0 {
        return;
    }
    for score in scores.iter_mut() {
        let multiplier = BOOST_MIN + rng.next_unit() * BOOST_SPAN;
        let points = (f64::from(contribution) * multiplier).round().max(0.0) as u32;
        score.add_points(points);
        tracing::trace!(
            model = %score.model_name,
            points,
            boosted = score.risk_score,
            "Applied ECG boost"
        );
    }
}

/// Confidence-weighted mean of the model scores and its band.
///
/// Returns a score of 0 when no confidence is available.
#[must_use]
pub fn aggregate(scores: &[ModelScore]) -> (u8, RiskLevel) {
    let weight: f64 = scores.iter().map(|s| f64::from(s.confidence)).sum();
    let score = if weight > 0.0 {
        let weighted: f64 = scores
            .iter()
            .map(|s| f64::from(s.risk_score) * f64::from(s.confidence))
            .sum();
        (weighted / weight).round().clamp(0.0, 100.0) as u8
    } else {
        0
    };
    (score, RiskLevel::from_score(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ScriptedSource;

    fn scores(values: &[(u8, u8)]) -> Vec<ModelScore> {
        values
            .iter()
            .map(|&(risk, confidence)| ModelScore::new("Model", "Test", risk, confidence))
            .collect()
    }

    #[test]
    fn test_confidence_weighted_mean() {
        // (40*80 + 60*90 + 50*85 + 30*75) / 330 = 15100 / 330 = 45.76
        let (score, level) = aggregate(&scores(&[(40, 80), (60, 90), (50, 85), (30, 75)]));
        assert_eq!(score, 46);
        assert_eq!(level, RiskLevel::Moderate);
    }

    #[test]
    fn test_boundary_scores_take_higher_band() {
        for (value, band) in [
            (25, RiskLevel::Moderate),
            (50, RiskLevel::High),
            (75, RiskLevel::Critical),
        ] {
            let (score, level) = aggregate(&scores(&[(value, 80), (value, 90)]));
            assert_eq!(score, value);
            assert_eq!(level, band);
        }
    }

    #[test]
    fn test_zero_confidence_yields_zero() {
        let (score, level) = aggregate(&scores(&[(80, 0), (90, 0)]));
        assert_eq!(score, 0);
        assert_eq!(level, RiskLevel::Low);
        assert_eq!(aggregate(&[]).0, 0);
    }

    #[test]
    fn test_boost_uses_one_draw_per_model() {
        let mut models = scores(&[(20, 80), (20, 80), (95, 80)]);
        // multipliers 0.7, 1.0, 1.3-
        let mut rng = ScriptedSource::new(vec![0.0, 0.5, 0.999]);
        apply_ecg_boost(&mut models, 20, &mut rng);

        assert_eq!(models[0].risk_score, 34);
        assert_eq!(models[1].risk_score, 40);
        assert_eq!(models[1].risk_level, RiskLevel::Moderate);
        assert_eq!(models[2].risk_score, 100);
        assert_eq!(models[2].risk_level, RiskLevel::Critical);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_zero_contribution_skips_boost() {
        let mut models = scores(&[(20, 80), (30, 80)]);
        let before = models.clone();
        let mut rng = ScriptedSource::constant(0.9);
        apply_ecg_boost(&mut models, 0, &mut rng);

        assert_eq!(models, before);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_boost_never_lowers_scores() {
        let mut models = scores(&[(0, 80), (49, 85), (74, 90), (100, 76)]);
        let before: Vec<u8> = models.iter().map(|m| m.risk_score).collect();
        let mut rng = ScriptedSource::new(vec![0.0, 0.3, 0.6, 0.9]);
        apply_ecg_boost(&mut models, 1, &mut rng);

        for (model, old) in models.iter().zip(before) {
            assert!(model.risk_score >= old);
            assert_eq!(model.risk_level, RiskLevel::from_score(model.risk_score));
        }
    }
}
