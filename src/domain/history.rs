//! Filtering of saved prediction records.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::{PredictionRecord, RiskLevel};

/// Criteria for narrowing the prediction history.
///
/// Every unset criterion matches everything. Age bounds and dates are
/// inclusive; dates cover the whole UTC day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub risk_level: Option<RiskLevel>,
    pub min_age: Option<f64>,
    pub max_age: Option<f64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl HistoryFilter {
    /// Whether any criterion is set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.risk_level.is_some()
            || self.min_age.is_some()
            || self.max_age.is_some()
            || self.date_from.is_some()
            || self.date_to.is_some()
    }

    #[must_use]
    pub fn matches(&self, record: &PredictionRecord) -> bool {
        if let Some(level) = self.risk_level {
            if record.ensemble_risk_level != level {
                return false;
            }
        }
        if let Some(min) = self.min_age {
            if record.attributes.age < min {
                return false;
            }
        }
        if let Some(max) = self.max_age {
            if record.attributes.age > max {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if record.created_at < start_of_day(from) {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if record.created_at >= start_of_day(to) + Duration::days(1) {
                return false;
            }
        }
        true
    }

    /// Keep matching records, preserving order.
    #[must_use]
    pub fn apply(&self, records: Vec<PredictionRecord>) -> Vec<PredictionRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PatientAttributes, PredictionResult};
    use chrono::TimeZone;

    fn record(age: f64, level: RiskLevel, created_at: DateTime<Utc>) -> PredictionRecord {
        let result = PredictionResult {
            predictions: Vec::new(),
            ensemble_score: 0,
            ensemble_risk_level: level,
            top_risk_factors: Vec::new(),
            ecg_analysis: None,
        };
        let mut record = PredictionRecord::new(
            PatientAttributes {
                age,
                ..Default::default()
            },
            false,
            &result,
        );
        record.created_at = created_at;
        record
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("Valid date")
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = HistoryFilter::default();
        assert!(!filter.is_active());
        assert!(filter.matches(&record(40.0, RiskLevel::Low, Utc::now())));
    }

    #[test]
    fn test_risk_and_age_filters() {
        let filter = HistoryFilter {
            risk_level: Some(RiskLevel::High),
            min_age: Some(50.0),
            max_age: Some(60.0),
            ..Default::default()
        };
        assert!(filter.is_active());

        let now = Utc::now();
        assert!(filter.matches(&record(50.0, RiskLevel::High, now)));
        assert!(filter.matches(&record(60.0, RiskLevel::High, now)));
        assert!(!filter.matches(&record(61.0, RiskLevel::High, now)));
        assert!(!filter.matches(&record(49.0, RiskLevel::High, now)));
        assert!(!filter.matches(&record(55.0, RiskLevel::Critical, now)));
    }

    #[test]
    fn test_date_range_covers_whole_days() {
        let filter = HistoryFilter {
            date_from: Some(day(2024, 3, 1)),
            date_to: Some(day(2024, 3, 2)),
            ..Default::default()
        };

        let first_moment = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let last_moment = Utc.with_ymd_and_hms(2024, 3, 2, 23, 59, 59).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap();

        assert!(filter.matches(&record(50.0, RiskLevel::Low, first_moment)));
        assert!(filter.matches(&record(50.0, RiskLevel::Low, last_moment)));
        assert!(!filter.matches(&record(50.0, RiskLevel::Low, before)));
        assert!(!filter.matches(&record(50.0, RiskLevel::Low, after)));
    }

    #[test]
    fn test_apply_preserves_order() {
        let now = Utc::now();
        let records = vec![
            record(70.0, RiskLevel::High, now),
            record(30.0, RiskLevel::Low, now),
            record(65.0, RiskLevel::High, now),
        ];
        let filter = HistoryFilter {
            risk_level: Some(RiskLevel::High),
            ..Default::default()
        };
        let kept = filter.apply(records);
        assert_eq!(kept.len(), 2);
        assert!((kept[0].attributes.age - 70.0).abs() < f64::EPSILON);
        assert!((kept[1].attributes.age - 65.0).abs() < f64::EPSILON);
    }
}
