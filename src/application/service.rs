//! Prediction service: runs assessments and keeps their history.

use std::sync::{Arc, Mutex};

use crate::adapters::StorageError;
use crate::domain::{HistoryFilter, PatientAttributes, PredictionRecord, PredictionResult};
use crate::ports::{PredictionPage, PredictionStore, RandomSource};
use crate::{CardioError, Result};

use super::predictor::RiskPredictor;

/// Service combining the predictor with a prediction store.
///
/// The predictor sits behind a `Mutex`, so one service can be shared between
/// threads; draws from the random source are serialized.
pub struct PredictionService<S, R>
where
    S: PredictionStore,
    R: RandomSource,
{
    storage: Arc<S>,
    predictor: Mutex<RiskPredictor<R>>,
}

impl<S, R> PredictionService<S, R>
where
    S: PredictionStore,
    S::Error: Into<StorageError>,
    R: RandomSource,
{
    /// Create a new prediction service.
    pub fn new(storage: Arc<S>, rng: R) -> Self {
        Self {
            storage,
            predictor: Mutex::new(RiskPredictor::new(rng)),
        }
    }

    /// Compute an assessment without persisting it.
    ///
    /// # Errors
    /// Returns error if the predictor lock is poisoned.
    pub fn evaluate(
        &self,
        attributes: &PatientAttributes,
        ecg_requested: bool,
    ) -> Result<PredictionResult> {
        if let Err(problems) = attributes.validate() {
            tracing::debug!("Out-of-range inputs scored as given: {}", problems.join("; "));
        }

        let mut predictor = self
            .predictor
            .lock()
            .map_err(|_| CardioError::Random("Predictor lock poisoned".to_string()))?;
        Ok(predictor.predict(attributes, ecg_requested))
    }

    /// Persist a record, logging instead of failing.
    ///
    /// Returns whether the record was stored.
    pub fn persist(&self, record: &PredictionRecord) -> bool {
        match self.storage.save_prediction(record) {
            Ok(()) => {
                tracing::debug!("Saved prediction {}", record.id);
                true
            }
            Err(e) => {
                let e: StorageError = e.into();
                tracing::warn!("Failed to save prediction: {}", e);
                false
            }
        }
    }

    /// Compute an assessment and save it to history.
    ///
    /// A storage failure is logged and the computed record is still returned.
    ///
    /// # Errors
    /// Returns error if the predictor lock is poisoned.
    pub fn assess(
        &self,
        attributes: PatientAttributes,
        ecg_requested: bool,
    ) -> Result<PredictionRecord> {
        let result = self.evaluate(&attributes, ecg_requested)?;
        let record = PredictionRecord::new(attributes, ecg_requested, &result);
        self.persist(&record);
        Ok(record)
    }

    /// Most recent records, newest first.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        self.storage
            .load_recent_predictions(limit)
            .map_err(|e| CardioError::Storage(e.into()))
    }

    /// One page of history, newest first.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn page(&self, offset: usize, limit: usize) -> Result<PredictionPage> {
        self.storage
            .load_predictions_paginated(offset, limit)
            .map_err(|e| CardioError::Storage(e.into()))
    }

    /// The newest `limit` records, narrowed by `filter`.
    ///
    /// Filtering happens after the fetch, so fewer than `limit` records may be
    /// returned even when older matches exist.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn history(
        &self,
        filter: &HistoryFilter,
        limit: usize,
    ) -> Result<Vec<PredictionRecord>> {
        let records = self.recent(limit)?;
        let fetched = records.len();
        let kept = filter.apply(records);
        if filter.is_active() {
            tracing::debug!("History filter kept {} of {} records", kept.len(), fetched);
        }
        Ok(kept)
    }

    /// Look up one record.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn find(&self, id: &str) -> Result<Option<PredictionRecord>> {
        self.storage
            .load_prediction(id)
            .map_err(|e| CardioError::Storage(e.into()))
    }

    /// Total number of stored records.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn count(&self) -> Result<usize> {
        self.storage
            .count_predictions()
            .map_err(|e| CardioError::Storage(e.into()))
    }

    /// Delete one record. Returns whether it existed.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self
            .storage
            .delete_prediction(id)
            .map_err(|e| CardioError::Storage(e.into()))?;
        if removed {
            tracing::info!("Deleted prediction {}", id);
        }
        Ok(removed)
    }
}
