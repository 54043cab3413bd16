//! Background prediction worker.
//!
//! Runs an assessment on its own thread and reports progress over a channel,
//! so a front end can stay responsive while the record is computed and saved.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::adapters::StorageError;
use crate::domain::{PatientAttributes, PredictionRecord};
use crate::ports::{PredictionStore, RandomSource};

use super::service::PredictionService;

/// Progress updates from the prediction worker.
#[derive(Debug, Clone)]
pub enum PredictionProgress {
    /// Models are being evaluated
    Scoring,
    /// Result computed, writing it to history
    Saving,
    /// Assessment complete
    Complete(Box<PredictionRecord>),
    /// Assessment failed
    Error(String),
}

/// Handle to a running prediction worker.
pub struct PredictionWorkerHandle {
    /// Receiver for progress updates
    pub progress_rx: Receiver<PredictionProgress>,
    handle: JoinHandle<()>,
}

impl PredictionWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<PredictionProgress> {
        self.progress_rx.try_recv().ok()
    }

    /// Block until the worker finishes and return its final outcome.
    ///
    /// # Errors
    /// Returns the worker's error message, or a message if the thread panicked
    /// or exited without reporting.
    pub fn wait(self) -> Result<PredictionRecord, String> {
        let mut outcome = Err("Worker exited without a result".to_string());
        for progress in self.progress_rx.iter() {
            match progress {
                PredictionProgress::Complete(record) => outcome = Ok(*record),
                PredictionProgress::Error(message) => outcome = Err(message),
                PredictionProgress::Scoring | PredictionProgress::Saving => {}
            }
        }
        if self.handle.join().is_err() {
            return Err("Prediction worker panicked".to_string());
        }
        outcome
    }
}

/// Worker that runs predictions in the background.
pub struct PredictionWorker;

impl PredictionWorker {
    /// Spawn a background assessment.
    ///
    /// Returns a handle to receive progress updates.
    pub fn spawn<S, R>(
        service: Arc<PredictionService<S, R>>,
        attributes: PatientAttributes,
        ecg_requested: bool,
    ) -> PredictionWorkerHandle
    where
        S: PredictionStore + 'static,
        S::Error: Into<StorageError>,
        R: RandomSource + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(&service, attributes, ecg_requested, &tx);
        });

        PredictionWorkerHandle {
            progress_rx: rx,
            handle,
        }
    }

    fn run_with_progress<S, R>(
        service: &PredictionService<S, R>,
        attributes: PatientAttributes,
        ecg_requested: bool,
        tx: &Sender<PredictionProgress>,
    ) where
        S: PredictionStore,
        S::Error: Into<StorageError>,
        R: RandomSource,
    {
        let _ = tx.send(PredictionProgress::Scoring);

        let result = match service.evaluate(&attributes, ecg_requested) {
            Ok(result) => result,
            Err(e) => {
                let _ = tx.send(PredictionProgress::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(PredictionProgress::Saving);
        let record = PredictionRecord::new(attributes, ecg_requested, &result);
        service.persist(&record);

        let _ = tx.send(PredictionProgress::Complete(Box::new(record)));
    }
}
