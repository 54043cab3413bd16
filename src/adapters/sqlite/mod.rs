//! SQLite adapter: Implementation of PredictionStore.
//!
//! Provides local persistence for prediction records. Each record is stored
//! as one flattened row; list-valued fields (risk factors, model summaries,
//! ECG analysis) are JSON text columns.
//!
//! # Mutex Behavior
//!
//! Database connection is protected by `Mutex`. A poisoned mutex (from a panic
//! in another thread) makes every later call fail with
//! `StorageError::LockPoisoned`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::SecondsFormat;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{EcgAnalysis, ModelSummary, PatientAttributes, PredictionRecord, RiskLevel};
use crate::ports::{PredictionPage, PredictionStore};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

const SELECT_COLUMNS: &str = r"
    SELECT id, patient_age, patient_gender, systolic_bp, diastolic_bp,
           cholesterol, hdl, ldl, blood_sugar, bmi, smoking, family_history,
           exercise, has_ecg, ensemble_score, ensemble_risk_level,
           top_risk_factors, model_results, ecg_analysis, created_at
    FROM predictions
";

/// SQLite storage adapter.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database at the given path.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Create an in-memory SQLite database (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS predictions (
                id TEXT PRIMARY KEY,
                patient_age REAL NOT NULL,
                patient_gender TEXT NOT NULL,
                systolic_bp REAL NOT NULL,
                diastolic_bp REAL NOT NULL,
                cholesterol REAL NOT NULL,
                hdl REAL NOT NULL,
                ldl REAL NOT NULL,
                blood_sugar REAL NOT NULL,
                bmi REAL NOT NULL,
                smoking INTEGER NOT NULL,
                family_history INTEGER NOT NULL,
                exercise TEXT NOT NULL,
                has_ecg INTEGER NOT NULL,
                ensemble_score INTEGER NOT NULL,
                ensemble_risk_level TEXT NOT NULL,
                top_risk_factors TEXT NOT NULL,
                model_results TEXT NOT NULL,
                ecg_analysis TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_predictions_created
                ON predictions(created_at DESC);
            ",
        )?;

        Ok(())
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<PredictionRecord> {
        let gender: String = row.get(2)?;
        let exercise: String = row.get(12)?;
        let level: String = row.get(15)?;
        let factors: String = row.get(16)?;
        let models: String = row.get(17)?;
        let ecg: Option<String> = row.get(18)?;
        let created_at: String = row.get(19)?;

        let attributes = PatientAttributes {
            age: row.get(1)?,
            sex: parse_column(2, &gender)?,
            systolic_bp: row.get(3)?,
            diastolic_bp: row.get(4)?,
            cholesterol: row.get(5)?,
            hdl: row.get(6)?,
            ldl: row.get(7)?,
            blood_sugar: row.get(8)?,
            bmi: row.get(9)?,
            smoking: row.get::<_, i64>(10)? != 0,
            family_history: row.get::<_, i64>(11)? != 0,
            exercise: parse_column(12, &exercise)?,
        };

        let ensemble_score: i64 = row.get(14)?;
        let ensemble_risk_level: RiskLevel = parse_column(15, &level)?;
        let top_risk_factors: Vec<String> = json_column(16, &factors)?;
        let model_results: Vec<ModelSummary> = json_column(17, &models)?;
        let ecg_analysis: Option<EcgAnalysis> = match ecg {
            Some(text) => Some(json_column(18, &text)?),
            None => None,
        };

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(19, Type::Text, Box::new(e)))?;

        Ok(PredictionRecord {
            id: row.get(0)?,
            attributes,
            has_ecg: row.get::<_, i64>(13)? != 0,
            ensemble_score: ensemble_score.clamp(0, 100) as u8,
            ensemble_risk_level,
            top_risk_factors,
            model_results,
            ecg_analysis,
            created_at,
        })
    }
}

fn parse_column<T>(idx: usize, text: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    text.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

fn json_column<T>(idx: usize, text: &str) -> rusqlite::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl PredictionStore for SqliteStore {
    type Error = StorageError;

    fn save_prediction(&self, record: &PredictionRecord) -> Result<(), Self::Error> {
        let factors = serde_json::to_string(&record.top_risk_factors)?;
        let models = serde_json::to_string(&record.model_results)?;
        let ecg = record
            .ecg_analysis
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.conn()?;
        let a = &record.attributes;

        conn.execute(
            r"
            INSERT INTO predictions (
                id, patient_age, patient_gender, systolic_bp, diastolic_bp,
                cholesterol, hdl, ldl, blood_sugar, bmi, smoking, family_history,
                exercise, has_ecg, ensemble_score, ensemble_risk_level,
                top_risk_factors, model_results, ecg_analysis, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
            ",
            params![
                record.id,
                a.age,
                a.sex.as_str(),
                a.systolic_bp,
                a.diastolic_bp,
                a.cholesterol,
                a.hdl,
                a.ldl,
                a.blood_sugar,
                a.bmi,
                a.smoking as i64,
                a.family_history as i64,
                a.exercise.as_str(),
                record.has_ecg as i64,
                i64::from(record.ensemble_score),
                record.ensemble_risk_level.as_str(),
                factors,
                models,
                ecg,
                record.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;

        tracing::debug!("Saved prediction {} to storage", record.id);
        Ok(())
    }

    fn load_recent_predictions(&self, limit: usize) -> Result<Vec<PredictionRecord>, Self::Error> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        ))?;

        let records = stmt
            .query_map(params![limit as i64], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn load_predictions_paginated(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<PredictionPage, Self::Error> {
        let conn = self.conn()?;

        let total_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM predictions", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2"
        ))?;

        let records = stmt
            .query_map(params![limit as i64, offset as i64], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PredictionPage::new(records, total_count as usize, offset, limit))
    }

    fn load_prediction(&self, id: &str) -> Result<Option<PredictionRecord>, Self::Error> {
        let conn = self.conn()?;

        let record = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                Self::row_to_record,
            )
            .optional()?;

        Ok(record)
    }

    fn count_predictions(&self) -> Result<usize, Self::Error> {
        let conn = self.conn()?;

        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM predictions", [], |row| row.get(0))?;

        Ok(count as usize)
    }

    fn delete_prediction(&self, id: &str) -> Result<bool, Self::Error> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM predictions WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn clear_all(&self) -> Result<(), Self::Error> {
        let conn = self.conn()?;
        conn.execute_batch("DELETE FROM predictions;")?;
        tracing::warn!("Cleared all predictions from storage");
        Ok(())
    }
}
