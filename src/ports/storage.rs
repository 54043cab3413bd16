//! Storage port: Trait for persisting prediction records.
//!
//! This trait abstracts the storage backend (SQLite) from the application logic.
//! The scoring engine never calls it; results are complete before anything
//! is written.

use crate::domain::PredictionRecord;

/// A page of records with pagination metadata.
#[derive(Debug, Clone)]
pub struct PredictionPage {
    /// Records in this page
    pub items: Vec<PredictionRecord>,
    /// Total count of all records
    pub total_count: usize,
    /// Current page offset
    pub offset: usize,
    /// Page size limit
    pub limit: usize,
    /// Whether there are more pages
    pub has_more: bool,
}

impl PredictionPage {
    #[must_use]
    pub fn new(items: Vec<PredictionRecord>, total_count: usize, offset: usize, limit: usize) -> Self {
        let has_more = offset + items.len() < total_count;
        Self {
            items,
            total_count,
            offset,
            limit,
            has_more,
        }
    }

    /// Get the next page offset.
    #[must_use]
    pub fn next_offset(&self) -> Option<usize> {
        if self.has_more {
            Some(self.offset + self.limit)
        } else {
            None
        }
    }

    /// Get the previous page offset.
    #[must_use]
    pub fn prev_offset(&self) -> Option<usize> {
        if self.offset > 0 {
            Some(self.offset.saturating_sub(self.limit))
        } else {
            None
        }
    }
}

/// Trait for prediction record storage.
pub trait PredictionStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert a record.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn save_prediction(&self, record: &PredictionRecord) -> Result<(), Self::Error>;

    /// Load up to `limit` records, newest first.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_recent_predictions(&self, limit: usize) -> Result<Vec<PredictionRecord>, Self::Error>;

    /// Load records with offset pagination, newest first.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_predictions_paginated(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<PredictionPage, Self::Error>;

    /// Load a single record by ID.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_prediction(&self, id: &str) -> Result<Option<PredictionRecord>, Self::Error>;

    /// Get the total number of records.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn count_predictions(&self) -> Result<usize, Self::Error>;

    /// Delete a record by ID. Returns whether a record was removed.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn delete_prediction(&self, id: &str) -> Result<bool, Self::Error>;

    /// Remove every record.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn clear_all(&self) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offsets() {
        let last = PredictionPage::new(Vec::new(), 10, 10, 10);
        assert!(!last.has_more);
        assert_eq!(last.next_offset(), None);
        assert_eq!(last.prev_offset(), Some(0));

        let middle = PredictionPage::new(Vec::new(), 25, 10, 10);
        assert!(middle.has_more);
        assert_eq!(middle.next_offset(), Some(20));

        let first = PredictionPage::new(Vec::new(), 0, 0, 10);
        assert_eq!(first.prev_offset(), None);
    }
}
