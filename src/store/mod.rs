//! Persistence seam for observations. The core reads series through
//! this trait and treats writes as fire-and-forget (no retries here;
//! the surrounding system owns that).

pub mod sqlite;

pub use sqlite::SqliteObservationStore;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{ModelError, Observation};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid stored value: {0}")]
    InvalidStored(#[from] ModelError),
}

/// Read/write of historical observations keyed by (subject, test name).
/// A trait so tests and callers can substitute their own backend.
pub trait ObservationStore {
    /// All observations for one (subject, test), ascending by report
    /// date. Possibly empty; emptiness is not an error.
    fn read(&self, subject_id: Uuid, test_name: &str) -> Result<Vec<Observation>, StoreError>;

    /// Insert, or update in place when (subject_id, report_id,
    /// test_name) already exists — re-extraction of a corrected report
    /// supersedes, never appends.
    fn upsert(&self, observation: &Observation) -> Result<(), StoreError>;
}
