use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::lexicon::ReferenceRange;
use crate::models::enums::ValueStatus;
use crate::models::Observation;

use super::{ObservationStore, StoreError};

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS observations (
    subject_id    BLOB NOT NULL,
    report_id     TEXT NOT NULL,
    test_name     TEXT NOT NULL,
    value         REAL NOT NULL,
    unit          TEXT NOT NULL,
    reference_min REAL NOT NULL,
    reference_max REAL NOT NULL,
    status        TEXT NOT NULL,
    report_date   TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    UNIQUE (subject_id, report_id, test_name)
);
CREATE INDEX IF NOT EXISTS idx_observations_series
    ON observations (subject_id, test_name, report_date);
";

/// SQLite-backed observation store. One record per
/// (subject_id, report_id, test_name).
pub struct SqliteObservationStore {
    conn: Connection,
}

impl SqliteObservationStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl ObservationStore for SqliteObservationStore {
    fn read(&self, subject_id: Uuid, test_name: &str) -> Result<Vec<Observation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT subject_id, report_id, test_name, value, unit,
                    reference_min, reference_max, status, report_date, created_at
             FROM observations
             WHERE subject_id = ?1 AND test_name = ?2
             ORDER BY report_date ASC, rowid ASC",
        )?;

        let rows = stmt.query_map(params![subject_id, test_name], |row| {
            Ok((
                row.get::<_, Uuid>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, NaiveDate>(8)?,
                row.get::<_, DateTime<Utc>>(9)?,
            ))
        })?;

        let mut observations = Vec::new();
        for row in rows {
            let (subject_id, report_id, test_name, value, unit, min, max, status, report_date, created_at) =
                row?;
            observations.push(Observation {
                subject_id,
                report_id,
                test_name,
                value,
                unit,
                reference_range: ReferenceRange { min, max },
                status: ValueStatus::from_str(&status)?,
                report_date,
                created_at,
            });
        }
        Ok(observations)
    }

    fn upsert(&self, observation: &Observation) -> Result<(), StoreError> {
        // created_at keeps the original insertion time on conflict.
        self.conn.execute(
            "INSERT INTO observations (subject_id, report_id, test_name, value, unit,
                 reference_min, reference_max, status, report_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT (subject_id, report_id, test_name) DO UPDATE SET
                 value = excluded.value,
                 unit = excluded.unit,
                 reference_min = excluded.reference_min,
                 reference_max = excluded.reference_max,
                 status = excluded.status,
                 report_date = excluded.report_date",
            params![
                observation.subject_id,
                observation.report_id,
                observation.test_name,
                observation.value,
                observation.unit,
                observation.reference_range.min,
                observation.reference_range.max,
                observation.status.as_str(),
                observation.report_date,
                observation.created_at,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(subject: Uuid, report: &str, day: u32, value: f64) -> Observation {
        let range = ReferenceRange { min: 13.0, max: 17.0 };
        Observation {
            subject_id: subject,
            report_id: report.to_string(),
            test_name: "Hemoglobin".into(),
            value,
            unit: "g/dL".into(),
            reference_range: range,
            status: range.classify(value),
            report_date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            created_at: Utc::now(),
        }
    }

    // =================================================================
    // ROUND TRIP
    // =================================================================

    #[test]
    fn upsert_then_read_round_trips() {
        let store = SqliteObservationStore::open_in_memory().unwrap();
        let subject = Uuid::new_v4();
        store.upsert(&obs(subject, "r1", 5, 11.2)).unwrap();

        let series = store.read(subject, "Hemoglobin").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].subject_id, subject);
        assert_eq!(series[0].value, 11.2);
        assert_eq!(series[0].status, ValueStatus::Low);
        assert_eq!(series[0].report_date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(series[0].reference_range, ReferenceRange { min: 13.0, max: 17.0 });
    }

    #[test]
    fn read_returns_date_ascending() {
        let store = SqliteObservationStore::open_in_memory().unwrap();
        let subject = Uuid::new_v4();
        store.upsert(&obs(subject, "r3", 20, 16.0)).unwrap();
        store.upsert(&obs(subject, "r1", 1, 14.0)).unwrap();
        store.upsert(&obs(subject, "r2", 10, 15.0)).unwrap();

        let values: Vec<f64> = store
            .read(subject, "Hemoglobin")
            .unwrap()
            .iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(values, vec![14.0, 15.0, 16.0]);
    }

    #[test]
    fn empty_read_is_ok_not_an_error() {
        let store = SqliteObservationStore::open_in_memory().unwrap();
        let series = store.read(Uuid::new_v4(), "Hemoglobin").unwrap();
        assert!(series.is_empty());
    }

    // =================================================================
    // UPSERT SEMANTICS
    // =================================================================

    #[test]
    fn reextraction_updates_in_place() {
        let store = SqliteObservationStore::open_in_memory().unwrap();
        let subject = Uuid::new_v4();
        store.upsert(&obs(subject, "r1", 5, 11.2)).unwrap();
        // Corrected document, same identity triple.
        store.upsert(&obs(subject, "r1", 5, 14.2)).unwrap();

        let series = store.read(subject, "Hemoglobin").unwrap();
        assert_eq!(series.len(), 1, "upsert must not append a duplicate trend point");
        assert_eq!(series[0].value, 14.2);
        assert_eq!(series[0].status, ValueStatus::Normal);
    }

    #[test]
    fn distinct_reports_append() {
        let store = SqliteObservationStore::open_in_memory().unwrap();
        let subject = Uuid::new_v4();
        store.upsert(&obs(subject, "r1", 5, 14.0)).unwrap();
        store.upsert(&obs(subject, "r2", 6, 14.5)).unwrap();
        assert_eq!(store.read(subject, "Hemoglobin").unwrap().len(), 2);
    }

    // =================================================================
    // ISOLATION
    // =================================================================

    #[test]
    fn subjects_are_isolated() {
        let store = SqliteObservationStore::open_in_memory().unwrap();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.upsert(&obs(alice, "r1", 5, 14.0)).unwrap();

        assert_eq!(store.read(alice, "Hemoglobin").unwrap().len(), 1);
        assert!(store.read(bob, "Hemoglobin").unwrap().is_empty());
    }

    #[test]
    fn tests_are_isolated_by_name() {
        let store = SqliteObservationStore::open_in_memory().unwrap();
        let subject = Uuid::new_v4();
        store.upsert(&obs(subject, "r1", 5, 14.0)).unwrap();
        assert!(store.read(subject, "MCV").unwrap().is_empty());
    }

    // =================================================================
    // FILE-BACKED
    // =================================================================

    #[test]
    fn survives_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observations.db");
        let subject = Uuid::new_v4();

        {
            let store = SqliteObservationStore::open(&path).unwrap();
            store.upsert(&obs(subject, "r1", 5, 11.2)).unwrap();
        }

        let store = SqliteObservationStore::open(&path).unwrap();
        let series = store.read(subject, "Hemoglobin").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].value, 11.2);
    }
}
