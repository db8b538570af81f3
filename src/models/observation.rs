use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lexicon::ReferenceRange;

use super::enums::{AlertSeverity, InsightKind, ValueStatus};

/// One matched test from a document, before subject/report identity is
/// attached. Produced by [`crate::extraction::extract`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationCandidate {
    pub test_name: String,
    pub value: f64,
    pub unit: String,
    pub reference_range: ReferenceRange,
    pub status: ValueStatus,
}

impl ObservationCandidate {
    /// Attach the identity the extractor does not know about.
    pub fn into_observation(
        self,
        subject_id: Uuid,
        report_id: &str,
        report_date: NaiveDate,
    ) -> Observation {
        Observation {
            subject_id,
            report_id: report_id.to_string(),
            test_name: self.test_name,
            value: self.value,
            unit: self.unit,
            reference_range: self.reference_range,
            status: self.status,
            report_date,
            created_at: Utc::now(),
        }
    }
}

/// One measured lab value, owned by a subject. Never mutated after
/// creation; a corrected document supersedes it via re-extraction
/// (the store upserts by (subject_id, report_id, test_name)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub subject_id: Uuid,
    pub report_id: String,
    pub test_name: String,
    pub value: f64,
    pub unit: String,
    pub reference_range: ReferenceRange,
    /// Derived from value vs reference range at extraction time.
    /// There is no display-time override.
    pub status: ValueStatus,
    pub report_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// An observation annotated with the immediately preceding chronological
/// value for the same (subject, test). Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub observation: Observation,
    /// Value of the prior point by report date, ties broken by insertion order.
    pub previous_value: Option<f64>,
    /// value − previous_value; absent for the first point.
    pub change: Option<f64>,
}

/// Personal baseline statistics over a bounded lookback window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineStats {
    /// Arithmetic mean of the window values.
    pub personal_baseline: f64,
    /// Sample standard deviation (n − 1); absent when fewer than 2 points.
    pub variability: Option<f64>,
    pub min_value: f64,
    pub max_value: f64,
    pub count: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// Step-change alert produced by the trend engine. Ephemeral, per query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub test_name: String,
    pub severity: AlertSeverity,
    pub message: String,
}

/// A report-level finding: either a large step change or a value far
/// from the personal baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub test_name: String,
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_into_observation_carries_identity() {
        let subject = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let candidate = ObservationCandidate {
            test_name: "Hemoglobin".into(),
            value: 11.2,
            unit: "g/dL".into(),
            reference_range: ReferenceRange { min: 13.0, max: 17.0 },
            status: ValueStatus::Low,
        };

        let obs = candidate.into_observation(subject, "report-1", date);
        assert_eq!(obs.subject_id, subject);
        assert_eq!(obs.report_id, "report-1");
        assert_eq!(obs.test_name, "Hemoglobin");
        assert_eq!(obs.value, 11.2);
        assert_eq!(obs.status, ValueStatus::Low);
        assert_eq!(obs.report_date, date);
    }

    #[test]
    fn observation_serializes_status_lowercase() {
        let obs = Observation {
            subject_id: Uuid::nil(),
            report_id: "r".into(),
            test_name: "MCV".into(),
            value: 90.0,
            unit: "fL".into(),
            reference_range: ReferenceRange { min: 83.0, max: 101.0 },
            status: ValueStatus::Normal,
            report_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains("\"status\":\"normal\""));
        assert!(json.contains("\"test_name\":\"MCV\""));
    }
}
