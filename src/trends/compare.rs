//! Side-by-side comparison of selected reports: one column per report,
//! one row per test name, with the net change across the selection.
//!
//! Pure like `analyze`; the caller fetches and selects the observations
//! (typically two or more reports' worth).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::lexicon::ReferenceRange;
use crate::models::enums::ValueStatus;
use crate::models::Observation;

/// One test's entry inside a single report column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedTest {
    pub test_name: String,
    pub value: f64,
    pub unit: String,
    pub reference_range: ReferenceRange,
    pub status: ValueStatus,
}

/// One report column, oldest to newest within the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub report_id: String,
    pub report_date: NaiveDate,
    pub tests: Vec<ComparedTest>,
}

/// One test row across the selected reports. `values` is parallel to
/// [`ReportComparison::reports`]; a slot is absent when that report did
/// not include the test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestComparison {
    pub test_name: String,
    pub values: Vec<Option<ComparedTest>>,
    /// Newest report's value minus the earliest present value. Absent
    /// when the newest report lacks the test or the value is unchanged.
    pub change: Option<f64>,
    /// Unit of the change; empty when `change` is absent.
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportComparison {
    pub reports: Vec<ReportSnapshot>,
    pub comparisons: Vec<TestComparison>,
}

/// Pivot a subject's observations into a comparison grid.
///
/// Observations are ordered by report date (ties by test name) before
/// grouping, so columns read oldest to newest. Rows cover the union of
/// test names in first-seen order; a test missing from a report leaves
/// an absent slot rather than dropping the row.
pub fn compare_reports(observations: &[Observation]) -> ReportComparison {
    let mut sorted: Vec<&Observation> = observations.iter().collect();
    sorted.sort_by(|a, b| {
        a.report_date
            .cmp(&b.report_date)
            .then_with(|| a.test_name.cmp(&b.test_name))
    });

    let mut reports: Vec<ReportSnapshot> = Vec::new();
    for observation in &sorted {
        let entry = ComparedTest {
            test_name: observation.test_name.clone(),
            value: observation.value,
            unit: observation.unit.clone(),
            reference_range: observation.reference_range,
            status: observation.status,
        };
        match reports.iter_mut().find(|r| r.report_id == observation.report_id) {
            Some(report) => report.tests.push(entry),
            None => reports.push(ReportSnapshot {
                report_id: observation.report_id.clone(),
                report_date: observation.report_date,
                tests: vec![entry],
            }),
        }
    }

    let mut test_names: Vec<String> = Vec::new();
    for report in &reports {
        for test in &report.tests {
            if !test_names.contains(&test.test_name) {
                test_names.push(test.test_name.clone());
            }
        }
    }

    let comparisons = test_names
        .into_iter()
        .map(|test_name| {
            let values: Vec<Option<ComparedTest>> = reports
                .iter()
                .map(|report| {
                    report.tests.iter().find(|t| t.test_name == test_name).cloned()
                })
                .collect();

            let first = values.iter().flatten().next();
            let last = values.last().and_then(|slot| slot.as_ref());
            let (change, unit) = match (first, last) {
                (Some(first), Some(last)) if first.value != last.value => {
                    (Some(last.value - first.value), last.unit.clone())
                }
                _ => (None, String::new()),
            };

            TestComparison { test_name, values, change, unit }
        })
        .collect();

    ReportComparison { reports, comparisons }
}
