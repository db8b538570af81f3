//! Report-level workflows: ingest a scanned report into the store, and
//! analyze a processed report across all its tests.
//!
//! Owns the collaborator calls the pure engines do not make: store
//! reads/writes and the generator invocation. Per-test store failures
//! degrade that test's analysis, never the whole report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extraction;
use crate::generator::{
    ExplanationGenerator, ExplanationRequest, SubjectContext, TrendDescription,
};
use crate::lexicon::Lexicon;
use crate::models::enums::{InsightKind, TrendDirection};
use crate::models::{Alert, Insight, Observation, TrendPoint};
use crate::safety;
use crate::store::{ObservationStore, StoreError};
use crate::trends::{self, TrendOptions};

/// Latest-step percent change above which a change insight is raised.
const SIGNIFICANT_CHANGE_PERCENT: f64 = 10.0;

/// Everything the caller surfaces for one analyzed report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportAnalysis {
    /// Sanitized explanation; always present, always disclaimed.
    pub explanation: String,
    pub trends: Vec<TrendDescription>,
    pub insights: Vec<Insight>,
    pub alerts: Vec<Alert>,
    pub test_count: usize,
}

/// Extract observations from raw OCR text, attach identity, and upsert
/// each into the store. Returns what was persisted, in extraction order.
pub fn ingest_report(
    store: &dyn ObservationStore,
    lexicon: &Lexicon,
    raw_text: &str,
    subject_id: Uuid,
    report_id: &str,
    report_date: NaiveDate,
) -> Result<Vec<Observation>, StoreError> {
    let candidates = extraction::extract(raw_text, lexicon);
    tracing::info!(
        report_id,
        extracted = candidates.len(),
        "ingesting extracted observations"
    );

    let mut stored = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let observation = candidate.into_observation(subject_id, report_id, report_date);
        store.upsert(&observation)?;
        stored.push(observation);
    }
    Ok(stored)
}

/// Analyze every test of a processed report against the subject's
/// history, then generate and sanitize an explanation.
///
/// Two alerting rules run per test and their outputs are unioned: the
/// per-step change rule (inside [`trends::analyze`]) and the 2-sigma
/// baseline outlier rule.
pub fn analyze_report(
    store: &dyn ObservationStore,
    generator: &dyn ExplanationGenerator,
    subject_id: Uuid,
    tests: &[Observation],
    subject: SubjectContext,
    options: &TrendOptions,
) -> ReportAnalysis {
    let mut trend_descriptions = Vec::new();
    let mut insights = Vec::new();
    let mut alerts = Vec::new();

    for test in tests {
        let series = match store.read(subject_id, &test.test_name) {
            Ok(series) => series,
            Err(error) => {
                tracing::warn!(test = %test.test_name, %error, "skipping trend analysis for test");
                continue;
            }
        };

        let analysis = trends::analyze(&series, options);
        alerts.extend(analysis.alerts);

        if let Some(step) = latest_step(&analysis.trend_points) {
            if step.percent_change > SIGNIFICANT_CHANGE_PERCENT {
                insights.push(Insight {
                    kind: InsightKind::Change,
                    test_name: test.test_name.clone(),
                    title: format!("Significant change in {}", test.test_name),
                    description: format!(
                        "Your {} has changed by {:.1}% since your last test. Consider \
                         discussing this with your healthcare provider.",
                        test.test_name, step.percent_change
                    ),
                });
            }
            trend_descriptions.push(step);
        }

        if let Some(baseline) = &analysis.baseline {
            if let Some(insight) = trends::baseline_outlier(test.value, &test.test_name, baseline)
            {
                insights.push(insight);
            }
        }
    }

    let request = ExplanationRequest {
        observations: tests.to_vec(),
        trends: trend_descriptions.clone(),
        insights: insights.clone(),
        subject,
    };
    let generated = match generator.generate(&request) {
        Ok(text) => Some(text),
        Err(error) => {
            tracing::warn!(%error, "explanation generation failed, falling back");
            None
        }
    };
    let explanation = safety::sanitize(generated.as_deref());

    ReportAnalysis {
        explanation,
        trends: trend_descriptions,
        insights,
        alerts,
        test_count: tests.len(),
    }
}

/// Describe the most recent step of a series, when it has one and the
/// previous value is nonzero (percent change is undefined otherwise).
fn latest_step(points: &[TrendPoint]) -> Option<TrendDescription> {
    let last = points.last()?;
    let previous = last.previous_value?;
    if previous == 0.0 {
        return None;
    }
    let percent_change = (last.observation.value - previous) / previous * 100.0;
    let direction = if percent_change > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };
    Some(TrendDescription {
        test_name: last.observation.test_name.clone(),
        description: format!(
            "Value changed from {:.2} to {:.2}",
            previous, last.observation.value
        ),
        percent_change: percent_change.abs(),
        direction,
    })
}
