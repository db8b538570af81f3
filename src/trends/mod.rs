//! Longitudinal analysis of one subject's series for one test.
//!
//! Pure and stateless: `analyze` is a function of the supplied series
//! plus the options, with no state between calls. The caller owns I/O.

pub mod alerts;
pub mod baseline;
pub mod compare;

pub use alerts::{baseline_outlier, step_change_alerts};
pub use baseline::baseline_stats;
pub use compare::{compare_reports, ReportComparison};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::{Alert, BaselineStats, Observation, TrendPoint};

/// Percent-change magnitude below which the summary calls the series stable.
const STABLE_SUMMARY_THRESHOLD_PERCENT: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct TrendOptions {
    /// Baseline window length in years.
    pub lookback_years: u32,
    /// "Now" for the baseline window. Pinned in tests for determinism.
    pub as_of: NaiveDate,
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            lookback_years: config::DEFAULT_LOOKBACK_YEARS,
            as_of: Local::now().date_naive(),
        }
    }
}

/// Everything the trend engine derives from one series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend_points: Vec<TrendPoint>,
    /// Absent when no point falls inside the lookback window.
    pub baseline: Option<BaselineStats>,
    /// Absent for series shorter than 2 points or a zero first value.
    pub summary: Option<String>,
    pub alerts: Vec<Alert>,
}

/// Analyze a series that is already filtered to one (subject, test).
///
/// The series need not be pre-sorted; it is sorted ascending by report
/// date with a stable sort, so same-date points keep insertion order.
pub fn analyze(series: &[Observation], options: &TrendOptions) -> TrendAnalysis {
    let mut sorted: Vec<Observation> = series.to_vec();
    sorted.sort_by_key(|obs| obs.report_date);

    let mut trend_points = Vec::with_capacity(sorted.len());
    let mut previous: Option<f64> = None;
    for observation in sorted {
        let value = observation.value;
        trend_points.push(TrendPoint {
            previous_value: previous,
            change: previous.map(|p| value - p),
            observation,
        });
        previous = Some(value);
    }

    let baseline = baseline::baseline_stats(&trend_points, options);
    let summary = summarize(&trend_points);
    let alerts = alerts::step_change_alerts(&trend_points);

    TrendAnalysis { trend_points, baseline, summary, alerts }
}

/// One-sentence state of the series, comparing the earliest and latest
/// point of the FULL supplied history (intentionally wider than the
/// baseline window).
fn summarize(points: &[TrendPoint]) -> Option<String> {
    if points.len() < 2 {
        return None;
    }
    let first = points.first()?.observation.value;
    let last = points.last()?.observation.value;
    if first == 0.0 {
        // Percent change is undefined; absent summary, not a fault.
        return None;
    }

    let test_name = &points[0].observation.test_name;
    let percent_change = (last - first) / first * 100.0;
    if percent_change.abs() > STABLE_SUMMARY_THRESHOLD_PERCENT {
        let direction = if percent_change > 0.0 { "increased" } else { "decreased" };
        Some(format!(
            "Your {} has {} by {:.1}% over time.",
            test_name,
            direction,
            percent_change.abs()
        ))
    } else {
        Some(format!("Your {test_name} has remained relatively stable over time."))
    }
}
