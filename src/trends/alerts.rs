//! The two independent alerting rules over one series.
//!
//! Step-change looks at adjacent points; the baseline outlier compares a
//! single value to the long-run mean. They catch different phenomena, so
//! both run and their outputs are unioned by the report analyzer.

use crate::models::enums::{AlertSeverity, InsightKind};
use crate::models::{Alert, BaselineStats, Insight, TrendPoint};

/// Absolute change (in the test's native unit) above which an alert fires.
pub const STEP_CHANGE_THRESHOLD: f64 = 10.0;
/// Absolute change above which the alert escalates to high severity.
pub const STEP_CHANGE_HIGH_THRESHOLD: f64 = 20.0;
/// How many standard deviations from the baseline mark a value unusual.
pub const BASELINE_SIGMA_FACTOR: f64 = 2.0;

/// Rule 1: one alert per trend point whose step change exceeds the
/// threshold.
pub fn step_change_alerts(points: &[TrendPoint]) -> Vec<Alert> {
    points
        .iter()
        .filter_map(|point| {
            let change = point.change?;
            if change.abs() <= STEP_CHANGE_THRESHOLD {
                return None;
            }
            let severity = if change.abs() > STEP_CHANGE_HIGH_THRESHOLD {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            };
            let direction = if change > 0.0 { "increase" } else { "decrease" };
            Some(Alert {
                test_name: point.observation.test_name.clone(),
                severity,
                message: format!(
                    "Significant change detected: {} of {:.2} from previous test.",
                    direction,
                    change.abs()
                ),
            })
        })
        .collect()
}

/// Rule 2: flag a value that sits more than two standard deviations from
/// the personal baseline.
///
/// Skipped when variability is absent (fewer than 2 window points): a
/// single-point "baseline" cannot say what is unusual.
pub fn baseline_outlier(
    current_value: f64,
    test_name: &str,
    baseline: &BaselineStats,
) -> Option<Insight> {
    let variability = baseline.variability?;
    let deviation = (current_value - baseline.personal_baseline).abs();
    if deviation <= BASELINE_SIGMA_FACTOR * variability {
        return None;
    }
    Some(Insight {
        kind: InsightKind::Baseline,
        test_name: test_name.to_string(),
        title: format!("Unusual value for {test_name}"),
        description: format!(
            "Your current value ({current_value}) differs significantly from your \
             personal baseline ({:.2}). This may warrant discussion with your \
             healthcare provider.",
            baseline.personal_baseline
        ),
    })
}
