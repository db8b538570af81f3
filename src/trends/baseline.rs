//! Personal baseline statistics over a trailing lookback window.

use chrono::Months;

use crate::models::{BaselineStats, TrendPoint};

use super::TrendOptions;

/// Compute baseline statistics over the points whose report date falls
/// within the lookback window ending at `options.as_of`.
///
/// `points` must be date-sorted (as produced by [`super::analyze`]).
/// Returns `None` when no point qualifies; variability is `None` when
/// fewer than 2 points qualify (sample standard deviation needs n ≥ 2).
pub fn baseline_stats(points: &[TrendPoint], options: &TrendOptions) -> Option<BaselineStats> {
    let cutoff = options
        .as_of
        .checked_sub_months(Months::new(options.lookback_years.saturating_mul(12)))?;

    let window: Vec<&TrendPoint> = points
        .iter()
        .filter(|p| p.observation.report_date >= cutoff)
        .collect();
    if window.is_empty() {
        return None;
    }

    let values: Vec<f64> = window.iter().map(|p| p.observation.value).collect();
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;

    let variability = if count >= 2 {
        let sum_squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Some((sum_squares / (count as f64 - 1.0)).sqrt())
    } else {
        None
    };

    let min_value = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(BaselineStats {
        personal_baseline: mean,
        variability,
        min_value,
        max_value,
        count,
        first_date: window.first()?.observation.report_date,
        last_date: window.last()?.observation.report_date,
    })
}
