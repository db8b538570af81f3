//! Lexicon-driven extraction of test observations from raw OCR text.
//!
//! Tolerant by design: malformed input yields fewer observations, never
//! an error. Recall loss is preferred over false positives.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::Lexicon;
use crate::models::ObservationCandidate;

/// How many lines below a keyword hit are searched for the value.
/// Tolerates OCR layouts that put the label, unit and value on
/// separate lines.
const VALUE_LOOKAHEAD_LINES: usize = 3;

static NUMERIC_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+(?:\.\d+)?").expect("valid regex"));

/// Extract test observations from raw OCR text.
///
/// Scans lines in order; a line containing any keyword of a
/// not-yet-matched test definition triggers a bounded lookahead for the
/// first numeric token in the next [`VALUE_LOOKAHEAD_LINES`] lines. Each
/// test is captured at most once; candidates come out in trigger-line
/// order. Subject/report identity is attached by the caller.
pub fn extract(raw_text: &str, lexicon: &Lexicon) -> Vec<ObservationCandidate> {
    let lines: Vec<&str> = raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut candidates = Vec::new();
    let mut captured: HashSet<&str> = HashSet::new();

    for (i, raw_line) in lines.iter().enumerate() {
        let line = raw_line.to_lowercase();

        for definition in lexicon.definitions() {
            if captured.contains(definition.canonical_name.as_str()) {
                continue;
            }
            if !definition.keywords.iter().any(|k| line.contains(k.as_str())) {
                continue;
            }

            // No numeric token in the window leaves the definition
            // unmatched; a later occurrence of the keyword may still
            // capture it.
            if let Some(value) = first_value_in_window(&lines, i) {
                let status = definition.reference_range.classify(value);
                tracing::debug!(
                    test = %definition.canonical_name,
                    value,
                    status = status.as_str(),
                    line = i,
                    "matched lab test"
                );
                captured.insert(definition.canonical_name.as_str());
                candidates.push(ObservationCandidate {
                    test_name: definition.canonical_name.clone(),
                    value,
                    unit: definition.unit.clone(),
                    reference_range: definition.reference_range,
                    status,
                });
            }
        }
    }

    candidates
}

/// First parseable numeric token in the lines following `hit`,
/// nearest line first. A token that fails to parse is treated as no
/// match at that position.
fn first_value_in_window(lines: &[&str], hit: usize) -> Option<f64> {
    for line in lines.iter().skip(hit + 1).take(VALUE_LOOKAHEAD_LINES) {
        if let Some(token) = NUMERIC_TOKEN_RE.find(line) {
            if let Ok(value) = token.as_str().parse::<f64>() {
                return Some(value);
            }
        }
    }
    None
}
