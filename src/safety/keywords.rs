//! Blocked-term replacement pass: diagnostic/prescriptive vocabulary is
//! replaced wholesale with a redaction marker.

use std::sync::LazyLock;

use regex::Regex;

/// Replacement for every blocked-term occurrence.
pub const REDACTION_MARKER: &str = "[removed for safety]";

/// Diagnostic and prescriptive vocabulary that never reaches the user.
/// Order matters for overlapping terms ("treat" before "treatment").
const BLOCKED_TERMS: [&str; 17] = [
    "diagnose",
    "diagnosis",
    "treat",
    "treatment",
    "prescribe",
    "prescription",
    "medication",
    "medicine",
    "drug",
    "cure",
    "therapy",
    "you have",
    "you should take",
    "you need to",
    "you must",
    "take this",
    "use this medication",
];

static BLOCKED_TERM_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    BLOCKED_TERMS
        .iter()
        .map(|term| {
            let regex = Regex::new(&format!("(?i){}", regex::escape(term))).expect("valid regex");
            (*term, regex)
        })
        .collect()
});

/// Replace every case-insensitive occurrence of every blocked term.
/// Returns the rewritten text and the terms that triggered, for audit.
pub(super) fn replace_blocked_terms(text: &str) -> (String, Vec<&'static str>) {
    let mut sanitized = text.to_string();
    let mut triggered = Vec::new();

    for (term, regex) in BLOCKED_TERM_PATTERNS.iter() {
        if regex.is_match(&sanitized) {
            triggered.push(*term);
            sanitized = regex.replace_all(&sanitized, REDACTION_MARKER).to_string();
        }
    }

    (sanitized, triggered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_passes_untouched() {
        let (text, triggered) = replace_blocked_terms("Hemoglobin carries oxygen.");
        assert_eq!(text, "Hemoglobin carries oxygen.");
        assert!(triggered.is_empty());
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let (text, triggered) = replace_blocked_terms("One drug here, another DRUG there.");
        assert!(!text.to_lowercase().contains("drug"));
        assert_eq!(text.matches(REDACTION_MARKER).count(), 2);
        assert_eq!(triggered, vec!["drug"]);
    }

    #[test]
    fn multiple_terms_all_trigger() {
        let (text, triggered) =
            replace_blocked_terms("You have a condition; the cure is this medication.");
        assert!(triggered.contains(&"you have"));
        assert!(triggered.contains(&"cure"));
        assert!(triggered.contains(&"medication"));
        assert!(!text.to_lowercase().contains("cure"));
    }

    #[test]
    fn treat_redacts_inside_treatment() {
        // "treat" runs first and consumes the prefix of "treatment".
        let (text, triggered) = replace_blocked_terms("Consider treatment options.");
        assert!(triggered.contains(&"treat"));
        assert!(text.contains(REDACTION_MARKER));
        assert!(!text.to_lowercase().contains("treatment"));
    }

    #[test]
    fn phrase_terms_match_across_word_boundaries() {
        let (text, _) = replace_blocked_terms("Well, you must rest.");
        assert_eq!(text, format!("Well, {REDACTION_MARKER} rest."));
    }
}
