//! Directive-phrase replacement pass: spans that read like a
//! prescription are rewritten to point the user at their doctor.

use std::sync::LazyLock;

use regex::Regex;

/// Replacement for matched directive spans.
pub const CONSULT_MARKER: &str = "[removed - consult your doctor]";

static DIRECTIVE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)you should (take|use|start|stop)").expect("valid regex"),
        Regex::new(r"(?i)you need to (take|use|start|stop)").expect("valid regex"),
        Regex::new(r"(?i)I recommend (taking|using)").expect("valid regex"),
        Regex::new(r"(?i)you must (take|use)").expect("valid regex"),
    ]
});

/// Replace every directive span. Independent of the blocked-term pass;
/// both always run.
pub(super) fn replace_directive_phrases(text: &str) -> String {
    let mut sanitized = text.to_string();
    for pattern in DIRECTIVE_PATTERNS.iter() {
        sanitized = pattern.replace_all(&sanitized, CONSULT_MARKER).to_string();
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn you_should_start_is_replaced() {
        let text = replace_directive_phrases("You should start a supplement.");
        assert_eq!(text, format!("{CONSULT_MARKER} a supplement."));
    }

    #[test]
    fn you_need_to_stop_is_replaced() {
        let text = replace_directive_phrases("you need to stop smoking now");
        assert!(text.starts_with(CONSULT_MARKER));
        assert!(!text.contains("you need to stop"));
    }

    #[test]
    fn i_recommend_using_is_replaced() {
        let text = replace_directive_phrases("I recommend using a humidifier.");
        assert!(text.contains(CONSULT_MARKER));
    }

    #[test]
    fn you_must_take_is_replaced_case_insensitively() {
        let text = replace_directive_phrases("YOU MUST TAKE this seriously.");
        assert!(text.contains(CONSULT_MARKER));
        assert!(!text.to_lowercase().contains("you must take"));
    }

    #[test]
    fn non_directive_phrasing_passes() {
        let input = "Your doctor may suggest options at your next visit.";
        assert_eq!(replace_directive_phrases(input), input);
    }
}
