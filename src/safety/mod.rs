//! Safety guardrail for generated explanation text.
//!
//! Total function: whatever comes in (including nothing), non-empty text
//! with the disclaimer at its head comes out. Two independent rewrite
//! passes run first — blocked-term replacement and directive-phrase
//! replacement — and the disclaimer check runs last so neither pass can
//! clobber it.

mod keywords;
mod patterns;

pub use keywords::REDACTION_MARKER;
pub use patterns::CONSULT_MARKER;

/// First characters of the disclaimer; used to detect an already
/// sanitized text and keep `sanitize` idempotent at the head.
pub const DISCLAIMER_MARKER: &str = "\u{26A0}\u{FE0F}";

/// Mandatory disclaimer block, prepended to every explanation.
pub const DISCLAIMER: &str = "\u{26A0}\u{FE0F} IMPORTANT DISCLAIMER\n\n\
This explanation is for educational purposes only. It does not diagnose \
conditions or recommend treatments. Always consult your healthcare provider \
to discuss your results.\n\n\
\u{2713} Always discuss your results with your healthcare provider\n\
\u{2713} Seek immediate care for urgent symptoms\n\n\
\u{2717} This tool does NOT diagnose medical conditions\n\
\u{2717} This tool does NOT recommend treatments\n\
\u{2717} This tool does NOT replace your doctor's judgment\n\n\
---\n\n";

/// Shown when the generator produced nothing usable.
pub const FALLBACK_MESSAGE: &str = "Unable to generate explanation. Please try again.";

/// Sanitize generated explanation text.
///
/// Absent or blank input yields the disclaimer plus a fallback notice
/// instead of propagating the upstream failure. Triggered blocked terms
/// are logged for audit; the log is an observability side effect, not
/// part of the contract.
pub fn sanitize(text: Option<&str>) -> String {
    let raw = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return format!("{DISCLAIMER}{FALLBACK_MESSAGE}"),
    };

    let (replaced, triggered) = keywords::replace_blocked_terms(raw);
    if !triggered.is_empty() {
        tracing::warn!(terms = ?triggered, "safety guardrails triggered");
    }

    let sanitized = patterns::replace_directive_phrases(&replaced);

    if sanitized.starts_with(DISCLAIMER_MARKER) {
        sanitized
    } else {
        format!("{DISCLAIMER}{sanitized}")
    }
}
