//! Labtrail — the analysis core for scanned lab reports.
//!
//! Three capabilities, composed by an orchestrating caller:
//! - [`extraction`]: raw OCR text → structured test observations,
//!   driven by a pluggable [`lexicon`] of known tests.
//! - [`trends`]: a subject's observation series → trend points,
//!   personal baseline, summary and alerts.
//! - [`safety`]: AI-generated explanation text → sanitized text with
//!   diagnostic/prescriptive language removed and a disclaimer enforced.
//!
//! Persistence and text generation are collaborator seams ([`store`],
//! [`generator`]); [`analyzer`] ties everything together per report.

pub mod analyzer;
pub mod config;
pub mod extraction;
pub mod generator;
pub mod lexicon;
pub mod models;
pub mod safety;
pub mod store;
pub mod trends;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a host binary embedding this crate.
///
/// Respects `RUST_LOG` when set, otherwise falls back to
/// [`config::default_log_filter`]. Call at most once per process.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
