//! Static table of known test definitions that drives extraction.
//!
//! The builtin table covers the complete-blood-count (CBC) panel. Other
//! panels are loaded as data (JSON), not code — see [`Lexicon::from_json_str`].

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::enums::ValueStatus;

/// The clinically normal [min, max] interval for a test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub min: f64,
    pub max: f64,
}

impl ReferenceRange {
    /// Classify a value against this range. Boundary values are normal.
    pub fn classify(&self, value: f64) -> ValueStatus {
        if value < self.min {
            ValueStatus::Low
        } else if value > self.max {
            ValueStatus::High
        } else {
            ValueStatus::Normal
        }
    }
}

/// One known test: canonical name, lowercase keyword aliases, unit and
/// reference range. Immutable after the lexicon is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDefinition {
    pub canonical_name: String,
    pub keywords: Vec<String>,
    pub unit: String,
    pub reference_range: ReferenceRange,
}

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error reading lexicon: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid reference range for {test}: min {min} > max {max}")]
    InvalidRange { test: String, min: f64, max: f64 },

    #[error("Duplicate test definition: {0}")]
    DuplicateTest(String),

    #[error("Test definition {0} has no keywords")]
    NoKeywords(String),
}

/// The set of test definitions known to the extractor.
#[derive(Debug, Clone)]
pub struct Lexicon {
    definitions: Vec<TestDefinition>,
}

impl Lexicon {
    /// The five CBC tests the original scanner vocabulary covers.
    pub fn builtin_cbc() -> Self {
        let defs = vec![
            def("Hemoglobin", &["hemoglobin", "hb"], "g/dL", 13.0, 17.0),
            def("RBC Count", &["total rbc", "rbc count"], "mill/cumm", 4.5, 5.5),
            def("Packed Cell Volume", &["packed cell volume", "pcv"], "%", 40.0, 50.0),
            def("MCV", &["mean corpuscular volume", "mcv"], "fL", 83.0, 101.0),
            def("Platelet Count", &["platelet count"], "cells/cumm", 150_000.0, 410_000.0),
        ];
        Self::from_definitions(defs).expect("builtin CBC lexicon is valid")
    }

    /// Build a lexicon from definitions, lowercasing keywords and
    /// validating ranges and uniqueness.
    pub fn from_definitions(definitions: Vec<TestDefinition>) -> Result<Self, LexiconError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(definitions.len());

        for mut definition in definitions {
            if definition.reference_range.min > definition.reference_range.max {
                return Err(LexiconError::InvalidRange {
                    test: definition.canonical_name,
                    min: definition.reference_range.min,
                    max: definition.reference_range.max,
                });
            }
            if definition.keywords.is_empty() {
                return Err(LexiconError::NoKeywords(definition.canonical_name));
            }
            if !seen.insert(definition.canonical_name.clone()) {
                return Err(LexiconError::DuplicateTest(definition.canonical_name));
            }
            for keyword in &mut definition.keywords {
                *keyword = keyword.to_lowercase();
            }
            normalized.push(definition);
        }

        Ok(Self { definitions: normalized })
    }

    /// Load an alternative panel from JSON (an array of definitions).
    pub fn from_json_str(json: &str) -> Result<Self, LexiconError> {
        let definitions: Vec<TestDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
    }

    /// Load an alternative panel from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn definitions(&self) -> &[TestDefinition] {
        &self.definitions
    }

    pub fn get(&self, canonical_name: &str) -> Option<&TestDefinition> {
        self.definitions
            .iter()
            .find(|d| d.canonical_name == canonical_name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn def(name: &str, keywords: &[&str], unit: &str, min: f64, max: f64) -> TestDefinition {
    TestDefinition {
        canonical_name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        unit: unit.to_string(),
        reference_range: ReferenceRange { min, max },
    }
}
