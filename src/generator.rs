//! Seam for the external explanation generator, plus the educator
//! prompt it is fed. The backend is opaque and unreliable; the analyzer
//! converts failures to absent text and routes everything through the
//! safety filter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::enums::TrendDirection;
use crate::models::{Insight, Observation};

/// What the caller knows about the subject, for phrasing only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectContext {
    pub age: Option<u32>,
    pub gender: Option<String>,
}

/// One test's recent movement, phrased for the prompt and the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendDescription {
    pub test_name: String,
    pub description: String,
    /// Magnitude of the latest step, in percent.
    pub percent_change: f64,
    pub direction: TrendDirection,
}

/// Structured context handed to the generator.
#[derive(Debug, Clone, Serialize)]
pub struct ExplanationRequest {
    pub observations: Vec<Observation>,
    pub trends: Vec<TrendDescription>,
    pub insights: Vec<Insight>,
    pub subject: SubjectContext,
}

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Generation backend unavailable: {0}")]
    Unavailable(String),

    #[error("Generation failed: {0}")]
    Failed(String),
}

/// Opaque text generation capability, implemented by the surrounding
/// system (and by mocks in tests).
pub trait ExplanationGenerator {
    fn generate(&self, request: &ExplanationRequest) -> Result<String, GeneratorError>;
}

/// Build the medical-educator prompt from the structured context.
/// Implementors of [`ExplanationGenerator`] are expected to feed this
/// (or a derivative) to their model.
pub fn build_explanation_prompt(request: &ExplanationRequest) -> String {
    let observations = serde_json::to_string_pretty(&request.observations)
        .unwrap_or_else(|_| "[]".to_string());
    let trends = serde_json::to_string_pretty(&request.trends)
        .unwrap_or_else(|_| "[]".to_string());
    let insights = serde_json::to_string_pretty(&request.insights)
        .unwrap_or_else(|_| "[]".to_string());
    let age = request
        .subject
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "Not provided".to_string());
    let gender = request
        .subject
        .gender
        .clone()
        .unwrap_or_else(|| "Not provided".to_string());

    format!(
        "You are a medical educator explaining lab results to a patient. Use the following:\n\
         \n\
         STRUCTURED LAB DATA:\n{observations}\n\
         \n\
         TREND ANALYSIS:\n{trends}\n\
         \n\
         INSIGHTS:\n{insights}\n\
         \n\
         USER CONTEXT:\n\
         Age: {age}, Gender: {gender}\n\
         \n\
         INSTRUCTIONS:\n\
         1. Explain what each test measures in simple terms\n\
         2. Interpret the value relative to the reference range\n\
         3. Highlight trends (improving, worsening, stable)\n\
         4. Identify significant changes from personal baseline\n\
         5. Suggest questions to ask the doctor (not advice)\n\
         6. Use analogies where helpful\n\
         \n\
         NEVER:\n\
         - Diagnose conditions\n\
         - Recommend treatments or medications\n\
         - Say \"you have [disease]\"\n\
         - Give urgent medical advice\n\
         \n\
         ALWAYS:\n\
         - Use plain language\n\
         - Acknowledge uncertainty\n\
         - Remind to consult doctor for medical decisions\n\
         \n\
         Generate a clear, educational explanation of these lab results.\n"
    )
}
