//! Pipeline error taxonomy
//!
//! Only configuration problems escape as errors; every transport, quota, and
//! parse failure degrades to a value-level result instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Gemini API key not configured; set GEMINI_API_KEY in the environment or a .env file")]
    MissingApiKey,
}
