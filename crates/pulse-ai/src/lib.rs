//! AI marketing-insight pipeline for Pulse
//!
//! Turns a batch of social post records into per-post and aggregate marketing
//! analyses via a generative-AI endpoint, with content-addressed caching,
//! bounded retry/backoff, and fail-soft response reconciliation.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod reconcile;
pub mod select;
pub mod suggest;
pub mod transport;


pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use pipeline::{AnalysisPipeline, AnalysisReport};
pub use select::select_posts;
pub use suggest::{Priority, Suggestion, heuristic_suggestions};
pub use transport::{AiEndpoint, CallOutcome, GeminiEndpoint, RetryingTransport};
