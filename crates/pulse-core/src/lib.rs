//! Pulse Core — post data model, stable fingerprints, and the analysis cache

pub mod cache;
pub mod fingerprint;
pub mod model;

#[cfg(test)]
mod tests;

pub use cache::{CACHE_DIR, CacheBackend, CacheEntry, CacheStore, DiskBackend, MemoryBackend};
pub use fingerprint::{overall_fingerprint, post_fingerprint, stable_hash};
pub use model::{OverallAnalysis, Post, PostAnalysis};
