//! Pipeline orchestration
//!
//! One "analyze" invocation runs selection, cache lookup, batched requests,
//! reconciliation, and cache write-back, then an aggregate pass over the same
//! selected set. Batches and passes are strictly sequential; only one request
//! to the AI endpoint is ever in flight.

use std::sync::Arc;

use pulse_core::{
    CacheBackend, CacheEntry, CacheStore, OverallAnalysis, Post, PostAnalysis,
    overall_fingerprint, post_fingerprint,
};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::prompt::{overall_analysis_prompt, post_analysis_prompt};
use crate::reconcile::{reconcile_overall, reconcile_post_batch};
use crate::select::select_posts;
use crate::transport::{
    AiEndpoint, CallOutcome, GeminiEndpoint, GenerationParams, RetryingTransport, Sleeper,
    TokioSleeper,
};

pub const POST_CACHE_NAMESPACE: &str = "post_analyses";
pub const OVERALL_CACHE_NAMESPACE: &str = "overall_analysis";

/// Called after each completed batch with (analyses so far, total selected).
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Output of a full pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub post_analyses: Vec<PostAnalysis>,
    pub overall: OverallAnalysis,
}

pub struct AnalysisPipeline {
    config: AnalysisConfig,
    post_cache: CacheStore<PostAnalysis>,
    overall_cache: CacheStore<OverallAnalysis>,
    transport: Option<RetryingTransport>,
    sleeper: Arc<dyn Sleeper>,
    progress: Option<Box<ProgressFn>>,
}

impl AnalysisPipeline {
    /// Production constructor: a Gemini endpoint when a credential is
    /// configured, no transport otherwise (invocations then fail with
    /// [`AnalysisError::MissingApiKey`]).
    pub fn new(config: AnalysisConfig, backend: Arc<dyn CacheBackend>) -> Self {
        let endpoint: Option<Arc<dyn AiEndpoint>> = config.api_key.as_ref().map(|key| {
            Arc::new(GeminiEndpoint::new(key.clone(), config.model.clone())) as Arc<dyn AiEndpoint>
        });
        Self::build(config, backend, endpoint, Arc::new(TokioSleeper))
    }

    /// Constructor with an injected endpoint and sleep clock, for tests and
    /// alternative backends.
    pub fn with_endpoint(
        config: AnalysisConfig,
        backend: Arc<dyn CacheBackend>,
        endpoint: Arc<dyn AiEndpoint>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self::build(config, backend, Some(endpoint), sleeper)
    }

    fn build(
        config: AnalysisConfig,
        backend: Arc<dyn CacheBackend>,
        endpoint: Option<Arc<dyn AiEndpoint>>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let post_cache = CacheStore::open(Arc::clone(&backend), POST_CACHE_NAMESPACE);
        let overall_cache = CacheStore::open(backend, OVERALL_CACHE_NAMESPACE);
        let transport = endpoint.map(|endpoint| {
            RetryingTransport::new(
                endpoint,
                Arc::clone(&sleeper),
                config.max_retries,
                config.backoff_unit,
            )
        });
        Self {
            config,
            post_cache,
            overall_cache,
            transport,
            sleeper,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Per-post pass: cached analyses are reused while their fingerprints
    /// match; the rest go to the endpoint in sequential batches. A failed
    /// batch is skipped; quota exhaustion stops the remaining batches but
    /// keeps everything accumulated so far.
    pub async fn analyze_posts(&mut self, posts: &[Post]) -> Result<Vec<PostAnalysis>, AnalysisError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let transport = self.transport.as_ref().ok_or(AnalysisError::MissingApiKey)?;

        let selected = select_posts(posts, self.config.max_posts, self.config.truncate_chars);
        let total = selected.len();

        let mut merged = Vec::new();
        let mut pending = Vec::new();
        for post in selected {
            let fingerprint = post_fingerprint(&post, self.config.truncate_chars);
            match self.post_cache.lookup(&post.id, &fingerprint) {
                Some(analysis) => merged.push(analysis.clone()),
                None => pending.push(post),
            }
        }

        if pending.is_empty() {
            tracing::debug!("all {} selected posts served from cache", total);
            return Ok(merged);
        }
        tracing::info!("{} cached, {} posts to analyze", merged.len(), pending.len());

        for batch in pending.chunks(self.config.batch_size.max(1)) {
            let prompt = post_analysis_prompt(batch);
            match transport.request(&prompt, &GenerationParams::per_post()).await {
                CallOutcome::Success(raw) => match reconcile_post_batch(&raw, batch) {
                    Some(fresh) => {
                        for analysis in fresh {
                            // the reconciler guarantees a matching source post
                            if let Some(source) = batch.iter().find(|post| post.id == analysis.post_id) {
                                let fingerprint =
                                    post_fingerprint(source, self.config.truncate_chars);
                                self.post_cache.put(
                                    source.id.clone(),
                                    CacheEntry {
                                        fingerprint,
                                        value: analysis.clone(),
                                    },
                                );
                            }
                            merged.push(analysis);
                        }
                    }
                    None => {
                        tracing::warn!("unparseable batch response; keeping cached results only");
                    }
                },
                CallOutcome::QuotaExhausted => {
                    tracing::error!("quota exhausted; skipping the remaining batches");
                    self.report_progress(merged.len(), total);
                    break;
                }
                CallOutcome::Failed => {
                    tracing::warn!("batch failed after retries; continuing with the next batch");
                }
            }
            self.report_progress(merged.len(), total);
        }

        Ok(merged)
    }

    /// Aggregate pass over the selected set plus the per-post scores, cached
    /// by a fingerprint over both. Terminal failures come back as placeholder
    /// values with a descriptive summary, never as errors.
    pub async fn overall_analysis(
        &mut self,
        posts: &[Post],
        analyses: &[PostAnalysis],
    ) -> Result<OverallAnalysis, AnalysisError> {
        if posts.is_empty() {
            return Ok(OverallAnalysis::placeholder("No posts available for analysis", 0));
        }
        let transport = self.transport.as_ref().ok_or(AnalysisError::MissingApiKey)?;

        let selected = select_posts(posts, self.config.max_posts, self.config.truncate_chars);
        let key = overall_fingerprint(&selected, analyses);
        if let Some(cached) = self.overall_cache.lookup(&key, &key) {
            tracing::debug!("overall analysis served from cache");
            return Ok(cached.clone());
        }

        let prompt = overall_analysis_prompt(&selected, analyses);
        match transport.request(&prompt, &GenerationParams::aggregate()).await {
            CallOutcome::Success(raw) => match reconcile_overall(&raw) {
                Some(result) => {
                    self.overall_cache.put(
                        key.clone(),
                        CacheEntry {
                            fingerprint: key,
                            value: result.clone(),
                        },
                    );
                    Ok(result)
                }
                None => Ok(OverallAnalysis::placeholder("Analysis completed", 50)),
            },
            CallOutcome::QuotaExhausted => Ok(OverallAnalysis::placeholder(
                "API quota exceeded. Please try again tomorrow or use a different API key.",
                0,
            )),
            CallOutcome::Failed => {
                Ok(OverallAnalysis::placeholder("Analysis failed after all retries", 0))
            }
        }
    }

    /// Full run: per-post pass, a fixed pause to respect the upstream rate
    /// limit, then the aggregate pass.
    pub async fn run(&mut self, posts: &[Post]) -> Result<AnalysisReport, AnalysisError> {
        let post_analyses = self.analyze_posts(posts).await?;
        if !posts.is_empty() {
            self.sleeper.sleep(self.config.pass_delay).await;
        }
        let overall = self.overall_analysis(posts, &post_analyses).await?;
        Ok(AnalysisReport {
            post_analyses,
            overall,
        })
    }

    fn report_progress(&self, analyzed: usize, total: usize) {
        if let Some(progress) = &self.progress {
            progress(analyzed, total);
        }
    }
}
