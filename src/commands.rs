//! CLI command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use pulse_ai::{AnalysisConfig, AnalysisPipeline, heuristic_suggestions};
use pulse_core::{DiskBackend, Post};

pub async fn analyze(
    input: PathBuf,
    cache_dir: PathBuf,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let posts = load_posts(&input)?;
    tracing::info!("Loaded {} posts from {}", posts.len(), input.display());

    let config = AnalysisConfig::from_env();
    let backend = Arc::new(DiskBackend::new(cache_dir));
    let mut pipeline = AnalysisPipeline::new(config, backend)
        .with_progress(|analyzed, total| tracing::info!("Analyzed {}/{} posts", analyzed, total));

    let report = pipeline.run(&posts).await?;

    let rendered = serde_json::to_string_pretty(&report)?;
    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("cannot write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

pub fn suggest(input: PathBuf) -> anyhow::Result<()> {
    let posts = load_posts(&input)?;
    let suggestions = heuristic_suggestions(&posts);
    println!("{}", serde_json::to_string_pretty(&suggestions)?);
    Ok(())
}

pub fn clear(cache_dir: PathBuf) -> anyhow::Result<()> {
    if cache_dir.exists() {
        std::fs::remove_dir_all(&cache_dir)
            .with_context(|| format!("cannot remove {}", cache_dir.display()))?;
    }
    tracing::info!("Cache cleared");
    Ok(())
}

fn load_posts(input: &Path) -> anyhow::Result<Vec<Post>> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("cannot read {}", input.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid post list", input.display()))
}
