//! `hlsarc fetch <url> <task>`: discover, render and download a stream.

use anyhow::{Context, Result};
use hlsarc_core::config::ArchiveConfig;
use hlsarc_core::fetch::FetchOptions;
use hlsarc_core::session::{prepare_task, IndexSelector, TaskDir, VariantSelector};
use url::Url;

use super::download::{build_fetcher, run_download};
use crate::cli::prompt::PromptSelector;

pub async fn run_fetch(
    cfg: &ArchiveConfig,
    url: &str,
    task_name: &str,
    variant: Option<usize>,
    jobs: Option<usize>,
    no_download: bool,
) -> Result<()> {
    let start = Url::parse(url).with_context(|| format!("invalid URL: {url}"))?;
    let task = TaskDir::new(&cfg.save_root, task_name)?;
    if task.exists() {
        tracing::warn!(task = task.name(), "task directory exists, extending its cache table");
    }
    let fetcher = build_fetcher(cfg)?;
    let options = FetchOptions::manifest(cfg);

    let mut selector: Box<dyn VariantSelector + Send> = match variant {
        Some(i) => Box::new(IndexSelector(i)),
        None => Box::new(PromptSelector::stdin()),
    };
    let (task, fetcher, discovery) = tokio::task::spawn_blocking(move || {
        let discovery = prepare_task(&task, &start, &fetcher, selector.as_mut(), &options)?;
        anyhow::Ok((task, fetcher, discovery))
    })
    .await
    .context("discovery panicked")??;

    println!(
        "{}: {} manifest(s), {} resource(s) in {}",
        task.name(),
        discovery.playlists.len(),
        discovery.names.resources().count(),
        task.root().display()
    );
    if no_download {
        return Ok(());
    }
    run_download(cfg, &task, discovery.names, fetcher, jobs).await?;
    println!("archive complete: {}", task.manifest_dir().display());
    Ok(())
}
