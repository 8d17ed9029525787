//! Resource phase shared by `fetch` and `resume`: worker pool, progress line, Ctrl-C.

use anyhow::{bail, Context, Result};
use hlsarc_core::cache::CacheNames;
use hlsarc_core::config::ArchiveConfig;
use hlsarc_core::control::AbortRegistry;
use hlsarc_core::downloader::{download_resources, DownloadProgress, DownloadReport};
use hlsarc_core::fetch::{parse_header_file, CurlFetcher, FetchOptions};
use hlsarc_core::session::TaskDir;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

const PROGRESS_INTERVAL_MS: u128 = 500;

/// Curl fetcher carrying the headers of the configured header file, if any.
pub fn build_fetcher(cfg: &ArchiveConfig) -> Result<CurlFetcher> {
    let headers = match &cfg.header_file {
        Some(path) => parse_header_file(path)?,
        None => Vec::new(),
    };
    Ok(CurlFetcher::new(headers))
}

pub async fn run_download(
    cfg: &ArchiveConfig,
    task: &TaskDir,
    names: CacheNames,
    fetcher: CurlFetcher,
    jobs: Option<usize>,
) -> Result<DownloadReport> {
    let aborts = Arc::new(AbortRegistry::new());
    let signal_aborts = Arc::clone(&aborts);
    let signal_handle = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, aborting transfers");
            eprintln!("\ninterrupted, stopping downloads...");
            signal_aborts.abort_all();
        }
    });

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<DownloadProgress>(64);
    let progress_handle = tokio::spawn(async move {
        let mut last_print = Instant::now();
        let mut printed = false;
        while let Some(p) = progress_rx.recv().await {
            let now = Instant::now();
            if now.duration_since(last_print).as_millis() >= PROGRESS_INTERVAL_MS
                || p.done >= p.total
            {
                print!(
                    "\r  {}/{} resources ({:.1}%)  {:.1} MiB  {} failed  ",
                    p.done,
                    p.total,
                    p.fraction() * 100.0,
                    p.bytes as f64 / 1_048_576.0,
                    p.failed
                );
                let _ = std::io::stdout().flush();
                last_print = now;
                printed = true;
            }
        }
        if printed {
            println!();
        }
    });

    let workers = jobs.unwrap_or(cfg.workers);
    let options = FetchOptions::resource(cfg);
    let root = task.root().to_path_buf();
    let worker_aborts = Arc::clone(&aborts);
    let report = tokio::task::spawn_blocking(move || {
        download_resources(
            &root,
            &names,
            &fetcher,
            &options,
            workers,
            &worker_aborts,
            Some(&progress_tx),
        )
    })
    .await
    .context("download worker panicked")??;

    signal_handle.abort();
    let _ = progress_handle.await;

    println!(
        "{} downloaded, {} already present, {} failed",
        report.completed,
        report.skipped,
        report.failed.len()
    );
    for failure in &report.failed {
        println!("  {}  {}", failure.name, failure.error);
    }
    if aborts.is_shutdown() {
        bail!("interrupted; run `hlsarc resume {}` to continue", task.name());
    }
    if !report.is_complete() {
        bail!(
            "{} resource(s) failed; run `hlsarc resume {}` to retry",
            report.failed.len(),
            task.name()
        );
    }
    Ok(report)
}
