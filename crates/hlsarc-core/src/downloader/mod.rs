//! Resource download phase.
//!
//! Runs after discovery over the frozen cache table: a bounded set of scoped
//! worker threads pulls entries from a shared queue, and each resource is
//! fetched and stored independently. A failed resource is recorded in the
//! report and never stops its siblings.

mod progress;
mod resource;

use anyhow::{Context, Result};
use std::collections::{BTreeSet, VecDeque};
use std::path::Path;
use std::sync::{mpsc, Mutex, PoisonError};

use crate::cache::{CacheEntry, CacheNames};
use crate::control::AbortRegistry;
use crate::fetch::{FetchOptions, Fetcher};
use resource::Outcome;

pub use progress::DownloadProgress;

/// A resource that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFailure {
    pub source: String,
    /// Cache name relative to the task root.
    pub name: String,
    pub error: String,
}

/// Summary of a download run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub completed: usize,
    pub skipped: usize,
    pub failed: Vec<ResourceFailure>,
    pub bytes: u64,
}

impl DownloadReport {
    pub fn total(&self) -> usize {
        self.completed + self.skipped + self.failed.len()
    }

    /// True when every resource is now present on disk.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Download every non-manifest entry of `names` into `task_root`.
/// At most `workers` resources are in flight. When `progress_tx` is `Some`,
/// a [`DownloadProgress`] is sent after each finished resource.
pub fn download_resources(
    task_root: &Path,
    names: &CacheNames,
    fetcher: &dyn Fetcher,
    options: &FetchOptions,
    workers: usize,
    aborts: &AbortRegistry,
    progress_tx: Option<&tokio::sync::mpsc::Sender<DownloadProgress>>,
) -> Result<DownloadReport> {
    let mut work: VecDeque<(String, &CacheEntry)> = VecDeque::new();
    for entry in names.resources() {
        work.push_back((names.name(&entry.source)?, entry));
    }
    let mut report = DownloadReport::default();
    if work.is_empty() {
        return Ok(report);
    }

    let categories: BTreeSet<&str> = work.iter().map(|(_, e)| e.category.as_str()).collect();
    for category in categories {
        let dir = task_root.join(category);
        std::fs::create_dir_all(&dir).with_context(|| format!("create dir: {}", dir.display()))?;
    }

    let total = work.len();
    let num_workers = workers.max(1).min(total);
    tracing::info!(total, workers = num_workers, "downloading resources");
    let work = Mutex::new(work);
    let (tx, rx) = mpsc::channel();

    std::thread::scope(|scope| {
        for _ in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            scope.spawn(move || loop {
                let next = work.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
                let Some((name, entry)) = next else {
                    break;
                };
                let res = if aborts.is_shutdown() {
                    Err(anyhow::anyhow!("aborted before start"))
                } else {
                    resource::download_one(task_root, &name, entry, fetcher, options, aborts)
                };
                if tx.send((name, entry, res)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        for (name, entry, res) in rx {
            match res {
                Ok(Outcome::Completed(bytes)) => {
                    report.completed += 1;
                    report.bytes += bytes;
                }
                Ok(Outcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    tracing::warn!(source = %entry.source, name = %name, "resource failed: {:#}", e);
                    report.failed.push(ResourceFailure {
                        source: entry.source.clone(),
                        name: name.clone(),
                        error: format!("{:#}", e),
                    });
                }
            }
            if let Some(ptx) = progress_tx {
                let _ = ptx.try_send(DownloadProgress {
                    done: report.total(),
                    total,
                    bytes: report.bytes,
                    failed: report.failed.len(),
                    last: name,
                });
            }
        }
    });

    tracing::info!(
        completed = report.completed,
        skipped = report.skipped,
        failed = report.failed.len(),
        "resource download finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests;
