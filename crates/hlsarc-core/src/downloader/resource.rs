//! One resource: skip if present, else fetch with retry and write atomically.

use anyhow::{Context, Result};
use std::path::Path;
use url::Url;

use crate::cache::CacheEntry;
use crate::control::AbortRegistry;
use crate::fetch::{fetch_with_retry, FetchOptions, Fetcher};
use crate::storage::StorageWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Outcome {
    /// Downloaded and renamed into place; bytes written.
    Completed(u64),
    /// Final file already present.
    Skipped,
}

pub(super) fn download_one(
    task_root: &Path,
    name: &str,
    entry: &CacheEntry,
    fetcher: &dyn Fetcher,
    options: &FetchOptions,
    aborts: &AbortRegistry,
) -> Result<Outcome> {
    let final_path = task_root.join(name);
    if final_path.exists() {
        tracing::debug!(name, "already present, skipped");
        return Ok(Outcome::Skipped);
    }
    let url = Url::parse(&entry.source).with_context(|| format!("invalid source URL {}", entry.source))?;

    let token = aborts.register(&entry.source);
    let fetched = fetch_with_retry(fetcher, &url, &options.clone().with_abort(token));
    aborts.unregister(&entry.source);
    let body = fetched?;

    let mut writer = StorageWriter::create(&final_path)?;
    writer.write_all(&body)?;
    writer.sync()?;
    writer.finalize()?;
    tracing::debug!(name, bytes = body.len(), "resource stored");
    Ok(Outcome::Completed(body.len() as u64))
}
