//! Archive session: discovery walk, task directory and resume.

mod discover;
mod select;
mod task;

use anyhow::{bail, Context, Result};
use url::Url;

use crate::cache::{CacheNames, CacheRegistry};
use crate::fetch::{FetchOptions, Fetcher};

pub use discover::{discover, discover_into, Discovery};
pub use select::{IndexSelector, VariantSelector};
pub use task::{sanitize_task_name, CategoryStatus, LaunchArgs, TaskDir};

/// Record the launch, walk the manifests, then persist the cache table and
/// the rendered manifests into `task`. A cache table already saved in the
/// task is extended rather than replaced: every URL it holds keeps its name,
/// so files downloaded under those names stay valid.
pub fn prepare_task(
    task: &TaskDir,
    start: &Url,
    fetcher: &dyn Fetcher,
    selector: &mut dyn VariantSelector,
    options: &FetchOptions,
) -> Result<Discovery> {
    task.save_launch_args(&LaunchArgs {
        task_name: task.name().to_string(),
        m3u8_url: start.to_string(),
    })?;
    let registry = match task.load_cache_table()? {
        Some(names) => {
            tracing::info!(task = task.name(), entries = names.len(), "extending saved cache table");
            CacheRegistry::from_names(names)
        }
        None => CacheRegistry::new(),
    };
    let discovery = discover_into(registry, start, fetcher, selector, options)?;
    task.save_cache_table(&discovery.names)?;
    let written = task.write_playlists(&discovery)?;
    tracing::info!(
        task = task.name(),
        entries = discovery.names.len(),
        manifests = written.len() / 3,
        "task prepared"
    );
    Ok(discovery)
}

/// Cache table of an existing task. Uses the persisted table when there is
/// one, otherwise walks again from the recorded start URL.
pub fn resume_task(
    task: &TaskDir,
    fetcher: &dyn Fetcher,
    selector: &mut dyn VariantSelector,
    options: &FetchOptions,
) -> Result<CacheNames> {
    if let Some(names) = task.load_cache_table()? {
        tracing::info!(task = task.name(), entries = names.len(), "resuming from cache table");
        return Ok(names);
    }
    let Some(args) = task.load_launch_args()? else {
        bail!("task {} has no launch record in {}", task.name(), task.root().display());
    };
    let start = Url::parse(&args.m3u8_url)
        .with_context(|| format!("invalid start URL in launch record: {}", args.m3u8_url))?;
    tracing::info!(task = task.name(), url = %start, "no cache table, discovering again");
    Ok(prepare_task(task, &start, fetcher, selector, options)?.names)
}
