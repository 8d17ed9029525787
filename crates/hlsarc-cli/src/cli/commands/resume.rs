//! `hlsarc resume <task>`: download whatever an earlier run left missing.

use anyhow::{bail, Context, Result};
use hlsarc_core::config::ArchiveConfig;
use hlsarc_core::fetch::FetchOptions;
use hlsarc_core::session::{resume_task, TaskDir};

use super::download::{build_fetcher, run_download};
use crate::cli::prompt::PromptSelector;

pub async fn run_resume(cfg: &ArchiveConfig, task_name: &str, jobs: Option<usize>) -> Result<()> {
    let task = TaskDir::new(&cfg.save_root, task_name)?;
    if !task.exists() {
        bail!("no task named {} under {}", task.name(), cfg.save_root.display());
    }
    let fetcher = build_fetcher(cfg)?;
    let options = FetchOptions::manifest(cfg);

    let (task, fetcher, names) = tokio::task::spawn_blocking(move || {
        let mut selector = PromptSelector::stdin();
        let names = resume_task(&task, &fetcher, &mut selector, &options)?;
        anyhow::Ok((task, fetcher, names))
    })
    .await
    .context("resume panicked")??;

    let report = run_download(cfg, &task, names, fetcher, jobs).await?;
    println!("resumed {}: {} resource(s) present", task.name(), report.total());
    Ok(())
}
