//! `hlsarc status <task>`: per-category counts of a task.

use anyhow::{bail, Result};
use hlsarc_core::config::ArchiveConfig;
use hlsarc_core::session::TaskDir;

pub fn run_status(cfg: &ArchiveConfig, task_name: &str) -> Result<()> {
    let task = TaskDir::new(&cfg.save_root, task_name)?;
    if let Some(args) = task.load_launch_args()? {
        println!("{}  {}", task.name(), args.m3u8_url);
    }
    let Some(names) = task.load_cache_table()? else {
        bail!("task {} has no cache table yet", task.name());
    };

    println!("{:<10} {:>10} {:>10}", "CATEGORY", "REGISTERED", "PRESENT");
    for s in task.status(&names)? {
        println!("{:<10} {:>10} {:>10}", s.category, s.registered, s.present);
    }
    Ok(())
}
