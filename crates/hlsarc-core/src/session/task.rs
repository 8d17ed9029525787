//! Task directory layout under the save root.
//!
//! ```text
//! <save_root>/<task>/
//!   launch_args.json   task name and start URL
//!   cache.json         persisted cache table
//!   m3u8/              <idx>.original|absolute|local.m3u8 per manifest
//!   <category>/        downloaded resources, e.g. ts/07.ts
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::discover::Discovery;
use crate::cache::{CacheNames, MANIFEST_CATEGORY};
use crate::render::render_all;
use crate::storage::write_atomic;

const LAUNCH_ARGS_FILE: &str = "launch_args.json";
const CACHE_TABLE_FILE: &str = "cache.json";

/// Arguments a task was started with, kept so it can be resumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchArgs {
    pub task_name: String,
    pub m3u8_url: String,
}

/// Registered and on-disk counts for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStatus {
    pub category: String,
    pub registered: usize,
    pub present: usize,
}

/// Makes a task name safe to use as one directory name.
///
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
/// - Limits length to 255 bytes (Linux NAME_MAX)
pub fn sanitize_task_name(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for c in name.chars() {
        let c = if c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
            '_'
        } else {
            c
        };
        if c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut take = trimmed.len().min(NAME_MAX);
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDir {
    name: String,
    root: PathBuf,
}

impl TaskDir {
    /// Task `task_name` under `save_root`. Nothing is created yet.
    pub fn new(save_root: &Path, task_name: &str) -> Result<Self> {
        let name = sanitize_task_name(task_name);
        if name.is_empty() {
            bail!("task name {:?} is empty after sanitizing", task_name);
        }
        if name != task_name {
            tracing::info!(requested = task_name, used = %name, "task name sanitized");
        }
        Ok(Self {
            root: save_root.join(&name),
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_dir(&self) -> PathBuf {
        self.root.join(MANIFEST_CATEGORY)
    }

    pub fn launch_args_path(&self) -> PathBuf {
        self.root.join(LAUNCH_ARGS_FILE)
    }

    pub fn cache_table_path(&self) -> PathBuf {
        self.root.join(CACHE_TABLE_FILE)
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    pub fn create(&self) -> Result<()> {
        let dir = self.manifest_dir();
        std::fs::create_dir_all(&dir).with_context(|| format!("create dir: {}", dir.display()))?;
        Ok(())
    }

    pub fn save_launch_args(&self, args: &LaunchArgs) -> Result<()> {
        self.create()?;
        let path = self.launch_args_path();
        let json = serde_json::to_string_pretty(args).context("serialize launch args")?;
        write_atomic(&path, json.as_bytes())
            .with_context(|| format!("write launch args: {}", path.display()))
    }

    /// `Ok(None)` when the task was never launched.
    pub fn load_launch_args(&self) -> Result<Option<LaunchArgs>> {
        let path = self.launch_args_path();
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("read launch args: {}", path.display())),
        };
        let args = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse launch args: {}", path.display()))?;
        Ok(Some(args))
    }

    pub fn save_cache_table(&self, names: &CacheNames) -> Result<()> {
        names.save_to_path(&self.cache_table_path())
    }

    pub fn load_cache_table(&self) -> Result<Option<CacheNames>> {
        CacheNames::load_from_path(&self.cache_table_path())
    }

    /// Render every discovered manifest into `m3u8/`. Returns the written paths.
    pub fn write_playlists(&self, discovery: &Discovery) -> Result<Vec<PathBuf>> {
        self.create()?;
        let dir = self.manifest_dir();
        let mut written = Vec::new();
        for playlist in &discovery.playlists {
            let rendered = render_all(playlist, &discovery.names)
                .with_context(|| format!("render manifest {}", playlist.url()))?;
            for (file, contents) in rendered.files() {
                let path = dir.join(file);
                write_atomic(&path, contents.as_bytes())
                    .with_context(|| format!("write manifest: {}", path.display()))?;
                written.push(path);
            }
            tracing::debug!(url = %playlist.url(), stem = %rendered.stem, "manifest rendered");
        }
        Ok(written)
    }

    /// Per-category counts of registered entries and files present under their cache names.
    pub fn status(&self, names: &CacheNames) -> Result<Vec<CategoryStatus>> {
        names
            .categories()
            .map(|(category, registered)| -> Result<CategoryStatus> {
                let mut present = 0;
                for entry in names.entries_in(category) {
                    if self.root.join(names.name(&entry.source)?).is_file() {
                        present += 1;
                    }
                }
                Ok(CategoryStatus {
                    category: category.to_string(),
                    registered,
                    present,
                })
            })
            .collect()
    }
}
