//! Persist the frozen cache table as JSON so a resumed task reproduces the same names.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::entry::{is_valid_category, CacheEntry};
use super::names::CacheNames;
use crate::storage::write_atomic;

const TABLE_VERSION: u32 = 1;

/// On-disk form: entries in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCacheTable {
    pub version: u32,
    pub entries: Vec<CacheEntry>,
}

impl CacheNames {
    pub fn to_snapshot(&self) -> PersistedCacheTable {
        PersistedCacheTable {
            version: TABLE_VERSION,
            entries: self.entries().to_vec(),
        }
    }

    /// Rebuild a snapshot. Entries must be in registration order: sources are
    /// unique and each category's indices run 0, 1, 2, ... without gaps.
    pub fn from_snapshot(table: PersistedCacheTable) -> Result<CacheNames> {
        if table.version != TABLE_VERSION {
            bail!("unsupported cache table version {}", table.version);
        }
        let mut by_source = HashMap::with_capacity(table.entries.len());
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for (pos, entry) in table.entries.iter().enumerate() {
            if !is_valid_category(&entry.category) {
                bail!(
                    "cache entry for {} has invalid category {:?}",
                    entry.source,
                    entry.category
                );
            }
            if by_source.insert(entry.source.clone(), pos).is_some() {
                bail!("duplicate cache entry for {}", entry.source);
            }
            let next = counts.entry(entry.category.clone()).or_insert(0);
            if entry.index != *next {
                bail!(
                    "cache entry for {} has index {} in category {}, expected {}",
                    entry.source,
                    entry.index,
                    entry.category,
                    next
                );
            }
            *next += 1;
        }
        Ok(CacheNames::from_parts(table.entries, by_source, counts))
    }

    /// Write the table to `path` atomically (creates the parent dir if needed).
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.to_snapshot()).context("serialize cache table")?;
        write_atomic(path, json.as_bytes())
            .with_context(|| format!("write cache table: {}", path.display()))?;
        Ok(())
    }

    /// Load a table saved by [`CacheNames::save_to_path`]. A missing file is `Ok(None)`.
    pub fn load_from_path(path: &Path) -> Result<Option<CacheNames>> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("read cache table: {}", path.display())),
        };
        let table: PersistedCacheTable = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse cache table: {}", path.display()))?;
        let names = CacheNames::from_snapshot(table)
            .with_context(|| format!("invalid cache table: {}", path.display()))?;
        Ok(Some(names))
    }
}
