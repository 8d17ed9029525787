//! Mutable registration table used during the discovery walk.

use std::collections::{BTreeMap, HashMap};

use url::Url;

use super::entry::{category_for_reference, is_valid_category, CacheEntry};
use super::names::CacheNames;
use crate::error::RegisterError;
use crate::m3u8::TagKind;

/// Builder side of the cache table. Names are not available here; call
/// [`CacheRegistry::freeze`] once every registration is done.
#[derive(Debug, Default)]
pub struct CacheRegistry {
    entries: Vec<CacheEntry>,
    by_source: HashMap<String, usize>,
    counters: BTreeMap<String, usize>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue registering on top of a finished table. Existing sources keep
    /// their entries; new sources get the next free index of their category.
    pub fn from_names(names: CacheNames) -> Self {
        let (entries, by_source, counters) = names.into_parts();
        Self {
            entries,
            by_source,
            counters,
        }
    }

    /// Register `source` under `category`. A source that is already known
    /// returns its first entry unchanged and no counter advances.
    pub fn register(&mut self, source: &str, category: &str) -> Result<CacheEntry, RegisterError> {
        if let Some(&pos) = self.by_source.get(source) {
            return Ok(self.entries[pos].clone());
        }
        if category.is_empty() {
            return Err(RegisterError::EmptyCategory {
                url: source.to_string(),
            });
        }
        if !is_valid_category(category) {
            return Err(RegisterError::InvalidCategory {
                category: category.to_string(),
                url: source.to_string(),
            });
        }
        let counter = self.counters.entry(category.to_string()).or_insert(0);
        let entry = CacheEntry {
            index: *counter,
            category: category.to_string(),
            source: source.to_string(),
        };
        *counter += 1;
        tracing::debug!(
            source,
            category,
            index = entry.index,
            "registered cache entry"
        );
        self.by_source.insert(source.to_string(), self.entries.len());
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Register an absolute URL under the category derived from its path.
    pub fn register_url(&mut self, url: &Url) -> Result<CacheEntry, RegisterError> {
        self.register_reference(url, None)
    }

    /// Register a URL found on a manifest line; `tag` is the kind of the tag
    /// carrying it, `None` for a plain URI line.
    pub fn register_reference(
        &mut self,
        url: &Url,
        tag: Option<TagKind>,
    ) -> Result<CacheEntry, RegisterError> {
        if let Some(&pos) = self.by_source.get(url.as_str()) {
            return Ok(self.entries[pos].clone());
        }
        let category = category_for_reference(url, tag)?;
        self.register(url.as_str(), &category)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.by_source.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// End the registration phase. The returned snapshot is read-only.
    pub fn freeze(self) -> CacheNames {
        CacheNames::from_parts(self.entries, self.by_source, self.counters)
    }
}
