//! Frozen, read-only cache table: the only place local names come from.

use std::collections::{BTreeMap, HashMap};

use super::entry::{digit_width, CacheEntry, MANIFEST_CATEGORY};
use crate::error::LookupError;

/// Immutable snapshot of a finished registration pass. Per-category counts
/// are final, so padding widths are stable for every `name()` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheNames {
    entries: Vec<CacheEntry>,
    by_source: HashMap<String, usize>,
    counts: BTreeMap<String, usize>,
}

impl CacheNames {
    pub(super) fn from_parts(
        entries: Vec<CacheEntry>,
        by_source: HashMap<String, usize>,
        counts: BTreeMap<String, usize>,
    ) -> Self {
        Self {
            entries,
            by_source,
            counts,
        }
    }

    pub(super) fn into_parts(
        self,
    ) -> (
        Vec<CacheEntry>,
        HashMap<String, usize>,
        BTreeMap<String, usize>,
    ) {
        (self.entries, self.by_source, self.counts)
    }

    pub fn entry(&self, source: &str) -> Result<&CacheEntry, LookupError> {
        self.by_source
            .get(source)
            .map(|&pos| &self.entries[pos])
            .ok_or_else(|| LookupError::Unregistered {
                url: source.to_string(),
            })
    }

    /// Local path of `source` relative to the task root.
    pub fn name(&self, source: &str) -> Result<String, LookupError> {
        let entry = self.entry(source)?;
        Ok(entry.file_name(self.width(&entry.category)))
    }

    /// Padded index of a registered manifest, used to name its output files.
    pub fn manifest_stem(&self, source: &str) -> Result<String, LookupError> {
        let entry = self.entry(source)?;
        Ok(entry.padded_index(self.width(&entry.category)))
    }

    /// Number of entries registered in `category`.
    pub fn count(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    /// Digit width used for indices of `category`.
    pub fn width(&self, category: &str) -> usize {
        digit_width(self.count(category))
    }

    /// All entries in registration order.
    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn entries_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a CacheEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// Entries that are downloaded as resources (everything but manifests).
    pub fn resources(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.iter().filter(|e| !e.is_manifest())
    }

    /// Categories with their counts, sorted by name.
    pub fn categories(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(c, n)| (c.as_str(), *n))
    }

    pub fn manifest_count(&self) -> usize {
        self.count(MANIFEST_CATEGORY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::super::CacheRegistry;
    use super::*;

    #[test]
    fn eleven_entries_pad_to_two_digits() {
        let mut reg = CacheRegistry::new();
        for i in 0..11 {
            reg.register(&format!("https://h/s{i}.ts"), "ts").unwrap();
        }
        let names = reg.freeze();
        assert_eq!(names.width("ts"), 2);
        assert_eq!(names.name("https://h/s0.ts").unwrap(), "ts/00.ts");
        assert_eq!(names.name("https://h/s9.ts").unwrap(), "ts/09.ts");
        assert_eq!(names.name("https://h/s10.ts").unwrap(), "ts/10.ts");
    }

    #[test]
    fn ten_entries_still_pad_to_two_digits() {
        let mut reg = CacheRegistry::new();
        for i in 0..10 {
            reg.register(&format!("https://h/s{i}.ts"), "ts").unwrap();
        }
        let names = reg.freeze();
        assert_eq!(names.name("https://h/s0.ts").unwrap(), "ts/00.ts");
    }

    #[test]
    fn width_is_per_category() {
        let mut reg = CacheRegistry::new();
        for i in 0..12 {
            reg.register(&format!("https://h/s{i}.ts"), "ts").unwrap();
        }
        reg.register("https://h/k.key", "key").unwrap();
        let names = reg.freeze();
        assert_eq!(names.name("https://h/k.key").unwrap(), "key/0.key");
        assert_eq!(names.name("https://h/s3.ts").unwrap(), "ts/03.ts");
    }

    #[test]
    fn manifest_names_use_local_suffix() {
        let mut reg = CacheRegistry::new();
        reg.register("https://h/master.m3u8", MANIFEST_CATEGORY).unwrap();
        reg.register("https://h/v1.m3u8", MANIFEST_CATEGORY).unwrap();
        let names = reg.freeze();
        assert_eq!(names.name("https://h/v1.m3u8").unwrap(), "m3u8/1.local.m3u8");
        assert_eq!(names.manifest_stem("https://h/v1.m3u8").unwrap(), "1");
        assert_eq!(names.manifest_count(), 2);
        assert_eq!(names.resources().count(), 0);
    }

    #[test]
    fn unregistered_lookup_fails() {
        let names = CacheRegistry::new().freeze();
        assert_eq!(
            names.name("https://h/x.ts"),
            Err(LookupError::Unregistered {
                url: "https://h/x.ts".to_string()
            })
        );
        assert!(names.is_empty());
    }
}
