//! Cache name assignment.
//!
//! Two phases: a [`CacheRegistry`] collects every absolute URL seen during
//! discovery, then [`CacheRegistry::freeze`] turns it into [`CacheNames`],
//! the read-only table that renders local names and drives downloads.

mod entry;
mod names;
mod persist;
mod registry;

pub use entry::{
    category_for_reference, category_for_tag, category_for_url, digit_width, is_valid_category,
    CacheEntry, MANIFEST_CATEGORY,
};
pub use names::CacheNames;
pub use persist::PersistedCacheTable;
pub use registry::CacheRegistry;
