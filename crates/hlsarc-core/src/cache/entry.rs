//! One cache table entry and the category rules.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::RegisterError;
use crate::m3u8::TagKind;
use crate::playlist::targets_manifest;

/// Reserved category for manifest references.
pub const MANIFEST_CATEGORY: &str = "m3u8";

/// Local identity of one remote resource: `index` is dense within `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub index: usize,
    pub category: String,
    /// Absolute source URL.
    pub source: String,
}

impl CacheEntry {
    pub fn is_manifest(&self) -> bool {
        self.category == MANIFEST_CATEGORY
    }

    /// Index left-padded with zeros to `width` digits.
    pub fn padded_index(&self, width: usize) -> String {
        format!("{:0width$}", self.index, width = width)
    }

    /// Path relative to the task root, e.g. `ts/03.ts` or `m3u8/1.local.m3u8`.
    pub fn file_name(&self, width: usize) -> String {
        let idx = self.padded_index(width);
        if self.is_manifest() {
            format!("{}/{}.local.{}", self.category, idx, MANIFEST_CATEGORY)
        } else {
            format!("{}/{}.{}", self.category, idx, self.category)
        }
    }
}

/// Number of decimal digits needed to write `count` (at least 1).
pub fn digit_width(count: usize) -> usize {
    let mut width = 1;
    let mut n = count / 10;
    while n > 0 {
        width += 1;
        n /= 10;
    }
    width
}

/// A category is used as a directory name: non-empty ASCII letters and digits.
pub fn is_valid_category(category: &str) -> bool {
    !category.is_empty() && category.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Category of an absolute URL: `m3u8` for manifests, otherwise the
/// lowercased extension of the last path segment.
pub fn category_for_url(url: &Url) -> Result<String, RegisterError> {
    let path = url.path();
    if targets_manifest(path) {
        return Ok(MANIFEST_CATEGORY.to_string());
    }
    let segment = path.rsplit('/').next().unwrap_or_default();
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && is_valid_category(ext) => {
            Ok(ext.to_ascii_lowercase())
        }
        _ => Err(RegisterError::NoCategory {
            url: url.to_string(),
        }),
    }
}

/// Category implied by the tag whose `URI` attribute references a resource.
pub fn category_for_tag(kind: TagKind) -> Option<&'static str> {
    match kind {
        TagKind::Key | TagKind::SessionKey => Some("key"),
        TagKind::Map => Some("map"),
        TagKind::Media | TagKind::IFrameStreamInf => Some(MANIFEST_CATEGORY),
        TagKind::SessionData => Some("data"),
        TagKind::DateRange | TagKind::StreamInf | TagKind::Start => None,
    }
}

/// Category of a reference found on a manifest line. The URL extension wins;
/// a URL without one falls back to the referencing tag. Plain URI lines
/// (`tag` is `None`) have no fallback.
pub fn category_for_reference(url: &Url, tag: Option<TagKind>) -> Result<String, RegisterError> {
    match category_for_url(url) {
        Ok(category) => Ok(category),
        Err(err) => tag
            .and_then(category_for_tag)
            .map(str::to_string)
            .ok_or(err),
    }
}
