//! Contract-violation errors shared by the attribute list and the cache tables.

/// Lookup of something that was never parsed or registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// `name()` called for a URL that was never registered.
    #[error("no cache entry registered for {url}")]
    Unregistered { url: String },
    /// Attribute access by a key the list does not contain.
    #[error("attribute {key:?} does not exist in attribute list")]
    UnknownAttribute { key: String },
}

/// Registration refused: every entry needs a category usable as a directory name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    #[error("empty cache category for {url}")]
    EmptyCategory { url: String },
    /// Categories are ASCII letters and digits only.
    #[error("invalid cache category {category:?} for {url}")]
    InvalidCategory { category: String, url: String },
    /// Neither the URL path nor the referencing tag gives a category.
    #[error("cannot derive a cache category from {url}")]
    NoCategory { url: String },
}
