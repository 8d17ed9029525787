//! Manifest grammar: line classification, tag registry and attribute lists.

mod attribute;
mod error;
mod line;
mod tag;

pub use attribute::{Attribute, AttributeList};
pub use error::{ParseError, ParseErrorKind};
pub use line::{Line, TagLine};
pub use tag::{Tag, TagKind, URI_ATTRIBUTE};
