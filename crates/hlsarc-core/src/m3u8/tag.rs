//! Tag registry: maps `#EXT` tag names to structured tags.
//!
//! Only the tags listed in [`TagKind`] carry an attribute list; every other
//! tag stays opaque and is reproduced from its raw text.

use std::fmt;

use super::attribute::AttributeList;
use super::error::{ParseError, ParseErrorKind};

/// Attribute holding the resource reference of a URI-capable tag.
pub const URI_ATTRIBUTE: &str = "URI";

/// Tags whose value is an attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Key,
    Map,
    DateRange,
    Media,
    StreamInf,
    IFrameStreamInf,
    SessionData,
    SessionKey,
    Start,
}

impl TagKind {
    pub const ALL: [TagKind; 9] = [
        TagKind::Key,
        TagKind::Map,
        TagKind::DateRange,
        TagKind::Media,
        TagKind::StreamInf,
        TagKind::IFrameStreamInf,
        TagKind::SessionData,
        TagKind::SessionKey,
        TagKind::Start,
    ];

    /// Tag name as written in a manifest, including the leading `#`.
    pub fn name(self) -> &'static str {
        match self {
            TagKind::Key => "#EXT-X-KEY",
            TagKind::Map => "#EXT-X-MAP",
            TagKind::DateRange => "#EXT-X-DATERANGE",
            TagKind::Media => "#EXT-X-MEDIA",
            TagKind::StreamInf => "#EXT-X-STREAM-INF",
            TagKind::IFrameStreamInf => "#EXT-X-I-FRAME-STREAM-INF",
            TagKind::SessionData => "#EXT-X-SESSION-DATA",
            TagKind::SessionKey => "#EXT-X-SESSION-KEY",
            TagKind::Start => "#EXT-X-START",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// A parsed tag line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// A registered tag with its attribute list.
    Attributes {
        kind: TagKind,
        attributes: AttributeList,
    },
    /// Any other tag, kept as raw text.
    Opaque(String),
}

impl Tag {
    /// Parse a line starting with `#EXT`.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let (name, rest) = match line.split_once(':') {
            Some((name, rest)) => (name, Some(rest)),
            None => (line, None),
        };
        let Some(kind) = TagKind::from_name(name) else {
            return Ok(Tag::Opaque(line.to_string()));
        };
        let Some(rest) = rest else {
            return Err(ParseError::new(
                ParseErrorKind::MissingAttributeList,
                line,
                line.len(),
            ));
        };
        let attributes = AttributeList::parse(rest).map_err(|e| e.within(line, name.len() + 1))?;
        Ok(Tag::Attributes { kind, attributes })
    }

    /// Tag name including the leading `#`.
    pub fn name(&self) -> &str {
        match self {
            Tag::Attributes { kind, .. } => kind.name(),
            Tag::Opaque(text) => text.split_once(':').map_or(text.as_str(), |(n, _)| n),
        }
    }

    pub fn kind(&self) -> Option<TagKind> {
        match self {
            Tag::Attributes { kind, .. } => Some(*kind),
            Tag::Opaque(_) => None,
        }
    }

    pub fn attributes(&self) -> Option<&AttributeList> {
        match self {
            Tag::Attributes { attributes, .. } => Some(attributes),
            Tag::Opaque(_) => None,
        }
    }

    /// The `URI` attribute value without quotes, when the tag has one.
    pub fn uri(&self) -> Option<&str> {
        self.attributes()?.get(URI_ATTRIBUTE).map(|a| a.unquoted())
    }

    /// Replace the `URI` attribute, keeping its quoting style. Returns false
    /// (and leaves the tag untouched) when the tag has no URI capability.
    pub fn set_uri(&mut self, uri: &str) -> bool {
        let Tag::Attributes { attributes, .. } = self else {
            return false;
        };
        let Some(quoted) = attributes.get(URI_ATTRIBUTE).map(|a| a.is_quoted()) else {
            return false;
        };
        let value = if quoted {
            format!("\"{}\"", uri)
        } else {
            uri.to_string()
        };
        attributes.set(URI_ATTRIBUTE, value).is_ok()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Attributes { kind, attributes } => write!(f, "{}:{}", kind.name(), attributes),
            Tag::Opaque(text) => f.write_str(text),
        }
    }
}
