//! Grammar errors for tag lines and attribute lists.

use std::fmt;

/// A syntax error inside a manifest line, anchored at a byte offset of `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// The text being parsed when the error was found.
    pub text: String,
    /// Byte offset of the offending character (or `text.len()` at end of input).
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Attribute names are limited to `A-Z`, `0-9` and `-`.
    InvalidKeyChar(char),
    /// `=` or `,` with no attribute name before it, or a trailing comma.
    EmptyKey,
    /// Attribute name not followed by `=`.
    MissingAssign,
    /// Attribute value not followed by `,` or end of input.
    MissingComma,
    /// Quoted string without its closing quote.
    UnterminatedQuote,
    /// CR or LF inside a quoted string.
    ForbiddenChar(char),
    /// A registered attribute-list tag written without `:<attribute-list>`.
    MissingAttributeList,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, text: &str, offset: usize) -> Self {
        Self {
            kind,
            text: text.to_string(),
            offset,
        }
    }

    /// Re-anchor an error found in a substring onto the enclosing `line`,
    /// where the substring started at byte `base`.
    pub fn within(self, line: &str, base: usize) -> Self {
        Self {
            kind: self.kind,
            text: line.to_string(),
            offset: base + self.offset,
        }
    }

    /// Marker line underlining the offending character of `{:?}`-formatted text.
    pub fn highlight(&self) -> String {
        let offset = self.offset.min(self.text.len());
        let (before, after) = self.text.split_at(offset);
        // +1 for the opening quote of the debug-formatted text
        let lead = 1 + before.chars().map(|c| c.escape_debug().count()).sum::<usize>();
        let width = after
            .chars()
            .next()
            .map(|c| c.escape_debug().count())
            .unwrap_or(1);
        format!("{}{}", " ".repeat(lead), "~".repeat(width))
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::InvalidKeyChar(c) => {
                write!(f, "{:?} is not a valid character in attribute name", c)
            }
            ParseErrorKind::EmptyKey => write!(f, "expected an attribute name"),
            ParseErrorKind::MissingAssign => write!(f, "expected '='"),
            ParseErrorKind::MissingComma => write!(f, "expected ',' or end of attribute list"),
            ParseErrorKind::UnterminatedQuote => write!(f, "quoted string is not terminated"),
            ParseErrorKind::ForbiddenChar(c) => {
                write!(f, "forbidden character {:?} in quoted string", c)
            }
            ParseErrorKind::MissingAttributeList => write!(f, "tag requires an attribute list"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at offset {}\n{:?}\n{}",
            self.kind,
            self.offset,
            self.text,
            self.highlight()
        )
    }
}

impl std::error::Error for ParseError {}
