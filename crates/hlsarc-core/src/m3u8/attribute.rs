//! Attribute-list grammar: `KEY=VALUE,KEY="quoted value",...`.
//!
//! Parsed by an explicit KEY / KEY_END / VALUE / VALUE_END state machine.
//! Values are stored raw (quoted values keep their quotes), so serializing a
//! parsed list reproduces its source text exactly. There is no escape
//! mechanism: the first `"` after an opening quote always closes the value.

use std::fmt;

use super::error::{ParseError, ParseErrorKind};
use crate::error::LookupError;

/// One `KEY=VALUE` pair with the value kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    key: String,
    value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw value, including the surrounding quotes of a quoted string.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_quoted(&self) -> bool {
        self.value.len() >= 2 && self.value.starts_with('"') && self.value.ends_with('"')
    }

    /// Value with the quotes of a quoted string removed; bare values unchanged.
    pub fn unquoted(&self) -> &str {
        if self.is_quoted() {
            &self.value[1..self.value.len() - 1]
        } else {
            &self.value
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Ordered attributes of one tag. Duplicate keys are kept; lookups see the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Key,
    KeyEnd,
    Value,
    ValueEnd,
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-'
}

impl AttributeList {
    /// Parse the text after `#EXT-X-...:`. Empty text yields an empty list.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut attributes = Vec::new();
        if text.is_empty() {
            return Ok(Self { attributes });
        }

        let err = |kind, offset| ParseError::new(kind, text, offset);
        let peek = |pos: usize| text[pos..].chars().next();

        let mut pos = 0usize;
        let mut key = "";
        let mut state = State::Key;
        loop {
            match state {
                State::Key => {
                    let start = pos;
                    while let Some(c) = peek(pos) {
                        if c == '=' {
                            break;
                        }
                        if !is_key_char(c) {
                            return Err(err(ParseErrorKind::InvalidKeyChar(c), pos));
                        }
                        pos += c.len_utf8();
                    }
                    if pos == start {
                        return Err(err(ParseErrorKind::EmptyKey, pos));
                    }
                    key = &text[start..pos];
                    state = State::KeyEnd;
                }
                State::KeyEnd => match peek(pos) {
                    Some('=') => {
                        pos += 1;
                        state = State::Value;
                    }
                    _ => return Err(err(ParseErrorKind::MissingAssign, pos)),
                },
                State::Value => {
                    let start = pos;
                    if peek(pos) == Some('"') {
                        pos += 1;
                        loop {
                            match peek(pos) {
                                None => return Err(err(ParseErrorKind::UnterminatedQuote, start)),
                                Some('"') => {
                                    pos += 1;
                                    break;
                                }
                                Some(c @ ('\r' | '\n')) => {
                                    return Err(err(ParseErrorKind::ForbiddenChar(c), pos))
                                }
                                Some(c) => pos += c.len_utf8(),
                            }
                        }
                    } else {
                        pos = text[pos..].find(',').map_or(text.len(), |i| pos + i);
                    }
                    attributes.push(Attribute::new(key, &text[start..pos]));
                    state = State::ValueEnd;
                }
                State::ValueEnd => match peek(pos) {
                    None => break,
                    Some(',') => {
                        pos += 1;
                        state = State::Key;
                    }
                    Some(_) => return Err(err(ParseErrorKind::MissingComma, pos)),
                },
            }
        }

        Ok(Self { attributes })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// First attribute with `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Raw value of the first attribute with `key`.
    pub fn value(&self, key: &str) -> Result<&str, LookupError> {
        self.get(key)
            .map(Attribute::value)
            .ok_or_else(|| LookupError::UnknownAttribute {
                key: key.to_string(),
            })
    }

    /// Replace the raw value of the first attribute with `key`, keeping its position.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), LookupError> {
        match self.attributes.iter_mut().find(|a| a.key == key) {
            Some(attr) => {
                attr.value = value.into();
                Ok(())
            }
            None => Err(LookupError::UnknownAttribute {
                key: key.to_string(),
            }),
        }
    }
}

impl fmt::Display for AttributeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, attr) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", attr)?;
        }
        Ok(())
    }
}
