//! Line classification: blank, comment, tag or URI reference.

use super::error::ParseError;
use super::tag::{Tag, TagKind};

/// A tag line: source text plus its parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLine {
    text: String,
    tag: Tag,
}

impl TagLine {
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One manifest line. Every variant keeps its exact source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    Comment(String),
    Tag(TagLine),
    Uri(String),
}

impl Line {
    /// Classify one line of manifest text (without its line terminator).
    pub fn classify(text: &str) -> Result<Self, ParseError> {
        if text.is_empty() {
            Ok(Line::Blank)
        } else if text.starts_with("#EXT") {
            Ok(Line::Tag(TagLine {
                text: text.to_string(),
                tag: Tag::parse(text)?,
            }))
        } else if text.starts_with('#') {
            Ok(Line::Comment(text.to_string()))
        } else {
            Ok(Line::Uri(text.to_string()))
        }
    }

    /// The line as it is currently written.
    pub fn text(&self) -> &str {
        match self {
            Line::Blank => "",
            Line::Comment(text) | Line::Uri(text) => text.as_str(),
            Line::Tag(tag_line) => tag_line.text.as_str(),
        }
    }

    /// URI referenced by this line: the whole line for a URI line, the `URI`
    /// attribute for a URI-capable tag.
    pub fn uri(&self) -> Option<&str> {
        match self {
            Line::Uri(text) => Some(text.as_str()),
            Line::Tag(tag_line) => tag_line.tag.uri(),
            Line::Blank | Line::Comment(_) => None,
        }
    }

    /// Kind of a registered tag line; `None` for every other line.
    pub fn tag_kind(&self) -> Option<TagKind> {
        match self {
            Line::Tag(tag_line) => tag_line.tag.kind(),
            Line::Blank | Line::Comment(_) | Line::Uri(_) => None,
        }
    }

    /// A copy of this line with its URI replaced. Lines without a URI are
    /// returned unchanged; in a tag only the `URI` attribute value changes.
    pub fn with_uri(&self, uri: &str) -> Line {
        match self {
            Line::Uri(_) => Line::Uri(uri.to_string()),
            Line::Tag(tag_line) => {
                let mut tag = tag_line.tag.clone();
                if tag.set_uri(uri) {
                    Line::Tag(TagLine {
                        text: tag.to_string(),
                        tag,
                    })
                } else {
                    self.clone()
                }
            }
            Line::Blank | Line::Comment(_) => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_each_kind() {
        assert_eq!(Line::classify("").unwrap(), Line::Blank);
        assert_eq!(
            Line::classify("# a comment").unwrap(),
            Line::Comment("# a comment".to_string())
        );
        assert!(matches!(Line::classify("#EXTM3U").unwrap(), Line::Tag(_)));
        assert_eq!(
            Line::classify("seg-1.ts").unwrap(),
            Line::Uri("seg-1.ts".to_string())
        );
    }

    #[test]
    fn text_roundtrips_for_every_kind() {
        for text in [
            "",
            "#EXTM3U",
            "#EXTINF:9.009,",
            "#EXT-X-KEY:METHOD=AES-128,URI=\"key.bin\",IV=0x10",
            "#EXT-X-STREAM-INF:BANDWIDTH=1280000,RESOLUTION=640x360",
            "# comment, with = signs",
            "#EXTX-not-registered: spaced value ",
            "https://cdn.example.com/a/seg.ts?token=1",
            "  leading spaces.ts",
        ] {
            assert_eq!(Line::classify(text).unwrap().text(), text);
        }
    }

    #[test]
    fn uri_of_lines() {
        assert_eq!(Line::classify("seg.ts").unwrap().uri(), Some("seg.ts"));
        assert_eq!(
            Line::classify("#EXT-X-MAP:URI=\"init.mp4\"").unwrap().uri(),
            Some("init.mp4")
        );
        assert_eq!(Line::classify("#EXTINF:4,").unwrap().uri(), None);
        assert_eq!(Line::classify("# seg.ts").unwrap().uri(), None);
        assert_eq!(Line::classify("").unwrap().uri(), None);
    }

    #[test]
    fn with_uri_rewrites_only_the_uri() {
        let line = Line::classify("#EXT-X-KEY:METHOD=AES-128,URI=\"k\",IV=0x10").unwrap();
        let moved = line.with_uri("https://h/k");
        assert_eq!(
            moved.text(),
            "#EXT-X-KEY:METHOD=AES-128,URI=\"https://h/k\",IV=0x10"
        );
        // source value untouched
        assert_eq!(line.text(), "#EXT-X-KEY:METHOD=AES-128,URI=\"k\",IV=0x10");

        let uri = Line::classify("seg.ts").unwrap().with_uri("ts/0.ts");
        assert_eq!(uri, Line::Uri("ts/0.ts".to_string()));

        let comment = Line::classify("# keep").unwrap();
        assert_eq!(comment.with_uri("x"), comment);
    }

    #[test]
    fn tag_kind_of_lines() {
        let key = Line::classify("#EXT-X-KEY:METHOD=AES-128,URI=\"https://h/key\"").unwrap();
        assert_eq!(key.tag_kind(), Some(TagKind::Key));
        assert_eq!(Line::classify("#EXTINF:4,").unwrap().tag_kind(), None);
        assert_eq!(Line::classify("seg.ts").unwrap().tag_kind(), None);
    }

    #[test]
    fn bad_tag_line_is_an_error() {
        assert!(Line::classify("#EXT-X-KEY:METHOD=AES-128,URI=\"k").is_err());
    }
}
