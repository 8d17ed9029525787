//! Playlist model: an ordered line sequence rooted at its own retrieval URL.
//!
//! Relative references always resolve against the playlist's own URL, never
//! against the manifest it was reached from. Master/media classification is
//! derived from the lines on every call, never stored.

use url::Url;

use crate::m3u8::{Line, ParseError};

#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    #[error("line {line}: {source}")]
    Parse {
        /// 1-based line number.
        line: usize,
        #[source]
        source: ParseError,
    },
    #[error("cannot resolve {uri:?} against {base}: {source}")]
    Resolve {
        uri: String,
        base: Url,
        #[source]
        source: url::ParseError,
    },
}

/// A playlist that fits neither class under the strict rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error(
        "playlist mixes {manifests} manifest reference(s) with {resources} resource reference(s)"
    )]
    Mixed { manifests: usize, resources: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistKind {
    /// Every reference targets another manifest.
    Master,
    /// No reference targets a manifest.
    Media,
}

/// True if the path part of `uri` (query and fragment stripped) ends in `.m3u8` or `.m3u`.
pub fn targets_manifest(uri: &str) -> bool {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    let path = path.to_ascii_lowercase();
    path.ends_with(".m3u8") || path.ends_with(".m3u")
}

/// Terminator that followed a line in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
    /// Last line of a text that does not end with a newline.
    Missing,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Missing => "",
        }
    }
}

fn split_terminator(piece: &str) -> (&str, LineEnding) {
    if let Some(text) = piece.strip_suffix("\r\n") {
        (text, LineEnding::CrLf)
    } else if let Some(text) = piece.strip_suffix('\n') {
        (text, LineEnding::Lf)
    } else {
        (piece, LineEnding::Missing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    url: Url,
    lines: Vec<Line>,
    /// One per line, in line order.
    endings: Vec<LineEnding>,
}

impl Playlist {
    /// Classify every line of `text`. `url` is where the text was retrieved from.
    /// Each line keeps its own LF or CRLF terminator.
    pub fn parse(text: &str, url: Url) -> Result<Self, PlaylistError> {
        let mut lines = Vec::new();
        let mut endings = Vec::new();
        for (i, piece) in text.split_inclusive('\n').enumerate() {
            let (line, ending) = split_terminator(piece);
            lines.push(Line::classify(line).map_err(|source| PlaylistError::Parse {
                line: i + 1,
                source,
            })?);
            endings.push(ending);
        }
        Ok(Self {
            url,
            lines,
            endings,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Terminator of each line, parallel to [`Playlist::lines`].
    pub fn endings(&self) -> &[LineEnding] {
        &self.endings
    }

    /// Whether the source text ended with a line terminator.
    pub fn trailing_newline(&self) -> bool {
        self.endings
            .last()
            .is_some_and(|e| *e != LineEnding::Missing)
    }

    /// URIs of all URI-bearing lines, as written.
    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(Line::uri)
    }

    /// Resolve `uri` against this playlist's own URL.
    pub fn resolve(&self, uri: &str) -> Result<Url, PlaylistError> {
        self.url.join(uri).map_err(|source| PlaylistError::Resolve {
            uri: uri.to_string(),
            base: self.url.clone(),
            source,
        })
    }

    /// Fully-qualified URLs of every URI-bearing line, in line order.
    pub fn absolute_uris(&self) -> Result<Vec<Url>, PlaylistError> {
        self.uris().map(|uri| self.resolve(uri)).collect()
    }

    /// True iff every URI-bearing line targets a manifest (vacuously true when there are none).
    pub fn is_master(&self) -> bool {
        self.uris().all(targets_manifest)
    }

    /// True iff no URI-bearing line targets a manifest (vacuously true when there are none).
    pub fn is_media(&self) -> bool {
        !self.uris().any(targets_manifest)
    }

    /// Single classification. A playlist without any URI-bearing line is
    /// media: it has no variant to descend into and no resource to fetch.
    pub fn kind(&self) -> Result<PlaylistKind, ClassificationError> {
        let manifests = self.uris().filter(|u| targets_manifest(u)).count();
        let resources = self.uris().count() - manifests;
        match (manifests, resources) {
            (0, 0) => {
                tracing::debug!(url = %self.url, "playlist has no URI lines, classified as media");
                Ok(PlaylistKind::Media)
            }
            (_, 0) => Ok(PlaylistKind::Master),
            (0, _) => Ok(PlaylistKind::Media),
            (manifests, resources) => Err(ClassificationError::Mixed {
                manifests,
                resources,
            }),
        }
    }

    /// A new playlist whose URI-bearing lines hold fully-qualified URLs.
    pub fn to_absolute(&self) -> Result<Playlist, PlaylistError> {
        let lines = self
            .lines
            .iter()
            .map(|line| match line.uri() {
                Some(uri) => Ok(line.with_uri(self.resolve(uri)?.as_str())),
                None => Ok(line.clone()),
            })
            .collect::<Result<Vec<_>, PlaylistError>>()?;
        Ok(Playlist {
            url: self.url.clone(),
            lines,
            endings: self.endings.clone(),
        })
    }

    /// Absolute URLs of the variant streams a master lists (its plain URI lines).
    pub fn variant_candidates(&self) -> Result<Vec<Url>, PlaylistError> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                Line::Uri(uri) => Some(self.resolve(uri)),
                _ => None,
            })
            .collect()
    }
}
