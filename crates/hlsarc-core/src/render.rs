//! Textual output variants of a playlist: original, absolute and local.

use crate::cache::CacheNames;
use crate::error::LookupError;
use crate::m3u8::Line;
use crate::playlist::{LineEnding, Playlist, PlaylistError};

/// Prefix of local references: local manifests live one directory below the task root.
pub const LOCAL_ROOT_PREFIX: &str = "../";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Each line followed by the terminator it had in the source.
fn join_lines(lines: &[Line], endings: &[LineEnding]) -> String {
    let mut out = String::new();
    for (line, ending) in lines.iter().zip(endings) {
        out.push_str(line.text());
        out.push_str(ending.as_str());
    }
    out
}

/// Every line exactly as parsed.
pub fn render_original(playlist: &Playlist) -> String {
    join_lines(playlist.lines(), playlist.endings())
}

/// URI-bearing lines carry fully-qualified URLs; everything else is unchanged.
pub fn render_absolute(playlist: &Playlist) -> Result<String, RenderError> {
    let absolute = playlist.to_absolute()?;
    Ok(join_lines(absolute.lines(), absolute.endings()))
}

/// URI-bearing lines carry the cache name of their absolute URL.
pub fn render_local(playlist: &Playlist, names: &CacheNames) -> Result<String, RenderError> {
    let lines = playlist
        .lines()
        .iter()
        .map(|line| match line.uri() {
            Some(uri) => {
                let url = playlist.resolve(uri)?;
                let name = names.name(url.as_str())?;
                Ok(line.with_uri(&format!("{LOCAL_ROOT_PREFIX}{name}")))
            }
            None => Ok(line.clone()),
        })
        .collect::<Result<Vec<_>, RenderError>>()?;
    Ok(join_lines(&lines, playlist.endings()))
}

/// All three variants of one manifest plus the padded index naming its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPlaylist {
    pub stem: String,
    pub original: String,
    pub absolute: String,
    pub local: String,
}

impl RenderedPlaylist {
    /// `(file name, contents)` for each variant, e.g. `0.original.m3u8`.
    pub fn files(&self) -> [(String, &str); 3] {
        [
            (format!("{}.original.m3u8", self.stem), self.original.as_str()),
            (format!("{}.absolute.m3u8", self.stem), self.absolute.as_str()),
            (format!("{}.local.m3u8", self.stem), self.local.as_str()),
        ]
    }
}

/// Render every variant of `playlist`, which must itself be registered in `names`.
pub fn render_all(playlist: &Playlist, names: &CacheNames) -> Result<RenderedPlaylist, RenderError> {
    Ok(RenderedPlaylist {
        stem: names.manifest_stem(playlist.url().as_str())?,
        original: render_original(playlist),
        absolute: render_absolute(playlist)?,
        local: render_local(playlist, names)?,
    })
}
