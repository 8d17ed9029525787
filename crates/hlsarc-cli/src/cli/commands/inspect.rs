//! `hlsarc inspect <file>`: classify a local manifest and list its references.

use anyhow::{Context, Result};
use hlsarc_core::playlist::{Playlist, PlaylistKind};
use std::path::Path;
use url::Url;

fn base_url(path: &Path, base: Option<&str>) -> Result<Url> {
    if let Some(base) = base {
        return Url::parse(base).with_context(|| format!("invalid base URL: {base}"));
    }
    let abs = path
        .canonicalize()
        .with_context(|| format!("resolve path: {}", path.display()))?;
    Url::from_file_path(&abs)
        .map_err(|_| anyhow::anyhow!("cannot form file URL for {}", abs.display()))
}

pub fn run_inspect(path: &Path, base: Option<&str>) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read manifest: {}", path.display()))?;
    let url = base_url(path, base)?;
    let playlist = Playlist::parse(&text, url)
        .with_context(|| format!("parse manifest: {}", path.display()))?;

    match playlist.kind() {
        Ok(PlaylistKind::Master) => println!("master playlist"),
        Ok(PlaylistKind::Media) => println!("media playlist"),
        Err(e) => println!("unclassified: {e}"),
    }
    for uri in playlist.absolute_uris()? {
        println!("  {uri}");
    }
    if playlist.is_master() {
        for (i, candidate) in playlist.variant_candidates()?.iter().enumerate() {
            println!("variant [{i}] {candidate}");
        }
    }
    Ok(())
}
