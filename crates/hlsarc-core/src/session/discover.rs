//! Sequential discovery walk: master -> selected variant -> media playlist.
//!
//! Each manifest is fetched only after the previous one is parsed and its
//! variant chosen, because its URL is the base for its own relative references.

use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashSet;
use url::Url;

use super::select::VariantSelector;
use crate::cache::{CacheNames, CacheRegistry, MANIFEST_CATEGORY};
use crate::fetch::{fetch_with_retry, FetchOptions, Fetcher};
use crate::playlist::{Playlist, PlaylistKind};

/// Result of a finished walk: manifests in walk order and the frozen cache table.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub playlists: Vec<Playlist>,
    pub names: CacheNames,
}

impl Discovery {
    /// The media playlist the walk ended on.
    pub fn media(&self) -> Option<&Playlist> {
        self.playlists.last()
    }
}

fn fetch_playlist(fetcher: &dyn Fetcher, url: &Url, options: &FetchOptions) -> Result<Playlist> {
    let body = fetch_with_retry(fetcher, url, options)
        .with_context(|| format!("fetch manifest {}", url))?;
    let text = String::from_utf8(body).with_context(|| format!("manifest {} is not UTF-8", url))?;
    Playlist::parse(&text, url.clone()).with_context(|| format!("parse manifest {}", url))
}

/// Walk from `start` to a media playlist, registering every manifest and
/// every referenced URI on the way.
pub fn discover(
    start: &Url,
    fetcher: &dyn Fetcher,
    selector: &mut dyn VariantSelector,
    options: &FetchOptions,
) -> Result<Discovery> {
    discover_into(CacheRegistry::new(), start, fetcher, selector, options)
}

/// Same walk, registering into `registry`. Sources it already holds keep
/// their entries, so a table reloaded from disk keeps its names.
pub fn discover_into(
    mut registry: CacheRegistry,
    start: &Url,
    fetcher: &dyn Fetcher,
    selector: &mut dyn VariantSelector,
    options: &FetchOptions,
) -> Result<Discovery> {
    let mut playlists = Vec::new();
    let mut walked = HashSet::new();
    let mut url = start.clone();

    loop {
        if !walked.insert(url.as_str().to_string()) {
            bail!("variant selection cycles back to {}", url);
        }
        let playlist = fetch_playlist(fetcher, &url, options)?;
        registry.register(url.as_str(), MANIFEST_CATEGORY)?;
        for line in playlist.lines() {
            let Some(uri) = line.uri() else {
                continue;
            };
            let absolute = playlist.resolve(uri)?;
            registry
                .register_reference(&absolute, line.tag_kind())
                .with_context(|| format!("register reference in {}", url))?;
        }

        let kind = playlist
            .kind()
            .with_context(|| format!("classify manifest {}", url))?;
        tracing::info!(url = %url, ?kind, lines = playlist.lines().len(), "manifest discovered");
        match kind {
            PlaylistKind::Media => {
                playlists.push(playlist);
                break;
            }
            PlaylistKind::Master => {
                let candidates = playlist.variant_candidates()?;
                if candidates.is_empty() {
                    bail!("master playlist {} lists no variant stream", url);
                }
                let index = selector
                    .select(&playlist, &candidates)
                    .ok_or_else(|| anyhow!("no variant selected for {}", url))?;
                let next = candidates.get(index).cloned().ok_or_else(|| {
                    anyhow!(
                        "variant index {} out of range, {} lists {} variant(s)",
                        index,
                        url,
                        candidates.len()
                    )
                })?;
                tracing::info!(variant = %next, index, "variant selected");
                playlists.push(playlist);
                url = next;
            }
        }
    }

    let names = registry.freeze();
    tracing::debug!(entries = names.len(), manifests = playlists.len(), "discovery finished");
    Ok(Discovery { playlists, names })
}
