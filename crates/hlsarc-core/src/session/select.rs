//! Variant selection: which stream of a master playlist to descend into.

use url::Url;

use crate::playlist::Playlist;

/// Chooses one of the variant URLs a master playlist lists. Returns an index
/// into `candidates`, or `None` to stop the walk.
pub trait VariantSelector {
    fn select(&mut self, master: &Playlist, candidates: &[Url]) -> Option<usize>;
}

/// Always picks the same position; out-of-range indices are rejected by the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexSelector(pub usize);

impl VariantSelector for IndexSelector {
    fn select(&mut self, _master: &Playlist, _candidates: &[Url]) -> Option<usize> {
        Some(self.0)
    }
}

impl<F> VariantSelector for F
where
    F: FnMut(&[Url]) -> Option<usize>,
{
    fn select(&mut self, _master: &Playlist, candidates: &[Url]) -> Option<usize> {
        self(candidates)
    }
}
