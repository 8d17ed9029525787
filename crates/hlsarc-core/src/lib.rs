//! Offline archiving of HLS (m3u8) streams.
//!
//! A session walks from a master playlist to one media playlist
//! ([`session::discover`]), assigns every referenced URL a stable local name
//! ([`cache`]), renders each manifest in original, absolute and local form
//! ([`render`]) and downloads the resources with a bounded worker pool
//! ([`downloader`]).

pub mod cache;
pub mod config;
pub mod control;
pub mod downloader;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod m3u8;
pub mod playlist;
pub mod render;
pub mod retry;
pub mod session;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
