//! Request/response clients for the remote lookups.
//!
//! Each service sits behind a narrow trait so the passes can run against
//! fakes in tests. Lookups never fail from the caller's point of view:
//! transport errors and empty results both come back as `None`.

pub mod cover;
pub mod http;
pub mod lyrics;

use crate::error::ServiceError;

pub use cover::DeezerCoverClient;
pub use http::{mime_for_url, HttpImageFetcher};
pub use lyrics::LrclibClient;

/// Synced lyrics search by (artist, title).
pub trait LyricsLookup {
    fn find_synced_lyrics(&self, artist: &str, title: &str) -> Option<String>;
}

/// Cover image search by (artist, title), returning an image URL.
pub trait CoverLookup {
    fn find_cover_url(&self, artist: &str, title: &str) -> Option<String>;
}

/// Plain HTTP GET of a binary resource.
pub trait ImageFetcher {
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ServiceError>;
}
