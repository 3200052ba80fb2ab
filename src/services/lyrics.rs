//! LRCLIB synced lyrics search.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::http::build_client;
use super::LyricsLookup;
use crate::error::ServiceError;

pub const LRCLIB_SEARCH_URL: &str = "https://lrclib.net/api/search";

/// One candidate from `GET /api/search`. Only the fields we use.
#[derive(Debug, Deserialize)]
pub struct LrclibRecord {
    #[serde(rename = "syncedLyrics", default)]
    pub synced_lyrics: Option<String>,
}

/// First record carrying a non-empty synced payload. Records with only
/// plain lyrics are ignored.
pub fn first_synced(records: Vec<LrclibRecord>) -> Option<String> {
    records
        .into_iter()
        .filter_map(|r| r.synced_lyrics)
        .find(|lyrics| !lyrics.trim().is_empty())
}

pub struct LrclibClient {
    client: Client,
    search_url: String,
}

impl LrclibClient {
    pub fn new(timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(timeout)?,
            search_url: LRCLIB_SEARCH_URL.to_string(),
        })
    }

    fn search(&self, artist: &str, title: &str) -> Result<Vec<LrclibRecord>, ServiceError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("track_name", title), ("artist_name", artist)])
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }
        Ok(response.json()?)
    }
}

impl LyricsLookup for LrclibClient {
    fn find_synced_lyrics(&self, artist: &str, title: &str) -> Option<String> {
        match self.search(artist, title) {
            Ok(records) => {
                debug!(artist, title, candidates = records.len(), "lrclib search");
                first_synced(records)
            }
            Err(e) => {
                warn!(artist, title, error = %e, "lrclib lookup failed");
                None
            }
        }
    }
}
