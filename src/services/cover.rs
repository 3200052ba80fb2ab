//! Deezer track search for album cover URLs.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::http::build_client;
use super::CoverLookup;
use crate::error::ServiceError;

pub const DEEZER_SEARCH_URL: &str = "https://api.deezer.com/search";

#[derive(Debug, Default, Deserialize)]
pub struct DeezerSearch {
    #[serde(default)]
    pub data: Vec<DeezerTrack>,
}

#[derive(Debug, Deserialize)]
pub struct DeezerTrack {
    #[serde(default)]
    pub album: Option<DeezerAlbum>,
}

/// Album object; each size is optional in practice.
#[derive(Debug, Default, Deserialize)]
pub struct DeezerAlbum {
    pub cover: Option<String>,
    pub cover_small: Option<String>,
    pub cover_medium: Option<String>,
    pub cover_big: Option<String>,
    pub cover_xl: Option<String>,
}

impl DeezerAlbum {
    /// Largest available cover URL.
    pub fn largest_cover(&self) -> Option<&str> {
        [
            &self.cover_xl,
            &self.cover_big,
            &self.cover_medium,
            &self.cover,
            &self.cover_small,
        ]
        .into_iter()
        .filter_map(|c| c.as_deref())
        .find(|c| !c.is_empty())
    }
}

/// Cover of the first (most relevant) match only.
pub fn best_cover(search: &DeezerSearch) -> Option<String> {
    search
        .data
        .first()?
        .album
        .as_ref()?
        .largest_cover()
        .map(str::to_string)
}

pub struct DeezerCoverClient {
    client: Client,
    search_url: String,
}

impl DeezerCoverClient {
    pub fn new(timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(timeout)?,
            search_url: DEEZER_SEARCH_URL.to_string(),
        })
    }

    fn search(&self, artist: &str, title: &str) -> Result<DeezerSearch, ServiceError> {
        let query = format!("{} {}", artist, title);
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query.as_str())])
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }
        Ok(response.json()?)
    }
}

impl CoverLookup for DeezerCoverClient {
    fn find_cover_url(&self, artist: &str, title: &str) -> Option<String> {
        match self.search(artist, title) {
            Ok(search) => {
                debug!(artist, title, results = search.data.len(), "deezer search");
                best_cover(&search)
            }
            Err(e) => {
                warn!(artist, title, error = %e, "deezer lookup failed");
                None
            }
        }
    }
}
