//! Shared blocking HTTP client setup and the image fetcher.

use reqwest::blocking::Client;
use std::time::Duration;

use super::ImageFetcher;
use crate::error::ServiceError;

pub const USER_AGENT: &str = concat!("sonic-forge/", env!("CARGO_PKG_VERSION"));

/// Build a blocking client with a bounded total timeout.
pub fn build_client(timeout: Duration) -> Result<Client, ServiceError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// MIME type for an image URL, chosen from its file extension.
/// Anything that is not a PNG is treated as JPEG.
pub fn mime_for_url(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path.to_ascii_lowercase().ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}

/// Downloads image bytes with a plain GET.
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }
        let bytes = response.bytes()?;
        if bytes.is_empty() {
            return Err(ServiceError::EmptyBody);
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_url() {
        assert_eq!(mime_for_url("https://cdn.example.com/cover.png"), "image/png");
        assert_eq!(mime_for_url("https://cdn.example.com/COVER.PNG?x=1"), "image/png");
        assert_eq!(mime_for_url("https://cdn.example.com/cover.jpg"), "image/jpeg");
        assert_eq!(mime_for_url("https://cdn.example.com/1000x1000-000000-80-0-0"), "image/jpeg");
        assert_eq!(mime_for_url("https://cdn.example.com/a.png.jpg"), "image/jpeg");
    }

    #[test]
    fn test_fetch_bytes_refused_connection_is_an_error() {
        let fetcher = HttpImageFetcher::new(Duration::from_secs(2)).unwrap();
        let err = fetcher.fetch_bytes("http://127.0.0.1:1/cover.jpg").unwrap_err();
        assert!(matches!(err, ServiceError::Http(_)));
    }
}
