//! Typed errors at the external boundaries: tag container, HTTP services
//! and subprocess tools.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing an ID3 tag container.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("cannot read tags from '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },

    #[error("cannot write tags to '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },
}

/// Errors talking to the lyrics / cover / image services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("empty response body")]
    EmptyBody,
}

/// Errors running an external tool (ffmpeg, yt-dlp).
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{tool} was not found in PATH")]
    NotFound { tool: String },

    #[error("{tool} exited with status {code}: {stderr}")]
    Failed {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("{tool} produced unexpected output: {reason}")]
    InvalidOutput { tool: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Map a spawn error, turning "not found" into a friendlier message.
    pub fn from_spawn(tool: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ToolError::NotFound {
                tool: tool.to_string(),
            }
        } else {
            ToolError::Io(err)
        }
    }
}
