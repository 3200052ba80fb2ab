//! Download one track from a search query or URL, clean up its filename and
//! tag it with artist/title derived from the video title.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::file_name;
use crate::config::CANONICAL_EXTENSION;
use crate::context::AppContext;
use crate::metadata::{TrackTags, UNKNOWN_ARTIST};
use crate::models::{DownloadReport, DownloadedTrack};
use crate::progress::create_spinner;
use crate::sanitize::{clean_title, split_artist_title};

pub fn run(ctx: &AppContext, query: &str, dest_dir: &Path) -> Result<DownloadReport> {
    let query = query.trim();
    anyhow::ensure!(!query.is_empty(), "Download query is empty");

    let spinner = create_spinner(&format!("Downloading '{}'", query), ctx.log_only());
    let downloaded = ctx.downloader.download_best(query, dest_dir);
    spinner.finish_and_clear();
    let track = downloaded.with_context(|| format!("Download of '{}' failed", query))?;
    info!(path = %track.path.display(), title = %track.title, "Downloaded");

    let clean = clean_stem(&track);
    let path = rename_to_clean(&track.path, &clean);
    let (artist, title) = derive_artist_title(&clean, track.uploader.as_deref());

    let mut tags = TrackTags::load(&path)?;
    tags.set_artist(&artist);
    tags.set_title(&title);
    tags.save()?;

    Ok(DownloadReport { path, artist, title })
}

/// Cleaned title, or the downloaded file's stem when nothing survives cleaning.
fn clean_stem(track: &DownloadedTrack) -> String {
    let clean = clean_title(&track.title);
    if !clean.is_empty() {
        return clean;
    }
    track
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Rename `path` to "<clean>.mp3" unless that name is taken.
fn rename_to_clean(path: &Path, clean: &str) -> PathBuf {
    let target = path.with_file_name(format!("{}.{}", clean, CANONICAL_EXTENSION));
    if target == path {
        return target;
    }
    if target.exists() {
        warn!(
            wanted = %file_name(&target),
            "Clean name already taken, keeping '{}'",
            file_name(path)
        );
        return path.to_path_buf();
    }
    match std::fs::rename(path, &target) {
        Ok(()) => target,
        Err(e) => {
            warn!(error = %e, "Failed to rename '{}'", file_name(path));
            path.to_path_buf()
        }
    }
}

/// "Artist - Title" splits on the first separator; otherwise the uploader
/// stands in for the artist.
fn derive_artist_title(clean: &str, uploader: Option<&str>) -> (String, String) {
    if let Some(pair) = split_artist_title(clean) {
        return pair;
    }
    let artist = uploader
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(UNKNOWN_ARTIST);
    (artist.to_string(), clean.to_string())
}
