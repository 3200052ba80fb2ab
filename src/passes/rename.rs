//! Rename MP3 files to "Artist - Title.mp3" from their tags.

use anyhow::Result;
use std::path::Path;

use super::{drive, file_name, is_canonical, list_files};
use crate::config::CANONICAL_EXTENSION;
use crate::context::AppContext;
use crate::metadata::{TrackTags, UNKNOWN_ARTIST, UNKNOWN_TITLE};
use crate::models::{FileOutcome, PassKind, PassResult};
use crate::sanitize::{sanitize_filename, ARTIST_TITLE_SEPARATOR};

pub fn run(ctx: &AppContext, dir: &Path) -> Result<PassResult> {
    let files = list_files(dir, is_canonical)?;
    Ok(drive(ctx, PassKind::Rename, &files, |path, _| rename_file(path)))
}

/// Target filename for a pair of tag values. Values that sanitize to
/// nothing fall back to the "unknown" placeholders.
pub fn target_name(artist: &str, title: &str) -> String {
    let artist = non_empty_or(sanitize_filename(artist), UNKNOWN_ARTIST);
    let title = non_empty_or(sanitize_filename(title), UNKNOWN_TITLE);
    format!("{}{}{}.{}", artist, ARTIST_TITLE_SEPARATOR, title, CANONICAL_EXTENSION)
}

fn non_empty_or(value: String, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn rename_file(path: &Path) -> FileOutcome {
    let tags = match TrackTags::load(path) {
        Ok(tags) => tags,
        Err(e) => return FileOutcome::Failed(e.to_string()),
    };
    let new_name = target_name(tags.artist_or_default(), tags.title_or_default());
    if file_name(path) == new_name {
        return FileOutcome::Skipped("already named".to_string());
    }

    let target = path.with_file_name(&new_name);
    if target.exists() {
        return FileOutcome::Skipped(format!("'{}' already exists", new_name));
    }
    match std::fs::rename(path, &target) {
        Ok(()) => FileOutcome::Succeeded(format!("→ {}", new_name)),
        Err(e) => FileOutcome::Failed(format!("rename failed: {}", e)),
    }
}
