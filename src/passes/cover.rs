//! Find album art for each MP3 and embed it as the front cover.

use anyhow::Result;
use std::path::Path;

use super::{drive, is_canonical, list_files};
use crate::context::AppContext;
use crate::metadata::TrackTags;
use crate::models::{FileOutcome, PassKind, PassResult};
use crate::services::http::mime_for_url;

pub fn run(ctx: &AppContext, dir: &Path) -> Result<PassResult> {
    let files = list_files(dir, is_canonical)?;
    Ok(drive(ctx, PassKind::EmbedCover, &files, |path, _| embed_cover(ctx, path)))
}

fn embed_cover(ctx: &AppContext, path: &Path) -> FileOutcome {
    let mut tags = match TrackTags::load(path) {
        Ok(tags) => tags,
        Err(e) => return FileOutcome::Failed(e.to_string()),
    };
    if tags.has_cover() {
        return FileOutcome::Skipped("already has a cover".to_string());
    }
    let Some((artist, title)) = tags
        .artist_and_title()
        .map(|(a, t)| (a.to_string(), t.to_string()))
    else {
        return FileOutcome::Failed("missing artist or title".to_string());
    };

    ctx.pace();
    let Some(url) = ctx.covers.find_cover_url(&artist, &title) else {
        return FileOutcome::Failed(format!("no cover for {} - {}", artist, title));
    };
    let data = match ctx.images.fetch_bytes(&url) {
        Ok(data) => data,
        Err(e) => return FileOutcome::Failed(format!("cover download failed: {}", e)),
    };

    tags.set_front_cover(data, mime_for_url(&url));
    match tags.save() {
        Ok(()) => FileOutcome::Succeeded(format!("cover added to {}", title)),
        Err(e) => FileOutcome::Failed(e.to_string()),
    }
}
