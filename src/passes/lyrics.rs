//! Look up synced lyrics for each MP3 and embed them. Files that cannot be
//! looked up, or have no lyrics anywhere, are moved to quarantine.

use anyhow::Result;
use std::path::Path;

use super::{drive, file_name, is_canonical, list_files, move_to_quarantine};
use crate::context::AppContext;
use crate::metadata::TrackTags;
use crate::models::{FileOutcome, PassKind, PassResult};

pub fn run(ctx: &AppContext, dir: &Path) -> Result<PassResult> {
    let files = list_files(dir, is_canonical)?;
    let quarantine = ctx.quarantine_dir(dir);
    Ok(drive(ctx, PassKind::EmbedLyrics, &files, |path, pb| {
        pb.set_message(format!("{} {}", PassKind::EmbedLyrics.label(), short_name(path)));
        embed_lyrics(ctx, path, &quarantine)
    }))
}

fn short_name(path: &Path) -> String {
    let name = file_name(path);
    if name.chars().count() > 20 {
        format!("{}...", name.chars().take(20).collect::<String>())
    } else {
        name
    }
}

fn embed_lyrics(ctx: &AppContext, path: &Path, quarantine: &Path) -> FileOutcome {
    let mut tags = match TrackTags::load(path) {
        Ok(tags) => tags,
        Err(e) => return FileOutcome::Failed(e.to_string()),
    };
    if tags.has_synced_lyrics() {
        return FileOutcome::Skipped("already has lyrics".to_string());
    }

    let Some((artist, title)) = tags
        .artist_and_title()
        .map(|(a, t)| (a.to_string(), t.to_string()))
    else {
        return quarantine_file(path, quarantine, "incomplete tags", true);
    };

    ctx.pace();
    let Some(lyrics) = ctx.lyrics.find_synced_lyrics(&artist, &title) else {
        return quarantine_file(path, quarantine, &format!("no lyrics for {} - {}", artist, title), false);
    };

    tags.set_synced_lyrics(&lyrics);
    match tags.save() {
        Ok(()) => FileOutcome::Succeeded(format!("lyrics added to {}", title)),
        Err(e) => FileOutcome::Failed(e.to_string()),
    }
}

fn quarantine_file(path: &Path, quarantine: &Path, reason: &str, missing_tags: bool) -> FileOutcome {
    match move_to_quarantine(path, quarantine) {
        Ok(_) => FileOutcome::Quarantined {
            reason: format!("{}, moved to '{}/'", reason, file_name(quarantine)),
            missing_tags,
        },
        Err(e) => FileOutcome::Failed(format!("{}, could not quarantine: {:#}", reason, e)),
    }
}
