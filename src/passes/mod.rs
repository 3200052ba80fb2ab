//! Directory-wide batch passes.
//!
//! Every pass enumerates the directory afresh, processes each file to
//! completion before the next, and turns every per-file problem into a
//! [`FileOutcome`]. Only a failure to list the directory aborts a pass.

pub mod convert;
pub mod cover;
pub mod download;
pub mod lyrics;
pub mod rename;

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use crate::config::CANONICAL_EXTENSION;
use crate::context::AppContext;
use crate::models::{FileOutcome, PassKind, PassResult};
use crate::progress::{create_progress_bar, format_duration, log_progress, report_line};
use crate::safety::validate_move_target;

/// Audio containers the convert pass recognizes as input.
pub const CONVERTIBLE_EXTENSIONS: &[&str] = &[
    "flac", "wav", "m4a", "aac", "ogg", "oga", "opus", "wma", "aiff", "aif", "alac", "webm",
];

/// Log-only progress line interval.
const LOG_INTERVAL: u64 = 25;

/// Run one pass over `dir`.
pub fn run_pass(ctx: &AppContext, kind: PassKind, dir: &Path) -> Result<PassResult> {
    match kind {
        PassKind::Convert => convert::run(ctx, dir),
        PassKind::Rename => rename::run(ctx, dir),
        PassKind::EmbedLyrics => lyrics::run(ctx, dir),
        PassKind::EmbedCover => cover::run(ctx, dir),
    }
}

/// Lowercased extension of `path`, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn is_canonical(path: &Path) -> bool {
    extension_of(path).as_deref() == Some(CANONICAL_EXTENSION)
}

pub fn is_convertible(path: &Path) -> bool {
    extension_of(path).is_some_and(|e| CONVERTIBLE_EXTENSIONS.contains(&e.as_str()))
}

/// Regular files directly under `dir` matching `filter`, sorted by name.
/// Subdirectories (including quarantine) are never listed.
pub fn list_files(dir: &Path, filter: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory '{}'", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if path.is_file() && filter(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Move `path` into `quarantine`, creating it on demand. Never overwrites.
pub fn move_to_quarantine(path: &Path, quarantine: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(quarantine)
        .with_context(|| format!("Failed to create '{}'", quarantine.display()))?;
    let target = quarantine.join(path.file_name().unwrap_or_default());
    validate_move_target(path, &target)?;
    std::fs::rename(path, &target)
        .with_context(|| format!("Failed to move '{}'", path.display()))?;
    Ok(target)
}

/// Colored one-line report for a processed file.
pub fn format_outcome(name: &str, outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::Succeeded(d) => format!("{} {}: {}", "✔".green(), name, d),
        FileOutcome::Skipped(d) => format!("{} {}: {}", "→".blue(), name, d.as_str().dim()),
        FileOutcome::Failed(d) => format!("{} {}: {}", "✘".red(), name, d),
        FileOutcome::Quarantined { reason, .. } => {
            format!("{} {}: {}", "⚠".yellow(), name, reason)
        }
    }
}

/// Shared driver: progress bar, per-file processing, counters, summary.
pub fn drive<F>(ctx: &AppContext, kind: PassKind, files: &[PathBuf], mut process: F) -> PassResult
where
    F: FnMut(&Path, &ProgressBar) -> FileOutcome,
{
    let mut result = PassResult::default();
    if files.is_empty() {
        println!("{}", "No eligible files found.".yellow());
        return result;
    }

    let start = Instant::now();
    let total = files.len() as u64;
    let pb = create_progress_bar(total, kind.label(), ctx.log_only());
    for (i, path) in files.iter().enumerate() {
        let outcome = process(path, &pb);
        report_line(&pb, &format_outcome(&file_name(path), &outcome));
        result.record(&outcome);
        pb.inc(1);
        log_progress(kind.label(), i as u64 + 1, total, LOG_INTERVAL, ctx.log_only());
    }
    pb.finish_with_message(format!("{}: {}", kind.label(), result.summary()));

    info!(pass = %kind, elapsed = %format_duration(start.elapsed()), "{}", result.summary());
    result.log_phase(kind.label());
    result
}
