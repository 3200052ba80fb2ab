//! Core data models for the batch passes.
//!
//! Pass kinds, per-file outcomes and the per-pass counters that are
//! printed after each pass and then discarded.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Pass Kinds
// ============================================================================

/// Directory-wide passes that can be combined into a pipeline.
///
/// Declaration order is the canonical execution order: conversion first so
/// later passes see MP3s, renaming before tagging so the lookup passes see
/// final names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PassKind {
    Convert,
    Rename,
    EmbedLyrics,
    EmbedCover,
}

impl PassKind {
    pub const ALL: [PassKind; 4] = [
        PassKind::Convert,
        PassKind::Rename,
        PassKind::EmbedLyrics,
        PassKind::EmbedCover,
    ];

    /// Menu number of the pass (1-based).
    pub fn number(self) -> u8 {
        match self {
            PassKind::Convert => 1,
            PassKind::Rename => 2,
            PassKind::EmbedLyrics => 3,
            PassKind::EmbedCover => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        PassKind::ALL.into_iter().find(|p| p.number() == n)
    }

    /// Short label used on progress bars.
    pub fn label(self) -> &'static str {
        match self {
            PassKind::Convert => "Converting",
            PassKind::Rename => "Renaming",
            PassKind::EmbedLyrics => "Lyrics",
            PassKind::EmbedCover => "Covers",
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PassKind::Convert => "convert to MP3",
            PassKind::Rename => "rename",
            PassKind::EmbedLyrics => "embed lyrics",
            PassKind::EmbedCover => "embed cover art",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Per-file Outcomes
// ============================================================================

/// Result of processing one file. Expected outcomes such as "already
/// tagged" or "not found" are values here, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Succeeded(String),
    Skipped(String),
    Failed(String),
    /// Moved into the quarantine directory. `missing_tags` distinguishes
    /// "never queried" (counted as skipped) from "lookup missed" (failed).
    Quarantined { reason: String, missing_tags: bool },
}

// ============================================================================
// Pass Statistics
// ============================================================================

/// Per-pass counters.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassResult {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Subset of skipped + failed that ended up in quarantine
    pub quarantined: usize,
}

impl PassResult {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Succeeded(_) => self.succeeded += 1,
            FileOutcome::Skipped(_) => self.skipped += 1,
            FileOutcome::Failed(_) => self.failed += 1,
            FileOutcome::Quarantined { missing_tags, .. } => {
                self.quarantined += 1;
                if *missing_tags {
                    self.skipped += 1;
                } else {
                    self.failed += 1;
                }
            }
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} done, {} skipped, {} failed",
            self.succeeded, self.skipped, self.failed
        );
        if self.quarantined > 0 {
            line.push_str(&format!(" ({} moved to quarantine)", self.quarantined));
        }
        line
    }

    /// Log stats as JSON at debug level.
    pub fn log_phase(&self, phase: &str) {
        if let Ok(json) = serde_json::to_string(self) {
            tracing::debug!(phase, stats = %json, "pass finished");
        }
    }
}

// ============================================================================
// Download Models
// ============================================================================

/// What the external downloader produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedTrack {
    pub path: PathBuf,
    pub title: String,
    pub uploader: Option<String>,
}

/// Final state of a downloaded file after cleanup and tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub path: PathBuf,
    pub artist: String,
    pub title: String,
}
