//! Combined execution of several passes over one directory.
//!
//! Any selection is normalized to the fixed order Convert → Rename →
//! EmbedLyrics → EmbedCover. Each pass re-lists the directory, so later
//! passes see the files earlier passes produced, renamed or quarantined.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info};

use crate::context::AppContext;
use crate::models::{PassKind, PassResult};
use crate::passes::run_pass;

pub struct Pipeline {
    dir: PathBuf,
    passes: Vec<PassKind>,
}

/// Outcome of one pass inside a pipeline run.
#[derive(Debug)]
pub struct PassRun {
    pub kind: PassKind,
    pub outcome: Result<PassResult>,
}

#[derive(Debug, Default)]
pub struct PipelineReport {
    pub runs: Vec<PassRun>,
}

impl PipelineReport {
    /// Passes that aborted before processing files (directory unreadable).
    pub fn aborted(&self) -> usize {
        self.runs.iter().filter(|r| r.outcome.is_err()).count()
    }
}

impl Pipeline {
    pub fn new(dir: impl Into<PathBuf>, selection: &[PassKind]) -> Self {
        let mut passes = selection.to_vec();
        passes.sort();
        passes.dedup();
        Self {
            dir: dir.into(),
            passes,
        }
    }

    pub fn passes(&self) -> &[PassKind] {
        &self.passes
    }

    /// Run every pass in order. A pass that fails to start is recorded and
    /// the next pass still runs.
    pub fn run(&self, ctx: &AppContext) -> PipelineReport {
        let mut report = PipelineReport::default();
        for &kind in &self.passes {
            info!(pass = %kind, dir = %self.dir.display(), "Starting pass");
            let outcome = run_pass(ctx, kind, &self.dir);
            if let Err(e) = &outcome {
                error!(pass = %kind, "{:#}", e);
            }
            report.runs.push(PassRun { kind, outcome });
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TrackTags;
    use crate::testing::{file_names, write_mp3, Fixture, TestContext};

    #[test]
    fn test_selection_is_normalized() {
        let a = Pipeline::new("/m", &[PassKind::EmbedLyrics, PassKind::Convert]);
        let b = Pipeline::new("/m", &[PassKind::Convert, PassKind::EmbedLyrics]);
        assert_eq!(a.passes(), b.passes());
        assert_eq!(a.passes(), &[PassKind::Convert, PassKind::EmbedLyrics]);

        let all = Pipeline::new(
            "/m",
            &[
                PassKind::EmbedCover,
                PassKind::Rename,
                PassKind::EmbedCover,
                PassKind::Convert,
                PassKind::EmbedLyrics,
            ],
        );
        assert_eq!(all.passes(), &PassKind::ALL);
    }

    fn convert_then_lyrics_end_state(selection: &[PassKind]) -> Vec<String> {
        let dir = tempfile::tempdir().unwrap();
        // The fake transcoder copies bytes, so the tagged source stays tagged
        write_mp3(dir.path(), "track.mp3", &Fixture::tagged("Pink Floyd", "Time"));
        std::fs::rename(dir.path().join("track.mp3"), dir.path().join("track.flac")).unwrap();
        let ctx = TestContext {
            lyrics: Some("[00:01.00] la".to_string()),
            ..TestContext::default()
        }
        .build();

        let report = Pipeline::new(dir.path(), selection).run(&ctx);
        assert_eq!(report.aborted(), 0);

        let path = dir.path().join("track.mp3");
        assert!(TrackTags::load(&path).unwrap().has_synced_lyrics());
        file_names(dir.path())
    }

    #[test]
    fn test_selection_order_does_not_change_end_state() {
        let a = convert_then_lyrics_end_state(&[PassKind::EmbedLyrics, PassKind::Convert]);
        let b = convert_then_lyrics_end_state(&[PassKind::Convert, PassKind::EmbedLyrics]);
        assert_eq!(a, b);
        assert_eq!(a, vec!["track.mp3"]);
    }

    #[test]
    fn test_later_passes_see_renamed_files() {
        let dir = tempfile::tempdir().unwrap();
        write_mp3(dir.path(), "01.mp3", &Fixture::tagged("Pink Floyd", "Time"));
        write_mp3(dir.path(), "02.mp3", &Fixture::tagged("Nobody", "Nothing"));
        let fakes = TestContext::default();
        let ctx = fakes.build();

        let report = Pipeline::new(dir.path(), &[PassKind::EmbedLyrics, PassKind::Rename]).run(&ctx);

        let kinds: Vec<PassKind> = report.runs.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![PassKind::Rename, PassKind::EmbedLyrics]);
        assert_eq!(
            *fakes.lyrics_calls.borrow(),
            vec!["Nobody - Nothing", "Pink Floyd - Time"]
        );
        assert_eq!(
            file_names(&dir.path().join("sin letras")),
            vec!["Nobody - Nothing.mp3", "Pink Floyd - Time.mp3"]
        );
    }

    #[test]
    fn test_unreadable_directory_aborts_each_pass_but_not_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = TestContext::default().build();

        let report = Pipeline::new(dir.path().join("gone"), &[PassKind::Rename, PassKind::EmbedCover]).run(&ctx);

        assert_eq!(report.runs.len(), 2);
        assert_eq!(report.aborted(), 2);
    }
}
