//! Convert non-MP3 audio to MP3 next to the source, then delete the source.

use anyhow::Result;
use std::path::Path;
use tracing::warn;

use super::{drive, file_name, is_convertible, list_files};
use crate::config::CANONICAL_EXTENSION;
use crate::context::AppContext;
use crate::models::{FileOutcome, PassKind, PassResult};
use crate::safety::validate_conversion_output;

pub fn run(ctx: &AppContext, dir: &Path) -> Result<PassResult> {
    let files = list_files(dir, is_convertible)?;
    Ok(drive(ctx, PassKind::Convert, &files, |path, _| convert_file(ctx, path)))
}

fn convert_file(ctx: &AppContext, source: &Path) -> FileOutcome {
    let output = source.with_extension(CANONICAL_EXTENSION);
    if output.exists() {
        return FileOutcome::Skipped(format!("'{}' already exists", file_name(&output)));
    }

    if let Err(e) = ctx.transcoder.transcode(source, &output) {
        remove_partial(&output);
        return FileOutcome::Failed(e.to_string());
    }
    if let Err(e) = validate_conversion_output(source, &output) {
        remove_partial(&output);
        return FileOutcome::Failed(format!("{:#}", e));
    }
    match std::fs::remove_file(source) {
        Ok(()) => FileOutcome::Succeeded(format!("→ {}", file_name(&output))),
        Err(e) => FileOutcome::Failed(format!(
            "converted, but could not delete source: {}",
            e
        )),
    }
}

/// The output did not exist before the transcode, so anything there is partial.
fn remove_partial(output: &Path) {
    if output.exists() {
        if let Err(e) = std::fs::remove_file(output) {
            warn!(path = %output.display(), error = %e, "Failed to remove partial output");
        }
    }
}
