//! Safety checks guarding every destructive filesystem step.
//!
//! Renames and quarantine moves never overwrite; a conversion source is
//! only deleted once a plausible output exists next to it.

use anyhow::{bail, Result};
use std::path::Path;

/// Validates that `source` may be renamed/moved to `target`.
///
/// Checks:
/// - Source and target must differ
/// - Target must not already exist
pub fn validate_move_target(source: &Path, target: &Path) -> Result<()> {
    if source == target {
        bail!(
            "Safety check failed: '{}' is already at its target name",
            source.display()
        );
    }
    if target.exists() {
        bail!(
            "Safety check failed: '{}' already exists, refusing to overwrite",
            target.display()
        );
    }
    Ok(())
}

/// Validates that a conversion produced a usable output so the source can
/// be deleted.
///
/// Checks:
/// - Output cannot be the same path as the source
/// - Output must exist and be non-empty
pub fn validate_conversion_output(source: &Path, output: &Path) -> Result<()> {
    if source == output {
        bail!(
            "Safety check failed: output '{}' cannot be the same as source",
            output.display()
        );
    }
    let len = match std::fs::metadata(output) {
        Ok(meta) if meta.is_file() => meta.len(),
        _ => bail!(
            "Safety check failed: output '{}' was not created",
            output.display()
        ),
    };
    if len == 0 {
        bail!(
            "Safety check failed: output '{}' is empty",
            output.display()
        );
    }
    Ok(())
}
