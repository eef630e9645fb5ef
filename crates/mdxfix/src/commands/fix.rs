//! Rewrite documents in place.

use std::path::Path;

use anyhow::Result;

use super::{run_batch, RunArgs};

/// Run the fix command.
pub fn run(config_path: &Path, args: &RunArgs, no_backup: bool) -> Result<()> {
    tracing::info!("Fixing documents...");

    let report = run_batch(config_path, args, false, |config| {
        config.output.backup && !no_backup
    })?;

    if report.stats.ambiguous_braces > 0 {
        tracing::info!(
            "Left {} brace expressions that look like code; fence them if they are",
            report.stats.ambiguous_braces
        );
    }

    Ok(())
}
