//! Check documents without writing.

use std::path::Path;

use anyhow::Result;

use super::{run_batch, RunArgs};

/// Run the check command. Fails when any document would be rewritten.
pub fn run(config_path: &Path, args: &RunArgs) -> Result<()> {
    let report = run_batch(config_path, args, true, |_| false)?;

    if report.changed > 0 {
        anyhow::bail!(
            "{} of {} files need fixing. Run 'mdxfix fix' to update them.",
            report.changed,
            report.scanned
        );
    }

    tracing::info!("All {} files are up to date", report.scanned);
    Ok(())
}
