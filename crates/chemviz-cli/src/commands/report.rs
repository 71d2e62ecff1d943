//! Report command - download the PDF report for a dataset

use std::path::Path;

use anyhow::{Context, Result};
use chemviz_session::DashboardSession;

use crate::commands::spinner;
use crate::output::OutputContext;

/// Fetch and save `equipment_report_{id}.pdf`. Single attempt; re-run the
/// command to retry.
pub async fn report(
    session: &DashboardSession,
    ctx: &OutputContext,
    dataset_id: i64,
    out_dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output dir: {}", out_dir.display()))?;

    let pb = spinner("Generating report...");
    let saved = session.generate_report(dataset_id, out_dir).await;
    pb.finish_and_clear();

    match saved {
        Some(path) => {
            ctx.success(&format!("Report saved to {}", path.display()));
            Ok(())
        }
        None => {
            let text = session
                .store()
                .status()
                .map(|s| s.text)
                .unwrap_or_else(|| "Error generating report.".to_string());
            anyhow::bail!(text)
        }
    }
}
