//! Stats command - global per-user statistics

use anyhow::{Context, Result};
use chemviz_session::DashboardSession;

use crate::output::OutputContext;

pub async fn stats(session: &DashboardSession, ctx: &OutputContext) -> Result<()> {
    session.load_all().await;

    let stats = session
        .store()
        .statistics()
        .context("Could not load statistics")?;

    ctx.print_kv(&[
        ("Total Datasets", stats.total_datasets.to_string()),
        ("Total Equipment", stats.total_equipment.to_string()),
    ]);
    Ok(())
}
