//! Dataset commands - upload, list, show, delete

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chemviz_core::aggregate::{self, SERIES_LIMIT};
use chemviz_session::DashboardSession;

use crate::commands::{spinner, status_outcome};
use crate::output::{fixed1, DatasetRow, EquipmentRow, OutputContext, SeriesRow, TypeCountRow};

/// Upload a CSV dataset. The CSV extension is checked here, before any
/// request goes out; the server validates the contents again.
pub async fn upload(session: &DashboardSession, ctx: &OutputContext, file: &Path) -> Result<()> {
    let is_csv = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        anyhow::bail!("Only CSV files are allowed: {}", file.display());
    }

    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .context("File name is not valid UTF-8")?
        .to_string();
    let contents =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let pb = spinner("Uploading dataset...");
    session.upload(&filename, contents).await;
    pb.finish_and_clear();

    status_outcome(session, ctx)?;

    if let Some(stats) = session.store().statistics() {
        ctx.info(&format!(
            "{} datasets, {} equipment records total",
            stats.total_datasets, stats.total_equipment
        ));
    }
    Ok(())
}

/// List the most recent datasets (the server keeps five per user).
pub async fn list(session: &DashboardSession, ctx: &OutputContext) -> Result<()> {
    session.load_all().await;

    let rows: Vec<DatasetRow> = session
        .store()
        .datasets()
        .into_iter()
        .map(|d| DatasetRow {
            id: d.id,
            filename: d.filename,
            uploaded: d.upload_date.format("%Y-%m-%d %H:%M").to_string(),
            equipment: d.total_equipment,
            avg_flowrate: fixed1(d.avg_flowrate),
            avg_pressure: fixed1(d.avg_pressure),
            avg_temperature: fixed1(d.avg_temperature),
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}

/// Show one dataset: summary, chart aggregates, and the equipment list.
pub async fn show(session: &DashboardSession, ctx: &OutputContext, dataset_id: i64) -> Result<()> {
    session.view_detail(dataset_id).await;

    let detail = session
        .store()
        .selection()
        .filter(|d| d.id() == dataset_id)
        .ok_or_else(|| {
            let text = session
                .store()
                .status()
                .map(|s| s.text)
                .unwrap_or_else(|| "Error loading dataset details.".to_string());
            anyhow::anyhow!(text)
        })?;

    ctx.print_kv(&[
        ("Dataset", detail.dataset.filename.clone()),
        (
            "Uploaded",
            detail.dataset.upload_date.format("%Y-%m-%d %H:%M").to_string(),
        ),
        ("Equipment", detail.dataset.total_equipment.to_string()),
    ]);

    if let Some(dist) = aggregate::type_distribution(&detail) {
        ctx.heading("Equipment Type Distribution");
        let rows: Vec<TypeCountRow> = dist
            .labels
            .iter()
            .zip(&dist.counts)
            .map(|(label, count)| TypeCountRow {
                equipment_type: label.clone(),
                count: *count,
            })
            .collect();
        ctx.print(&rows);
    }

    let averages = aggregate::averages_series(&detail);
    ctx.heading("Average Parameters");
    ctx.print_kv(&[
        ("Flowrate", fixed1(averages.flowrate)),
        ("Pressure", fixed1(averages.pressure)),
        ("Temperature", fixed1(averages.temperature)),
    ]);

    if let Some(series) = aggregate::parameter_series(&detail, SERIES_LIMIT) {
        ctx.heading("Parameter Comparison (First 10 Equipment)");
        let rows: Vec<SeriesRow> = (0..series.labels.len())
            .map(|i| SeriesRow {
                label: series.labels[i].clone(),
                flowrate: fixed1(series.flowrate[i]),
                pressure: fixed1(series.pressure[i]),
                temperature: fixed1(series.temperature[i]),
            })
            .collect();
        ctx.print(&rows);
    }

    ctx.heading("Equipment List");
    let rows: Vec<EquipmentRow> = detail
        .dataset
        .equipment
        .iter()
        .map(|record| EquipmentRow {
            name: record.equipment_name.clone(),
            equipment_type: record.equipment_type.clone(),
            flowrate: fixed1(record.flowrate),
            pressure: fixed1(record.pressure),
            temperature: fixed1(record.temperature),
        })
        .collect();
    ctx.print(&rows);

    Ok(())
}

/// Delete a dataset after explicit confirmation.
pub async fn delete(
    session: &DashboardSession,
    ctx: &OutputContext,
    dataset_id: i64,
    yes: bool,
) -> Result<()> {
    if !yes && !confirm(&format!("Are you sure you want to delete dataset {dataset_id}?"))? {
        ctx.info("Aborted.");
        return Ok(());
    }

    session.delete(dataset_id).await;
    status_outcome(session, ctx)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "YES"))
}
