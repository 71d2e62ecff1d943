//! Output formatting for the chemviz CLI (table, json).

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    Table,
    /// JSON format
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print data in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Table => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    let table = Table::new(data).to_string();
                    println!("{}", table);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
                );
            }
        }
    }

    /// Print key-value pairs (summary blocks)
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
    }

    /// Print a section heading (table mode only)
    pub fn heading(&self, title: &str) {
        if self.format == OutputFormat::Table && !self.quiet {
            println!("\n{}", title.bold());
        }
    }
}

// =============================================================================
// Row types
// =============================================================================

/// One dataset in the list view
#[derive(Tabled, Serialize)]
pub struct DatasetRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Filename")]
    pub filename: String,
    #[tabled(rename = "Uploaded")]
    pub uploaded: String,
    #[tabled(rename = "Equipment")]
    pub equipment: i64,
    #[tabled(rename = "Avg Flowrate")]
    pub avg_flowrate: String,
    #[tabled(rename = "Avg Pressure")]
    pub avg_pressure: String,
    #[tabled(rename = "Avg Temp")]
    pub avg_temperature: String,
}

/// One equipment record in the detail view
#[derive(Tabled, Serialize)]
pub struct EquipmentRow {
    #[tabled(rename = "Equipment Name")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub equipment_type: String,
    #[tabled(rename = "Flowrate")]
    pub flowrate: String,
    #[tabled(rename = "Pressure")]
    pub pressure: String,
    #[tabled(rename = "Temperature")]
    pub temperature: String,
}

/// One slice of the type distribution
#[derive(Tabled, Serialize)]
pub struct TypeCountRow {
    #[tabled(rename = "Equipment Type")]
    pub equipment_type: String,
    #[tabled(rename = "Count")]
    pub count: u64,
}

/// One point of the parameter comparison series
#[derive(Tabled, Serialize)]
pub struct SeriesRow {
    #[tabled(rename = "Equipment")]
    pub label: String,
    #[tabled(rename = "Flowrate")]
    pub flowrate: String,
    #[tabled(rename = "Pressure")]
    pub pressure: String,
    #[tabled(rename = "Temperature")]
    pub temperature: String,
}

/// Fixed-width numeric rendering used across the dashboard tables.
pub fn fixed1(value: f64) -> String {
    format!("{value:.1}")
}
