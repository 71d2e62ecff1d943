//! Chart aggregation over a [`DatasetDetail`].
//!
//! Pure functions: no I/O, no mutation, deterministic for a given detail.
//! An empty record list yields `None` rather than an error; missing data
//! is not a failure at this layer.

use serde::Serialize;

use crate::models::DatasetDetail;

/// Default number of records carried into [`parameter_series`].
pub const SERIES_LIMIT: usize = 10;

/// Display names are cut to this many characters for chart labels.
pub const LABEL_MAX_CHARS: usize = 15;

/// Equipment counts per type, labels in first-encounter order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDistribution {
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
}

impl TypeDistribution {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Three parallel parameter series, index-aligned with `labels`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSeries {
    pub labels: Vec<String>,
    pub flowrate: Vec<f64>,
    pub pressure: Vec<f64>,
    pub temperature: Vec<f64>,
}

/// The server-computed averages carried by the dataset summary fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragesSeries {
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// Count equipment records by type.
///
/// Label order is the order each type is first encountered in the record
/// sequence, not sorted order; this reproduces the server's own ordering
/// for chart labels. Returns `None` when the detail carries no records.
pub fn type_distribution(detail: &DatasetDetail) -> Option<TypeDistribution> {
    let equipment = &detail.dataset.equipment;
    if equipment.is_empty() {
        return None;
    }

    let mut labels: Vec<String> = Vec::new();
    let mut counts: Vec<u64> = Vec::new();
    for record in equipment {
        match labels.iter().position(|label| *label == record.equipment_type) {
            Some(index) => counts[index] += 1,
            None => {
                labels.push(record.equipment_type.clone());
                counts.push(1);
            }
        }
    }

    Some(TypeDistribution { labels, counts })
}

/// Build the per-equipment comparison series for the first `limit` records.
///
/// Records are taken in existing order (no sampling, no sorting) and each
/// display name is truncated to [`LABEL_MAX_CHARS`] characters; downstream
/// chart labels assume that width. Returns `None` when the detail carries
/// no records.
pub fn parameter_series(detail: &DatasetDetail, limit: usize) -> Option<ParameterSeries> {
    let equipment = &detail.dataset.equipment;
    if equipment.is_empty() {
        return None;
    }

    let taken = equipment.iter().take(limit);
    let mut series = ParameterSeries {
        labels: Vec::new(),
        flowrate: Vec::new(),
        pressure: Vec::new(),
        temperature: Vec::new(),
    };
    for record in taken {
        series
            .labels
            .push(record.equipment_name.chars().take(LABEL_MAX_CHARS).collect());
        series.flowrate.push(record.flowrate);
        series.pressure.push(record.pressure);
        series.temperature.push(record.temperature);
    }

    Some(series)
}

/// The three precomputed averages from the summary fields.
///
/// Never recomputed from raw records: the server's values are trusted to
/// avoid float drift between client and server.
pub fn averages_series(detail: &DatasetDetail) -> AveragesSeries {
    AveragesSeries {
        flowrate: detail.dataset.avg_flowrate,
        pressure: detail.dataset.avg_pressure,
        temperature: detail.dataset.avg_temperature,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{DatasetContents, EquipmentRecord};

    fn record(name: &str, kind: &str, flowrate: f64) -> EquipmentRecord {
        EquipmentRecord {
            id: None,
            equipment_name: name.to_string(),
            equipment_type: kind.to_string(),
            flowrate,
            pressure: flowrate * 0.5,
            temperature: flowrate * 10.0,
        }
    }

    fn detail(equipment: Vec<EquipmentRecord>) -> DatasetDetail {
        DatasetDetail {
            dataset: DatasetContents {
                id: 1,
                filename: "plant.csv".to_string(),
                upload_date: Utc.with_ymd_and_hms(2026, 1, 12, 9, 30, 0).unwrap(),
                total_equipment: equipment.len() as i64,
                avg_flowrate: 8.47,
                avg_pressure: 4.23,
                avg_temperature: 84.7,
                username: None,
                equipment,
            },
            type_distribution: HashMap::new(),
        }
    }

    #[test]
    fn distribution_counts_in_encounter_order() {
        let d = detail(vec![
            record("Pump-001", "Pump", 12.3),
            record("Valve-002", "Valve", 5.0),
            record("Pump-003", "Pump", 8.1),
        ]);

        let dist = type_distribution(&d).unwrap();
        assert_eq!(dist.labels, vec!["Pump", "Valve"]);
        assert_eq!(dist.counts, vec![2, 1]);
    }

    #[test]
    fn distribution_counts_sum_to_record_count() {
        let d = detail(vec![
            record("a", "Pump", 1.0),
            record("b", "Reactor", 2.0),
            record("c", "Pump", 3.0),
            record("d", "Exchanger", 4.0),
            record("e", "Reactor", 5.0),
        ]);

        let dist = type_distribution(&d).unwrap();
        assert_eq!(dist.total(), d.dataset.equipment.len() as u64);
    }

    #[test]
    fn distribution_absent_for_empty_detail() {
        assert_eq!(type_distribution(&detail(Vec::new())), None);
    }

    #[test]
    fn series_respects_limit_and_alignment() {
        let records: Vec<_> = (0..25)
            .map(|i| record(&format!("Unit-{i:03}"), "Pump", i as f64))
            .collect();
        let d = detail(records);

        let series = parameter_series(&d, SERIES_LIMIT).unwrap();
        assert_eq!(series.labels.len(), 10);
        assert_eq!(series.flowrate.len(), 10);
        assert_eq!(series.pressure.len(), 10);
        assert_eq!(series.temperature.len(), 10);
        // index-aligned with record order
        assert_eq!(series.labels[3], "Unit-003");
        assert_eq!(series.flowrate[3], 3.0);
    }

    #[test]
    fn series_shorter_than_limit_keeps_all_records() {
        let d = detail(vec![record("a", "Pump", 1.0), record("b", "Valve", 2.0)]);
        let series = parameter_series(&d, SERIES_LIMIT).unwrap();
        assert_eq!(series.labels.len(), 2);
    }

    #[test]
    fn series_truncates_labels_to_fifteen_chars() {
        let d = detail(vec![record(
            "Heat-Exchanger-Unit-Alpha-01",
            "Exchanger",
            1.0,
        )]);
        let series = parameter_series(&d, SERIES_LIMIT).unwrap();
        assert_eq!(series.labels[0], "Heat-Exchanger-");
        assert_eq!(series.labels[0].chars().count(), LABEL_MAX_CHARS);
    }

    #[test]
    fn series_truncation_is_char_boundary_safe() {
        let d = detail(vec![record("Wärmetauscher-Einheit-β", "Exchanger", 1.0)]);
        let series = parameter_series(&d, SERIES_LIMIT).unwrap();
        assert_eq!(series.labels[0].chars().count(), LABEL_MAX_CHARS);
    }

    #[test]
    fn series_is_idempotent_and_leaves_input_untouched() {
        let d = detail(vec![
            record("Pump-001", "Pump", 12.3),
            record("Valve-002", "Valve", 5.0),
        ]);
        let before = d.dataset.equipment.clone();

        let first = parameter_series(&d, SERIES_LIMIT).unwrap();
        let second = parameter_series(&d, SERIES_LIMIT).unwrap();
        assert_eq!(first, second);
        assert_eq!(d.dataset.equipment, before);
    }

    #[test]
    fn averages_come_from_summary_fields() {
        // Record values deliberately disagree with the carried averages;
        // the carried averages must win.
        let d = detail(vec![record("a", "Pump", 999.0)]);
        let averages = averages_series(&d);
        assert_eq!(averages.flowrate, 8.47);
        assert_eq!(averages.pressure, 4.23);
        assert_eq!(averages.temperature, 84.7);
    }
}
