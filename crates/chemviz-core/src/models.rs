//! Wire models for the equipment dataset service.
//!
//! Field names match the server's JSON exactly; summary statistics are
//! computed server-side at upload time and are never recomputed here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user identity returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// One uploaded dataset as it appears in the dataset list.
///
/// The server keeps only the most recent five datasets per user; the
/// client lists and removes entries but never re-sorts or re-filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub id: i64,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub total_equipment: i64,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    #[serde(default)]
    pub username: Option<String>,
}

/// One row of measured parameters for a named piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub equipment_name: String,
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// Summary fields plus the full equipment sequence, in server order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetContents {
    pub id: i64,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub total_equipment: i64,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub equipment: Vec<EquipmentRecord>,
}

/// Full dataset detail as returned by `GET datasets/{id}/`.
///
/// Held wholesale by the session store while selected; replaced on each
/// view, never partially mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDetail {
    pub dataset: DatasetContents,
    /// Server-computed counts per equipment type. Chart labels are derived
    /// from the record sequence instead (see [`crate::aggregate`]), so the
    /// map's key order is irrelevant here.
    #[serde(default)]
    pub type_distribution: HashMap<String, u64>,
}

impl DatasetDetail {
    pub fn id(&self) -> i64 {
        self.dataset.id
    }
}

/// Coarse per-user statistics, refreshed after every mutating operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalStatistics {
    pub total_datasets: i64,
    pub total_equipment: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Outcome class of a [`StatusMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

/// Transient single-slot status line; each new outcome overwrites the last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dataset_detail_deserializes_server_shape() {
        let body = r#"{
            "dataset": {
                "id": 7,
                "filename": "plant_a.csv",
                "upload_date": "2026-01-12T09:30:00Z",
                "total_equipment": 2,
                "avg_flowrate": 8.65,
                "avg_pressure": 3.1,
                "avg_temperature": 120.0,
                "username": "operator",
                "equipment": [
                    {"id": 1, "equipment_name": "Pump-001", "equipment_type": "Pump",
                     "flowrate": 12.3, "pressure": 2.2, "temperature": 90.0},
                    {"id": 2, "equipment_name": "Valve-002", "equipment_type": "Valve",
                     "flowrate": 5.0, "pressure": 4.0, "temperature": 150.0}
                ]
            },
            "type_distribution": {"Pump": 1, "Valve": 1}
        }"#;

        let detail: DatasetDetail = serde_json::from_str(body).unwrap();
        assert_eq!(detail.id(), 7);
        assert_eq!(detail.dataset.equipment.len(), 2);
        assert_eq!(detail.type_distribution.get("Pump"), Some(&1));
    }

    #[test]
    fn summary_tolerates_missing_username() {
        let body = r#"{
            "id": 1, "filename": "a.csv", "upload_date": "2026-01-12T09:30:00Z",
            "total_equipment": 0, "avg_flowrate": 0.0, "avg_pressure": 0.0,
            "avg_temperature": 0.0
        }"#;
        let summary: DatasetSummary = serde_json::from_str(body).unwrap();
        assert_eq!(summary.username, None);
    }

    #[test]
    fn status_message_constructors() {
        assert!(StatusMessage::error("boom").is_error());
        assert!(!StatusMessage::success("ok").is_error());
    }
}
