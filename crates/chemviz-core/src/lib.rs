//! Core types for the chemical equipment dashboard client.
//!
//! This crate holds the wire models shared by the API client and the
//! session layer, plus the pure aggregation functions that turn a
//! [`DatasetDetail`] into chart-ready series. Nothing here performs I/O.

pub mod aggregate;
pub mod models;

pub use models::{
    DatasetContents, DatasetDetail, DatasetSummary, EquipmentRecord, GlobalStatistics,
    StatusKind, StatusMessage, UserInfo,
};
