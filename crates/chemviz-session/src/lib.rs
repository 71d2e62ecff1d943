//! Dashboard session layer.
//!
//! [`SessionStore`] holds the view state the presentation layer renders
//! (dataset list, selected detail, global statistics, status message);
//! [`DashboardSession`] sequences API calls against that state and is the
//! only place mutations are decided. All actions are async and safe to
//! overlap; the store resolves concurrent writes last-write-wins per slot,
//! and superseded detail requests are discarded by the controller.

mod controller;
mod store;

pub use controller::DashboardSession;
pub use store::SessionStore;

// Re-exports the presentation layer needs alongside the session
pub use chemviz_client::{ApiError, CredentialStore, EquipmentClient, RegistrationRequest};
pub use chemviz_core::models::{
    DatasetDetail, DatasetSummary, GlobalStatistics, StatusKind, StatusMessage, UserInfo,
};
