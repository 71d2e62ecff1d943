//! In-memory view state for one dashboard session.

use std::sync::Arc;

use parking_lot::RwLock;

use chemviz_core::models::{DatasetDetail, DatasetSummary, GlobalStatistics, StatusMessage};

#[derive(Debug, Default)]
struct SessionState {
    datasets: Vec<DatasetSummary>,
    statistics: Option<GlobalStatistics>,
    selection: Option<DatasetDetail>,
    status: Option<StatusMessage>,
    detail_loading: bool,
    uploading: bool,
}

/// Holds the four view-state slots plus the two busy flags.
///
/// Every mutation takes one write lock, so each operation is atomic from
/// a caller's point of view; overlapping async writers resolve
/// last-write-wins per slot. The store performs no I/O — it stores
/// whatever the controller hands it. Reads return cloned snapshots.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -- mutations ---------------------------------------------------------

    pub fn set_datasets(&self, datasets: Vec<DatasetSummary>) {
        self.inner.write().datasets = datasets;
    }

    pub fn set_statistics(&self, statistics: GlobalStatistics) {
        self.inner.write().statistics = Some(statistics);
    }

    pub fn set_status(&self, status: StatusMessage) {
        self.inner.write().status = Some(status);
    }

    pub fn clear_status(&self) {
        self.inner.write().status = None;
    }

    /// Replace the selection wholesale.
    pub fn select(&self, detail: DatasetDetail) {
        self.inner.write().selection = Some(detail);
    }

    pub fn clear_selection(&self) {
        self.inner.write().selection = None;
    }

    /// Drop a dataset from the list; clears the selection in the same
    /// write when it pointed at the removed id, so no dangling reference
    /// is ever observable.
    pub fn remove_dataset(&self, dataset_id: i64) {
        let mut state = self.inner.write();
        state.datasets.retain(|d| d.id != dataset_id);
        if state
            .selection
            .as_ref()
            .is_some_and(|detail| detail.id() == dataset_id)
        {
            state.selection = None;
        }
    }

    pub fn set_detail_loading(&self, loading: bool) {
        self.inner.write().detail_loading = loading;
    }

    pub fn set_uploading(&self, uploading: bool) {
        self.inner.write().uploading = uploading;
    }

    /// Clear every slot. Used by logout teardown.
    pub fn reset(&self) {
        *self.inner.write() = SessionState::default();
    }

    // -- snapshots ---------------------------------------------------------

    pub fn datasets(&self) -> Vec<DatasetSummary> {
        self.inner.read().datasets.clone()
    }

    pub fn statistics(&self) -> Option<GlobalStatistics> {
        self.inner.read().statistics.clone()
    }

    pub fn selection(&self) -> Option<DatasetDetail> {
        self.inner.read().selection.clone()
    }

    pub fn status(&self) -> Option<StatusMessage> {
        self.inner.read().status.clone()
    }

    pub fn is_detail_loading(&self) -> bool {
        self.inner.read().detail_loading
    }

    pub fn is_uploading(&self) -> bool {
        self.inner.read().uploading
    }
}
