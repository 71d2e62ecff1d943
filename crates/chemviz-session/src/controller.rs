//! Session controller: sequences API calls and store mutations.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, instrument, warn};

use chemviz_client::{ApiError, CredentialStore, EquipmentClient, RegistrationRequest};
use chemviz_core::models::{StatusMessage, UserInfo};

use crate::store::SessionStore;

/// One authenticated dashboard session.
///
/// Owns the API client, the view-state store, and the credential slot.
/// Actions are async and may overlap freely; every failure is caught at
/// the action boundary and converted into a status message, so no action
/// panics or leaves partial state behind. An `Unauthorized` outcome on
/// any action runs the same unconditional local teardown as an explicit
/// logout.
pub struct DashboardSession {
    client: EquipmentClient,
    store: SessionStore,
    credential: CredentialStore,
    /// Monotonic ticket for detail requests; a response is applied only
    /// while its ticket is still the newest one issued.
    detail_epoch: AtomicU64,
}

impl DashboardSession {
    /// Create a session against the given service with an empty credential.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let credential = CredentialStore::new();
        let client = EquipmentClient::new(base_url, credential.clone())?;
        Ok(Self::with_client(client))
    }

    /// Create a session around an existing client (and its credential
    /// slot, possibly pre-loaded from persisted config).
    pub fn with_client(client: EquipmentClient) -> Self {
        let credential = client.credential().clone();
        Self {
            client,
            store: SessionStore::new(),
            credential,
            detail_epoch: AtomicU64::new(0),
        }
    }

    /// The view state exposed to the presentation layer.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn credential(&self) -> &CredentialStore {
        &self.credential
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_present()
    }

    // =========================================================================
    // Auth actions
    // =========================================================================

    /// Log in and commit the returned token to the credential slot.
    ///
    /// Errors propagate to the presentation layer; nothing in the store
    /// changes on failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<UserInfo, ApiError> {
        let auth = self.client.login(username, password).await?;
        self.credential.set(auth.token);
        info!(username = %auth.user.username, "logged in");
        Ok(auth.user)
    }

    /// Register a new account; on success the session is logged in.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegistrationRequest) -> Result<UserInfo, ApiError> {
        let auth = self.client.register(request).await?;
        self.credential.set(auth.token);
        info!(username = %auth.user.username, "registered");
        Ok(auth.user)
    }

    /// Log out. The server call is best-effort: local credential and view
    /// state are cleared regardless of its outcome, even offline.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(err) = self.client.logout().await {
            warn!(error = %err, "server-side logout failed, clearing local session anyway");
        }
        self.teardown();
    }

    /// Fetch the authenticated user's identity.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<UserInfo, ApiError> {
        match self.client.current_user().await {
            Ok(user) => Ok(user),
            Err(err) => {
                if err.is_unauthorized() {
                    self.teardown();
                }
                Err(err)
            }
        }
    }

    // =========================================================================
    // Dashboard actions
    // =========================================================================

    /// Initial load: dataset list and global statistics, fetched
    /// concurrently. Either fetch may fail without blocking the other;
    /// partial initialization is acceptable.
    #[instrument(skip(self))]
    pub async fn load_all(&self) {
        self.refresh().await;
    }

    /// Upload a CSV dataset, then re-fetch list and statistics.
    ///
    /// The refresh is issued only after the upload's success is observed.
    /// On failure the prior list, statistics, and selection are left
    /// untouched and the server-provided message (or a generic fallback)
    /// is surfaced.
    #[instrument(skip(self, contents))]
    pub async fn upload(&self, filename: &str, contents: Vec<u8>) {
        self.store.set_uploading(true);

        match self.client.upload_dataset(filename, contents).await {
            Ok(_) => {
                self.store.clear_status();
                self.refresh().await;
                self.store
                    .set_status(StatusMessage::success("File uploaded successfully!"));
            }
            Err(err) => {
                warn!(error = %err, "upload failed");
                if err.is_unauthorized() {
                    self.teardown();
                }
                let text = match &err {
                    ApiError::ValidationFailed(message) => message.clone(),
                    _ => "Error uploading file. Please try again.".to_string(),
                };
                self.store.set_status(StatusMessage::error(text));
            }
        }

        self.store.set_uploading(false);
    }

    /// Fetch the full detail for a dataset and make it the selection.
    ///
    /// A newer `view_detail` call supersedes an in-flight one: each
    /// request takes a ticket from the epoch counter, and a response is
    /// dropped when its ticket is no longer the newest. On failure the
    /// previous selection stays as it was.
    #[instrument(skip(self))]
    pub async fn view_detail(&self, dataset_id: i64) {
        let ticket = self.detail_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.set_detail_loading(true);

        let outcome = self.client.get_dataset(dataset_id).await;

        if self.detail_epoch.load(Ordering::SeqCst) != ticket {
            // A newer request owns the selection now; the still-loading
            // flag belongs to it as well.
            debug!(dataset_id, "dropping superseded detail response");
            return;
        }

        match outcome {
            Ok(detail) => self.store.select(detail),
            Err(err) => {
                warn!(error = %err, dataset_id, "loading dataset detail failed");
                if err.is_unauthorized() {
                    self.teardown();
                }
                self.store
                    .set_status(StatusMessage::error("Error loading dataset details."));
            }
        }

        self.store.set_detail_loading(false);
    }

    /// Delete a dataset. Confirmation is the presentation layer's job and
    /// must happen before this is called.
    ///
    /// On success the id leaves the list (clearing a matching selection in
    /// the same step), then list and statistics are re-fetched. On failure
    /// list and selection are untouched.
    #[instrument(skip(self))]
    pub async fn delete(&self, dataset_id: i64) {
        match self.client.delete_dataset(dataset_id).await {
            Ok(()) => {
                self.store.remove_dataset(dataset_id);
                self.store
                    .set_status(StatusMessage::success("Dataset deleted successfully!"));
                self.refresh().await;
            }
            Err(err) => {
                warn!(error = %err, dataset_id, "delete failed");
                if err.is_unauthorized() {
                    self.teardown();
                }
                self.store
                    .set_status(StatusMessage::error("Error deleting dataset."));
            }
        }
    }

    /// Fetch the PDF report and save it as `equipment_report_{id}.pdf`
    /// under `output_dir`. Touches no data slot beyond the status message.
    /// Single attempt; the user re-triggers manually on failure.
    #[instrument(skip(self, output_dir))]
    pub async fn generate_report(&self, dataset_id: i64, output_dir: &Path) -> Option<PathBuf> {
        let bytes = match self.client.generate_report(dataset_id).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(error = %err, dataset_id, "report download failed");
                if err.is_unauthorized() {
                    self.teardown();
                }
                self.store
                    .set_status(StatusMessage::error("Error generating report."));
                return None;
            }
        };

        let path = output_dir.join(format!("equipment_report_{dataset_id}.pdf"));
        match tokio::fs::write(&path, &bytes).await {
            Ok(()) => {
                info!(path = %path.display(), "report saved");
                self.store
                    .set_status(StatusMessage::success("Report generated successfully!"));
                Some(path)
            }
            Err(err) => {
                warn!(error = %err, path = %path.display(), "writing report failed");
                self.store
                    .set_status(StatusMessage::error("Error generating report."));
                None
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Re-fetch the dataset list and global statistics together, each
    /// updating only its own slot. Failures are logged independently and
    /// never block the other fetch.
    async fn refresh(&self) {
        let (datasets, statistics) =
            tokio::join!(self.client.list_datasets(), self.client.statistics());

        match datasets {
            Ok(list) => self.store.set_datasets(list),
            Err(err) => self.note_failure("loading datasets failed", &err),
        }
        match statistics {
            Ok(stats) => self.store.set_statistics(stats),
            Err(err) => self.note_failure("loading statistics failed", &err),
        }
    }

    /// Log a non-blocking fetch failure; an unauthorized outcome still
    /// forces the local logout.
    fn note_failure(&self, context: &'static str, err: &ApiError) {
        warn!(error = %err, "{context}");
        if err.is_unauthorized() {
            self.teardown();
        }
    }

    /// Unconditional local logout: clear the credential and every view
    /// slot. Never fails, needs no network.
    fn teardown(&self) {
        self.credential.clear();
        self.store.reset();
        info!("local session cleared");
    }
}
