//! Equipment Dataset Client Library
//!
//! Typed async HTTP client for the chemical equipment dataset service.
//! Every remote capability is one method on [`EquipmentClient`]; the
//! shared [`CredentialStore`] is read on every request and attached as an
//! `Authorization: Token <credential>` header when present.
//!
//! # Example
//!
//! ```rust,no_run
//! use chemviz_client::{CredentialStore, EquipmentClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chemviz_client::ApiError> {
//!     let credential = CredentialStore::new();
//!     let client = EquipmentClient::new("http://localhost:8000", credential.clone())?;
//!
//!     let auth = client.login("operator", "secret").await?;
//!     credential.set(auth.token);
//!
//!     let datasets = client.list_datasets().await?;
//!     println!("{} datasets", datasets.len());
//!     Ok(())
//! }
//! ```
//!
//! # Failure model
//!
//! Every method resolves to one of the [`ApiError`] variants; transport
//! failures are normalized, never rethrown in a transport-specific shape.
//! No retries happen here — retry policy belongs to the caller.
//!
//! # Testing
//!
//! The [`testing`] module starts an axum router on an ephemeral port and
//! hands back a connected client:
//!
//! ```rust,ignore
//! use chemviz_client::testing::TestServer;
//!
//! let server = TestServer::start(mock_router()).await?;
//! let datasets = server.client.list_datasets().await?;
//! ```

mod client;
mod credential;
mod error;
pub mod testing;
mod types;

pub use client::EquipmentClient;
pub use credential::CredentialStore;
pub use error::{ApiError, Result};
pub use types::{AuthResponse, LoginRequest, RegistrationRequest, UploadResponse};

// Re-export core models for convenience
pub use chemviz_core::models::{
    DatasetDetail, DatasetSummary, EquipmentRecord, GlobalStatistics, UserInfo,
};
