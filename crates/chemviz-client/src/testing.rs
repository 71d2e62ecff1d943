//! Test utilities for chemviz-client.
//!
//! Spins an axum router up on an ephemeral port and hands back a client
//! wired to it, so integration tests exercise the real HTTP path.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::{CredentialStore, EquipmentClient, Result};

/// An in-process test server; shuts down when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: EquipmentClient,
    pub credential: CredentialStore,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Bind the router to an ephemeral port and connect a client to it.
    ///
    /// ```ignore
    /// use chemviz_client::testing::TestServer;
    ///
    /// let server = TestServer::start(mock.router()).await?;
    /// let datasets = server.client.list_datasets().await?;
    /// ```
    pub async fn start(router: axum::Router) -> Result<Self> {
        Self::start_with_timeout(router, Duration::from_secs(5), Duration::from_secs(2)).await
    }

    /// Bind with custom client timeouts.
    pub async fn start_with_timeout(
        router: axum::Router,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| crate::ApiError::NetworkUnavailable(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| crate::ApiError::NetworkUnavailable(e.to_string()))?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let credential = CredentialStore::new();
        let base_url = format!("http://{addr}");
        let client =
            EquipmentClient::with_config(&base_url, credential.clone(), timeout, connect_timeout)?;

        Ok(Self {
            addr,
            client,
            credential,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
