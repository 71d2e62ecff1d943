//! Equipment dataset HTTP client implementation.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::credential::CredentialStore;
use crate::error::{ApiError, Result};
use crate::types::*;
use chemviz_core::models::{DatasetDetail, DatasetSummary, GlobalStatistics, UserInfo};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// REST API client for the equipment dataset service.
///
/// The single choke point for all network I/O: every outgoing request
/// reads the shared [`CredentialStore`] and, when a token is present,
/// carries it as `Authorization: Token <token>`. Failures are normalized
/// into [`ApiError`]; no retries are performed here.
#[derive(Debug, Clone)]
pub struct EquipmentClient {
    client: Client,
    base_url: Url,
    credential: CredentialStore,
}

impl EquipmentClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the service (e.g., "http://localhost:8000")
    /// * `credential` - Shared credential slot, read on every request
    pub fn new(base_url: &str, credential: CredentialStore) -> Result<Self> {
        Self::with_config(base_url, credential, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new client with custom timeouts.
    pub fn with_config(
        base_url: &str,
        credential: CredentialStore,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        let base_url = Url::parse(base_url)?;

        Ok(Self {
            client,
            base_url,
            credential,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The credential slot this client reads from.
    pub fn credential(&self) -> &CredentialStore {
        &self.credential
    }

    // =========================================================================
    // Auth Operations
    // =========================================================================

    /// Register a new user. Does not require a credential.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegistrationRequest) -> Result<AuthResponse> {
        let url = self.base_url.join("/api/auth/register/")?;
        let response = self.client.post(url).json(request).send().await?;
        self.handle_response(response).await
    }

    /// Log in and obtain a credential. The returned token is NOT stored;
    /// the session layer decides when to commit it to the slot.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let url = self.base_url.join("/api/auth/login/")?;
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self.client.post(url).json(&request).send().await?;
        self.handle_response(response).await
    }

    /// Invalidate the credential server-side. Best-effort from the
    /// client's perspective; the session layer clears local state even
    /// when this fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let url = self.base_url.join("/api/auth/logout/")?;
        let response = self.authorized(self.client.post(url)).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(extract_error(response).await)
        }
    }

    /// Get the currently authenticated user.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<UserInfo> {
        let url = self.base_url.join("/api/auth/user/")?;
        let response = self.authorized(self.client.get(url)).send().await?;
        self.handle_response(response).await
    }

    // =========================================================================
    // Dataset Operations
    // =========================================================================

    /// Upload a CSV dataset as a multipart file body.
    ///
    /// The CSV size/type constraint is enforced by the caller before
    /// transmission, not here; the server validates again regardless.
    #[instrument(skip(self, contents), fields(bytes = contents.len()))]
    pub async fn upload_dataset(&self, filename: &str, contents: Vec<u8>) -> Result<UploadResponse> {
        let url = self.base_url.join("/api/upload/")?;
        debug!("Uploading {} to {}", filename, url);

        let part = Part::bytes(contents)
            .file_name(filename.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let response = self
            .authorized(self.client.post(url))
            .multipart(form)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// List the user's datasets, most recent five, server order.
    #[instrument(skip(self))]
    pub async fn list_datasets(&self) -> Result<Vec<DatasetSummary>> {
        let url = self.base_url.join("/api/datasets/")?;
        let response = self.authorized(self.client.get(url)).send().await?;
        self.handle_response(response).await
    }

    /// Fetch the full detail for one dataset, equipment sequence included.
    #[instrument(skip(self))]
    pub async fn get_dataset(&self, dataset_id: i64) -> Result<DatasetDetail> {
        let url = self
            .base_url
            .join(&format!("/api/datasets/{dataset_id}/"))?;
        let response = self.authorized(self.client.get(url)).send().await?;
        self.handle_response(response).await
    }

    /// Delete one dataset.
    #[instrument(skip(self))]
    pub async fn delete_dataset(&self, dataset_id: i64) -> Result<()> {
        let url = self
            .base_url
            .join(&format!("/api/datasets/{dataset_id}/delete/"))?;
        let response = self.authorized(self.client.delete(url)).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(extract_error(response).await)
        }
    }

    /// Fetch the PDF report for one dataset as raw bytes.
    ///
    /// Success means bytes were received; saving them (and whether the
    /// file opens as a valid PDF) is the caller's concern.
    #[instrument(skip(self))]
    pub async fn generate_report(&self, dataset_id: i64) -> Result<Vec<u8>> {
        let url = self
            .base_url
            .join(&format!("/api/datasets/{dataset_id}/report/"))?;
        let response = self.authorized(self.client.get(url)).send().await?;

        if response.status().is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            Err(extract_error(response).await)
        }
    }

    /// Fetch the per-user global statistics.
    #[instrument(skip(self))]
    pub async fn statistics(&self) -> Result<GlobalStatistics> {
        let url = self.base_url.join("/api/statistics/")?;
        let response = self.authorized(self.client.get(url)).send().await?;
        self.handle_response(response).await
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    /// Attach the credential header when a token is held.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.credential.get() {
            Some(token) => builder.header(AUTHORIZATION, format!("Token {token}")),
            None => builder,
        }
    }

    /// Handle response and deserialize JSON
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                ApiError::server_error(status.as_u16(), format!("malformed response body: {e}"))
            })
        } else {
            Err(extract_error(response).await)
        }
    }
}

/// Normalize a failed response into the error taxonomy.
async fn extract_error(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let message = match response.text().await {
        Ok(body) => parse_error_message(&body).unwrap_or_else(|| format!("HTTP {status}")),
        Err(_) => format!("HTTP {status}"),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::BAD_REQUEST => ApiError::ValidationFailed(message),
        _ => ApiError::server_error(status.as_u16(), message),
    }
}

/// Pull a human-readable message out of an error body.
///
/// The server answers most failures with `{"error": "..."}`; registration
/// failures arrive as a field → messages map instead. Both collapse into
/// one line here.
fn parse_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
        return Some(message.to_string());
    }

    let map = value.as_object()?;
    let mut parts = Vec::new();
    for (field, errors) in map {
        let rendered = match errors {
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            serde_json::Value::String(message) => message.clone(),
            _ => continue,
        };
        if !rendered.is_empty() {
            parts.push(format!("{field}: {rendered}"));
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = EquipmentClient::new("http://localhost:8000", CredentialStore::new());
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let client = EquipmentClient::new("not a url", CredentialStore::new());
        assert!(client.is_err());
    }

    #[test]
    fn parses_plain_error_body() {
        assert_eq!(
            parse_error_message(r#"{"error": "Only CSV files are allowed"}"#).as_deref(),
            Some("Only CSV files are allowed")
        );
    }

    #[test]
    fn parses_field_map_error_body() {
        let body = r#"{"username": ["A user with that username already exists."],
                       "password": ["This password is too short."]}"#;
        let message = parse_error_message(body).unwrap();
        assert!(message.contains("username: A user with that username already exists."));
        assert!(message.contains("password: This password is too short."));
    }

    #[test]
    fn unparseable_body_yields_none() {
        assert_eq!(parse_error_message("<html>teapot</html>"), None);
        assert_eq!(parse_error_message(r#"{"detail": 42}"#), None);
    }
}
