//! Request and response types specific to the API client.
//!
//! Domain models live in `chemviz-core`; these are the auth and upload
//! envelopes the server wraps around them.

use chemviz_core::models::{DatasetContents, UserInfo};
use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registration request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Returned by login and register: the credential plus the user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
    #[serde(default)]
    pub message: Option<String>,
}

/// Returned by a successful upload. The embedded dataset is ignored by the
/// session layer, which re-fetches the list instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub dataset: DatasetContents,
}
