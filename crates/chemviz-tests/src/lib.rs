//! In-process mock of the equipment dataset service.
//!
//! Implements the wire contract the real backend exposes (token auth,
//! multipart CSV upload, most-recent-5 dataset list, detail with type
//! distribution, PDF report bytes, per-user statistics) so integration
//! tests can exercise the client and session layers over real HTTP.
//!
//! Test hooks: [`MockEquipmentService::set_detail_delay`] stalls one
//! dataset's detail response (for superseded-request tests) and
//! [`MockEquipmentService::revoke_all_tokens`] invalidates every
//! credential (for forced-logout tests).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::{json, Value};

use chemviz_core::models::{DatasetContents, DatasetSummary, EquipmentRecord};

/// The server keeps only this many datasets per user.
const DATASET_CAP: usize = 5;

const REQUIRED_COLUMNS: [&str; 5] = [
    "Equipment Name",
    "Type",
    "Flowrate",
    "Pressure",
    "Temperature",
];

#[derive(Default)]
struct MockState {
    next_dataset_id: i64,
    next_user_id: i64,
    /// username -> password
    users: HashMap<String, String>,
    /// token -> username
    tokens: HashMap<String, String>,
    /// newest first, capped at [`DATASET_CAP`]
    datasets: Vec<DatasetContents>,
    detail_delays: HashMap<i64, Duration>,
    list_requests: usize,
    statistics_requests: usize,
}

type Shared = Arc<Mutex<MockState>>;

/// One in-memory service instance; hand its [`router`](Self::router) to
/// `chemviz_client::testing::TestServer`.
#[derive(Clone, Default)]
pub struct MockEquipmentService {
    state: Shared,
}

impl MockEquipmentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create a user without going through the register endpoint.
    pub fn seed_user(&self, username: &str, password: &str) {
        self.state
            .lock()
            .users
            .insert(username.to_string(), password.to_string());
    }

    /// Stall the detail response for one dataset id.
    pub fn set_detail_delay(&self, dataset_id: i64, delay: Duration) {
        self.state.lock().detail_delays.insert(dataset_id, delay);
    }

    /// Invalidate every issued token; subsequent requests get 401.
    pub fn revoke_all_tokens(&self) {
        self.state.lock().tokens.clear();
    }

    pub fn dataset_count(&self) -> usize {
        self.state.lock().datasets.len()
    }

    /// How many times `GET datasets/` has been served.
    pub fn list_requests(&self) -> usize {
        self.state.lock().list_requests
    }

    /// How many times `GET statistics/` has been served.
    pub fn statistics_requests(&self) -> usize {
        self.state.lock().statistics_requests
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/auth/register/", post(register))
            .route("/api/auth/login/", post(login))
            .route("/api/auth/logout/", post(logout))
            .route("/api/auth/user/", get(current_user))
            .route("/api/upload/", post(upload))
            .route("/api/datasets/", get(list_datasets))
            .route("/api/datasets/{id}/", get(get_dataset))
            .route("/api/datasets/{id}/delete/", delete(delete_dataset))
            .route("/api/datasets/{id}/report/", get(report))
            .route("/api/statistics/", get(statistics))
            .with_state(self.state.clone())
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Check the `Authorization: Token <t>` header; answer the username.
fn authenticate(state: &MockState, headers: &HeaderMap) -> Result<String, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Token "));

    match token.and_then(|t| state.tokens.get(t)) {
        Some(username) => Ok(username.clone()),
        None => Err(error_body(
            StatusCode::UNAUTHORIZED,
            "Authentication credentials were not provided.",
        )),
    }
}

fn user_json(state: &MockState, username: &str) -> Value {
    // Stable pseudo-id per username so repeated lookups agree
    let id = state
        .users
        .keys()
        .position(|name| name == username)
        .unwrap_or(0) as i64
        + 1;
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "first_name": "",
        "last_name": ""
    })
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock();

    let username = body.get("username").and_then(|v| v.as_str()).unwrap_or("");
    let password = body.get("password").and_then(|v| v.as_str()).unwrap_or("");
    let confirm = body
        .get("password_confirm")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    if username.is_empty() || password.is_empty() {
        return error_body(StatusCode::BAD_REQUEST, "Missing username or password");
    }
    if password != confirm {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "password": ["Passwords do not match"] })),
        )
            .into_response();
    }
    if state.users.contains_key(username) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "username": ["A user with that username already exists."] })),
        )
            .into_response();
    }

    state
        .users
        .insert(username.to_string(), password.to_string());
    state.next_user_id += 1;
    let token = format!("token-{}-{}", username, state.next_user_id);
    state.tokens.insert(token.clone(), username.to_string());

    let user = user_json(&state, username);
    (
        StatusCode::CREATED,
        Json(json!({
            "token": token,
            "user": user,
            "message": "User registered successfully"
        })),
    )
        .into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock();

    let username = body.get("username").and_then(|v| v.as_str()).unwrap_or("");
    let password = body.get("password").and_then(|v| v.as_str()).unwrap_or("");

    if state.users.get(username).map(String::as_str) != Some(password) {
        return error_body(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    state.next_user_id += 1;
    let token = format!("token-{}-{}", username, state.next_user_id);
    state.tokens.insert(token.clone(), username.to_string());

    let user = user_json(&state, username);
    (
        StatusCode::OK,
        Json(json!({
            "token": token,
            "user": user,
            "message": "Login successful"
        })),
    )
        .into_response()
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    if let Err(response) = authenticate(&state, &headers) {
        return response;
    }

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Token "))
        .map(str::to_string);
    if let Some(token) = token {
        state.tokens.remove(&token);
    }

    (StatusCode::OK, Json(json!({ "message": "Logout successful" }))).into_response()
}

async fn current_user(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock();
    match authenticate(&state, &headers) {
        Ok(username) => (StatusCode::OK, Json(user_json(&state, &username))).into_response(),
        Err(response) => response,
    }
}

async fn upload(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    {
        let state = state.lock();
        if let Err(response) = authenticate(&state, &headers) {
            return response;
        }
    }

    let mut filename = None;
    let mut contents = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            filename = field.file_name().map(str::to_string);
            contents = field.text().await.ok();
        }
    }

    let Some(filename) = filename else {
        return error_body(StatusCode::BAD_REQUEST, "No file provided");
    };
    if !filename.to_lowercase().ends_with(".csv") {
        return error_body(StatusCode::BAD_REQUEST, "Only CSV files are allowed");
    }
    let Some(contents) = contents else {
        return error_body(StatusCode::BAD_REQUEST, "No file provided");
    };

    let equipment = match parse_csv(&contents) {
        Ok(records) => records,
        Err(message) => return error_body(StatusCode::BAD_REQUEST, &message),
    };

    let mut state = state.lock();
    let username = match authenticate(&state, &headers) {
        Ok(username) => username,
        Err(response) => return response,
    };

    state.next_dataset_id += 1;
    let id = state.next_dataset_id;

    let count = equipment.len() as f64;
    let dataset = DatasetContents {
        id,
        filename,
        upload_date: Utc::now(),
        total_equipment: equipment.len() as i64,
        avg_flowrate: equipment.iter().map(|e| e.flowrate).sum::<f64>() / count,
        avg_pressure: equipment.iter().map(|e| e.pressure).sum::<f64>() / count,
        avg_temperature: equipment.iter().map(|e| e.temperature).sum::<f64>() / count,
        username: Some(username),
        equipment,
    };

    let body = json!({
        "message": "File uploaded successfully",
        "dataset": &dataset
    });

    state.datasets.insert(0, dataset);
    state.datasets.truncate(DATASET_CAP);

    (StatusCode::CREATED, Json(body)).into_response()
}

async fn list_datasets(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    if let Err(response) = authenticate(&state, &headers) {
        return response;
    }
    state.list_requests += 1;

    let summaries: Vec<DatasetSummary> = state.datasets.iter().map(summary_of).collect();
    (StatusCode::OK, Json(summaries)).into_response()
}

async fn get_dataset(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let delay = {
        let state = state.lock();
        if let Err(response) = authenticate(&state, &headers) {
            return response;
        }
        state.detail_delays.get(&id).copied()
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let state = state.lock();
    let Some(dataset) = state.datasets.iter().find(|d| d.id == id) else {
        return error_body(StatusCode::NOT_FOUND, "Dataset not found");
    };

    let mut type_distribution: HashMap<String, u64> = HashMap::new();
    for record in &dataset.equipment {
        *type_distribution
            .entry(record.equipment_type.clone())
            .or_insert(0) += 1;
    }

    (
        StatusCode::OK,
        Json(json!({
            "dataset": dataset,
            "type_distribution": type_distribution
        })),
    )
        .into_response()
}

async fn delete_dataset(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock();
    if let Err(response) = authenticate(&state, &headers) {
        return response;
    }

    let before = state.datasets.len();
    state.datasets.retain(|d| d.id != id);
    if state.datasets.len() == before {
        return error_body(StatusCode::NOT_FOUND, "Dataset not found");
    }

    (
        StatusCode::OK,
        Json(json!({ "message": "Dataset deleted successfully" })),
    )
        .into_response()
}

async fn report(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let state = state.lock();
    if let Err(response) = authenticate(&state, &headers) {
        return response;
    }

    if !state.datasets.iter().any(|d| d.id == id) {
        return error_body(StatusCode::NOT_FOUND, "Dataset not found");
    }

    let bytes = format!("%PDF-1.4\nmock equipment report for dataset {id}\n").into_bytes();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/pdf")],
        bytes,
    )
        .into_response()
}

async fn statistics(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    let username = match authenticate(&state, &headers) {
        Ok(username) => username,
        Err(response) => return response,
    };
    state.statistics_requests += 1;

    let total_equipment: i64 = state.datasets.iter().map(|d| d.total_equipment).sum();
    (
        StatusCode::OK,
        Json(json!({
            "total_datasets": state.datasets.len(),
            "total_equipment": total_equipment,
            "username": username
        })),
    )
        .into_response()
}

// =============================================================================
// CSV ingestion
// =============================================================================

/// Minimal CSV reader for the upload fixture format. Rows with missing or
/// non-numeric measurements are dropped, matching the backend's cleanup.
fn parse_csv(contents: &str) -> Result<Vec<EquipmentRecord>, String> {
    let mut lines = contents.lines();
    let header = lines.next().ok_or_else(|| "Empty file".to_string())?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();

    let mut indices = Vec::with_capacity(REQUIRED_COLUMNS.len());
    let mut missing = Vec::new();
    for required in REQUIRED_COLUMNS {
        match columns.iter().position(|c| *c == required) {
            Some(index) => indices.push(index),
            None => missing.push(required),
        }
    }
    if !missing.is_empty() {
        return Err(format!("Missing required columns: {}", missing.join(", ")));
    }

    let mut records = Vec::new();
    for (row_number, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let field = |slot: usize| fields.get(indices[slot]).copied().unwrap_or("");

        let name = field(0);
        let kind = field(1);
        let measurements: Option<Vec<f64>> = (2..5)
            .map(|slot| field(slot).parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect();

        match measurements {
            Some(values) if !name.is_empty() && !kind.is_empty() => {
                records.push(EquipmentRecord {
                    id: Some(row_number as i64 + 1),
                    equipment_name: name.to_string(),
                    equipment_type: kind.to_string(),
                    flowrate: values[0],
                    pressure: values[1],
                    temperature: values[2],
                });
            }
            _ => continue,
        }
    }

    if records.is_empty() {
        return Err("Error processing file: no valid rows".to_string());
    }
    Ok(records)
}

fn summary_of(dataset: &DatasetContents) -> DatasetSummary {
    DatasetSummary {
        id: dataset.id,
        filename: dataset.filename.clone(),
        upload_date: dataset.upload_date,
        total_equipment: dataset.total_equipment,
        avg_flowrate: dataset.avg_flowrate,
        avg_pressure: dataset.avg_pressure,
        avg_temperature: dataset.avg_temperature,
        username: dataset.username.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Equipment Name,Type,Flowrate,Pressure,Temperature\n\
                       Pump-001,Pump,12.3,2.2,90.0\n\
                       Valve-002,Valve,5.0,4.0,150.0\n";

    #[test]
    fn parses_well_formed_csv() {
        let records = parse_csv(CSV).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].equipment_name, "Pump-001");
    }

    #[test]
    fn rejects_missing_columns() {
        let err = parse_csv("Name,Type\nPump,Pump\n").unwrap_err();
        assert!(err.contains("Missing required columns"));
    }

    #[test]
    fn drops_malformed_rows() {
        let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\n\
                   Pump-001,Pump,12.3,2.2,90.0\n\
                   Broken,Pump,not-a-number,1.0,2.0\n";
        let records = parse_csv(csv).unwrap();
        assert_eq!(records.len(), 1);
    }
}
