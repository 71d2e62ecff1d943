//! Error-taxonomy mapping at the client boundary.

mod common;

use std::time::Duration;

use chemviz_client::{ApiError, CredentialStore, EquipmentClient};

use common::{start, CSV};

#[tokio::test]
async fn rejected_login_maps_to_unauthorized() {
    let (mock, server, _session) = start().await;
    mock.seed_user("intruder", "right-password");

    let err = server
        .client
        .login("intruder", "wrong-password")
        .await
        .expect_err("login must fail");
    assert!(matches!(err, ApiError::Unauthorized(_)));
    assert_eq!(err.message(), "Invalid credentials");
}

#[tokio::test]
async fn missing_dataset_maps_to_not_found() {
    let (_mock, server, _session) = start().await;

    let err = server
        .client
        .get_dataset(424242)
        .await
        .expect_err("detail must fail");
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn server_side_validation_maps_to_validation_failed() {
    let (_mock, server, _session) = start().await;

    let err = server
        .client
        .upload_dataset("readings.txt", CSV.as_bytes().to_vec())
        .await
        .expect_err("upload must fail");
    match err {
        ApiError::ValidationFailed(message) => {
            assert_eq!(message, "Only CSV files are allowed")
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_credential_maps_to_unauthorized() {
    let (_mock, server, _session) = start().await;
    server.credential.clear();

    let err = server
        .client
        .list_datasets()
        .await
        .expect_err("list must fail");
    assert!(matches!(err, ApiError::Unauthorized(_)));
}

#[tokio::test]
async fn unreachable_server_maps_to_network_unavailable() {
    let credential = CredentialStore::with_token(Some("token".to_string()));
    let client = EquipmentClient::with_config(
        "http://127.0.0.1:9",
        credential,
        Duration::from_millis(500),
        Duration::from_millis(500),
    )
    .expect("client builds");

    let err = client.list_datasets().await.expect_err("must fail");
    assert!(matches!(err, ApiError::NetworkUnavailable(_)));
}
