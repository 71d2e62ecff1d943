//! Logout semantics: clearing local state must never depend on the
//! server being reachable or the credential still being valid.

mod common;

use std::time::Duration;

use chemviz_client::{CredentialStore, EquipmentClient};
use chemviz_session::{DashboardSession, StatusMessage};
use pretty_assertions::assert_eq;

use common::{start, upload_fixture};

#[tokio::test]
async fn logout_clears_local_state_even_offline() {
    // Nothing listens on this port; every request fails at the transport.
    let credential = CredentialStore::with_token(Some("stale-token".to_string()));
    let client = EquipmentClient::with_config(
        "http://127.0.0.1:9",
        credential.clone(),
        Duration::from_millis(500),
        Duration::from_millis(500),
    )
    .expect("client builds");
    let session = DashboardSession::with_client(client);
    session.store().set_status(StatusMessage::success("stale"));

    session.logout().await;

    assert!(!session.is_authenticated());
    assert!(credential.get().is_none());
    assert_eq!(session.store().status(), None);
    assert!(session.store().datasets().is_empty());
}

#[tokio::test]
async fn logout_invalidates_the_token_server_side_when_reachable() {
    let (_mock, server, session) = start().await;
    let token = server.credential.get().expect("logged in");

    session.logout().await;
    assert!(!session.is_authenticated());

    // The old token is gone on the server as well: restoring it locally
    // no longer authenticates.
    server.credential.set(token);
    let result = server.client.list_datasets().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn unauthorized_response_forces_local_logout() {
    let (mock, _server, session) = start().await;
    upload_fixture(&session, "plant.csv").await;
    assert!(session.is_authenticated());
    assert!(!session.store().datasets().is_empty());

    mock.revoke_all_tokens();
    session.load_all().await;

    assert!(!session.is_authenticated());
    assert!(session.store().datasets().is_empty());
    assert!(session.store().selection().is_none());
}
