//! Shared harness for session integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chemviz_client::testing::TestServer;
use chemviz_session::DashboardSession;
use chemviz_tests::MockEquipmentService;

/// Fixture CSV matching the upload contract; two pumps and one valve, in
/// an order the aggregation tests rely on.
pub const CSV: &str = "Equipment Name,Type,Flowrate,Pressure,Temperature\n\
                       Pump-001,Pump,12.3,2.2,90.0\n\
                       Valve-002,Valve,5.0,4.0,150.0\n\
                       Pump-003,Pump,8.1,3.5,110.0\n";

/// Boot the mock service, connect a session to it, and log in.
pub async fn start() -> (MockEquipmentService, TestServer, Arc<DashboardSession>) {
    let mock = MockEquipmentService::new();
    let server = TestServer::start(mock.router())
        .await
        .expect("mock server should bind");
    let session = Arc::new(DashboardSession::with_client(server.client.clone()));

    mock.seed_user("operator", "secret");
    session
        .login("operator", "secret")
        .await
        .expect("seeded login should succeed");

    (mock, server, session)
}

/// Upload the fixture CSV under the given name and return the new id.
pub async fn upload_fixture(session: &DashboardSession, filename: &str) -> i64 {
    session.upload(filename, CSV.as_bytes().to_vec()).await;
    session
        .store()
        .datasets()
        .first()
        .expect("upload should land in the refreshed list")
        .id
}
