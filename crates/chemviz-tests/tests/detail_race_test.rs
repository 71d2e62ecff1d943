//! Superseded detail-request behavior: the most recently requested id
//! owns the selection, regardless of response arrival order.

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;

use common::{start, upload_fixture};

#[tokio::test]
async fn later_request_wins_even_when_first_response_arrives_last() {
    let (mock, _server, session) = start().await;
    let slow = upload_fixture(&session, "slow.csv").await;
    let fast = upload_fixture(&session, "fast.csv").await;

    mock.set_detail_delay(slow, Duration::from_millis(400));

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.view_detail(slow).await })
    };
    // Let the slow request get in flight before issuing the second one
    tokio::time::sleep(Duration::from_millis(100)).await;

    session.view_detail(fast).await;
    assert_eq!(session.store().selection().map(|d| d.id()), Some(fast));

    // The slow response lands afterwards and must be discarded
    first.await.expect("first request task");
    assert_eq!(session.store().selection().map(|d| d.id()), Some(fast));
    assert!(!session.store().is_detail_loading());
}

#[tokio::test]
async fn sequential_requests_settle_on_the_last_id() {
    let (_mock, _server, session) = start().await;
    let first = upload_fixture(&session, "first.csv").await;
    let second = upload_fixture(&session, "second.csv").await;

    session.view_detail(first).await;
    session.view_detail(second).await;

    assert_eq!(session.store().selection().map(|d| d.id()), Some(second));
}
