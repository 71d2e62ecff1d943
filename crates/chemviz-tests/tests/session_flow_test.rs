//! End-to-end tests for the dashboard session over real HTTP.

mod common;

use chemviz_core::aggregate;
use chemviz_session::{StatusKind, StatusMessage};
use pretty_assertions::assert_eq;

use common::{start, upload_fixture, CSV};

#[tokio::test]
async fn upload_refreshes_list_and_statistics_exactly_once() {
    let (mock, _server, session) = start().await;
    let lists_before = mock.list_requests();
    let stats_before = mock.statistics_requests();

    session.upload("plant.csv", CSV.as_bytes().to_vec()).await;

    assert_eq!(
        session.store().status(),
        Some(StatusMessage::success("File uploaded successfully!"))
    );
    assert_eq!(mock.list_requests(), lists_before + 1);
    assert_eq!(mock.statistics_requests(), stats_before + 1);

    let datasets = session.store().datasets();
    assert_eq!(datasets.len(), 1);
    assert_eq!(datasets[0].filename, "plant.csv");
    assert_eq!(datasets[0].total_equipment, 3);

    let stats = session.store().statistics().expect("statistics fetched");
    assert_eq!(stats.total_datasets, 1);
    assert_eq!(stats.total_equipment, 3);
}

#[tokio::test]
async fn successful_upload_overwrites_prior_error_status() {
    let (_mock, _server, session) = start().await;

    // A malformed upload first, leaving an error in the slot
    session
        .upload("broken.csv", b"Name,Only\nPump,1\n".to_vec())
        .await;
    let status = session.store().status().expect("error status set");
    assert_eq!(status.kind, StatusKind::Error);

    session.upload("plant.csv", CSV.as_bytes().to_vec()).await;
    let status = session.store().status().expect("status set");
    assert_eq!(status.kind, StatusKind::Success);
}

#[tokio::test]
async fn failed_upload_surfaces_server_message_and_keeps_state() {
    let (_mock, _server, session) = start().await;
    let id = upload_fixture(&session, "keep.csv").await;
    session.view_detail(id).await;

    session
        .upload("broken.csv", b"Name,Only\nPump,1\n".to_vec())
        .await;

    let status = session.store().status().expect("error status set");
    assert!(status.is_error());
    assert!(status.text.contains("Missing required columns"));
    // prior list and selection untouched
    assert_eq!(session.store().datasets().len(), 1);
    assert_eq!(session.store().selection().map(|d| d.id()), Some(id));
    assert!(!session.store().is_uploading());
}

#[tokio::test]
async fn view_detail_selects_and_aggregates_in_encounter_order() {
    let (_mock, _server, session) = start().await;
    let id = upload_fixture(&session, "plant.csv").await;

    session.view_detail(id).await;

    let detail = session.store().selection().expect("selection set");
    assert_eq!(detail.id(), id);
    assert_eq!(detail.dataset.equipment.len(), 3);
    assert!(!session.store().is_detail_loading());

    let dist = aggregate::type_distribution(&detail).expect("records present");
    assert_eq!(dist.labels, vec!["Pump", "Valve"]);
    assert_eq!(dist.counts, vec![2, 1]);
}

#[tokio::test]
async fn view_detail_failure_keeps_previous_selection() {
    let (_mock, _server, session) = start().await;
    let id = upload_fixture(&session, "plant.csv").await;
    session.view_detail(id).await;

    session.view_detail(9999).await;

    assert_eq!(session.store().selection().map(|d| d.id()), Some(id));
    let status = session.store().status().expect("error status set");
    assert_eq!(status, StatusMessage::error("Error loading dataset details."));
}

#[tokio::test]
async fn delete_of_selected_dataset_clears_selection() {
    let (mock, _server, session) = start().await;
    let first = upload_fixture(&session, "first.csv").await;
    let second = upload_fixture(&session, "second.csv").await;
    assert_ne!(first, second);

    session.view_detail(first).await;
    session.delete(first).await;

    assert!(session.store().selection().is_none());
    assert_eq!(session.store().datasets().len(), 1);
    assert_eq!(mock.dataset_count(), 1);
    assert_eq!(
        session.store().statistics().map(|s| s.total_datasets),
        Some(1)
    );
}

#[tokio::test]
async fn delete_of_other_dataset_keeps_selection() {
    let (_mock, _server, session) = start().await;
    let first = upload_fixture(&session, "first.csv").await;
    let second = upload_fixture(&session, "second.csv").await;

    session.view_detail(first).await;
    session.delete(second).await;

    assert_eq!(session.store().selection().map(|d| d.id()), Some(first));
}

#[tokio::test]
async fn delete_failure_leaves_list_and_selection_untouched() {
    let (_mock, _server, session) = start().await;
    let id = upload_fixture(&session, "plant.csv").await;
    session.view_detail(id).await;

    session.delete(9999).await;

    assert_eq!(session.store().datasets().len(), 1);
    assert_eq!(session.store().selection().map(|d| d.id()), Some(id));
    let status = session.store().status().expect("error status set");
    assert_eq!(status, StatusMessage::error("Error deleting dataset."));
}

#[tokio::test]
async fn report_saves_pdf_bytes_and_only_touches_status() {
    let (_mock, _server, session) = start().await;
    let id = upload_fixture(&session, "plant.csv").await;
    session.view_detail(id).await;
    let datasets_before = session.store().datasets().len();

    let dir = tempfile::tempdir().expect("tempdir");
    let path = session
        .generate_report(id, dir.path())
        .await
        .expect("report saved");

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some(format!("equipment_report_{id}.pdf").as_str())
    );
    let bytes = std::fs::read(&path).expect("report file readable");
    assert!(bytes.starts_with(b"%PDF"));

    assert_eq!(
        session.store().status(),
        Some(StatusMessage::success("Report generated successfully!"))
    );
    assert_eq!(session.store().datasets().len(), datasets_before);
    assert_eq!(session.store().selection().map(|d| d.id()), Some(id));
}

#[tokio::test]
async fn list_is_capped_to_most_recent_five() {
    let (_mock, _server, session) = start().await;
    for n in 0..7 {
        upload_fixture(&session, &format!("batch-{n}.csv")).await;
    }

    let datasets = session.store().datasets();
    assert_eq!(datasets.len(), 5);
    // newest first, per server order
    assert_eq!(datasets[0].filename, "batch-6.csv");
}
