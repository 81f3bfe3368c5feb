mod common;

use axum::http::StatusCode;
use common::{days_from_today, parse_body, MockChannelManager, TestApp};
use std::sync::Mutex;
use villa_ops::background::run_cycle;
use villa_ops::domain::models::booking::{Booking, NewBookingParams};
use villa_ops::domain::models::housekeeping::TaskFilter;

fn reservation(id: &str, check_in: i64, check_out: i64, status: &str) -> Booking {
    Booking::new(NewBookingParams {
        id: id.to_string(),
        listing_id: "villa-azure".to_string(),
        guest_name: Some("Ana Pires".to_string()),
        check_in: days_from_today(check_in),
        check_out: days_from_today(check_out),
        status: status.to_string(),
        source: "guesty".to_string(),
    })
}

#[tokio::test]
async fn test_sync_upserts_reservations_in_horizon() {
    let channel_manager = MockChannelManager {
        reservations: Mutex::new(vec![
            reservation("gst-1", 1, 4, "confirmed"),
            reservation("gst-2", 3, 10, "cancelled"),
            reservation("gst-far", 100, 104, "confirmed"),
        ]),
        fail: false,
    };
    let app = TestApp::with_channel_manager(channel_manager).await;

    let res = app.send("POST", "/api/v1/bookings/sync", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let summary = parse_body(res).await;
    assert_eq!(summary["fetched"], 2);
    assert_eq!(summary["upserted"], 2);
    assert_eq!(summary["failed"], 0);

    let bookings = parse_body(app.send("GET", "/api/v1/bookings?listing_id=villa-azure", None).await).await;
    assert_eq!(bookings.as_array().unwrap().len(), 2);

    // Status changes upstream overwrite the stored row
    app.channel_manager.reservations.lock().unwrap()[0].status = "cancelled".to_string();
    app.send("POST", "/api/v1/bookings/sync", None).await;
    let stored = app.state.booking_repo.find_by_id("gst-1").await.unwrap().unwrap();
    assert_eq!(stored.status, "cancelled");
}

#[tokio::test]
async fn test_sync_requires_credentials() {
    let app = TestApp::new().await;
    let res = app.send("POST", "/api/v1/bookings/sync", None).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let app = TestApp::with_channel_manager(MockChannelManager { fail: true, ..Default::default() }).await;
    let res = app.send("POST", "/api/v1/bookings/sync", None).await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_worker_cycle_syncs_then_generates() {
    let channel_manager = MockChannelManager {
        reservations: Mutex::new(vec![
            reservation("gst-1", 0, 3, "confirmed"),
            reservation("gst-2", 2, 9, "confirmed"),
        ]),
        fail: false,
    };
    let app = TestApp::with_channel_manager(channel_manager).await;

    let summary = run_cycle(&app.state).await;
    assert!(summary.success);
    assert_eq!(summary.processed, 2);

    let tasks = app.state.task_repo.list(&TaskFilter::default()).await.unwrap();
    assert_eq!(tasks.len(), 2);

    let again = run_cycle(&app.state).await;
    assert_eq!(again.processed, 0);
    assert_eq!(again.skipped, 2);
}

#[tokio::test]
async fn test_worker_cycle_survives_sync_failure() {
    let app = TestApp::with_channel_manager(MockChannelManager { fail: true, ..Default::default() }).await;
    app.seed_booking("res-local", "villa-azure", days_from_today(1), days_from_today(5), "confirmed").await;

    let summary = run_cycle(&app.state).await;
    assert!(summary.success);
    assert_eq!(summary.processed, 1);
}
