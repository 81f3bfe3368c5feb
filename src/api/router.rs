use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, housekeeping, templates, rules, bookings};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Housekeeping
        .route("/api/v1/housekeeping/generate", post(housekeeping::generate_tasks))
        .route("/api/v1/housekeeping/tasks", get(housekeeping::list_tasks).post(housekeeping::create_task))
        .route("/api/v1/housekeeping/tasks/{task_id}", get(housekeeping::get_task))
        .route("/api/v1/housekeeping/tasks/{task_id}/assignee", put(housekeeping::assign_task))
        .route("/api/v1/housekeeping/tasks/{task_id}/checklist/{item_id}", put(housekeeping::update_checklist_item))

        // Config
        .route("/api/v1/checklist-templates", get(templates::list_templates).post(templates::create_template))
        .route("/api/v1/cleaning-rules", get(rules::list_rules).post(rules::create_rule))
        .route("/api/v1/cleaning-rules/{rule_id}", delete(rules::delete_rule))

        // Bookings
        .route("/api/v1/bookings", get(bookings::list_bookings))
        .route("/api/v1/bookings/sync", post(bookings::sync_bookings))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
