use axum::{extract::{State, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminAuth;
use crate::api::dtos::requests::ListBookingsParams;
use crate::domain::services::booking_sync::BookingSyncService;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Query(params): Query<ListBookingsParams>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list(params.listing_id.as_deref()).await?;
    Ok(Json(bookings))
}

pub async fn sync_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
) -> Result<impl IntoResponse, AppError> {
    if !state.config.channel_manager.is_configured() {
        return Err(AppError::Configuration("Channel manager credentials are not configured".into()));
    }
    let service = BookingSyncService::new(state.channel_manager.clone(), state.booking_repo.clone());
    let summary = service.sync(state.config.today(), state.config.booking_sync_horizon_days).await?;
    Ok(Json(summary))
}
