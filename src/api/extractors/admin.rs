use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts},
};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::warn;

/// Caller presented `Authorization: Bearer <ADMIN_API_TOKEN>`.
pub struct AdminAuth;

impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let presented = parts.headers.get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?
            .to_str()
            .map_err(|_| AppError::Unauthorized)?
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        if presented != app_state.config.admin_api_token {
            warn!("Rejected request with invalid admin token");
            return Err(AppError::Unauthorized);
        }

        Ok(AdminAuth)
    }
}
