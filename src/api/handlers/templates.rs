use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminAuth;
use crate::api::dtos::requests::CreateTemplateRequest;
use crate::domain::models::checklist::ChecklistTemplate;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
) -> Result<impl IntoResponse, AppError> {
    let templates = state.template_repo.list().await?;
    Ok(Json(templates))
}

pub async fn create_template(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let items: Vec<String> = payload.items.into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    let template = ChecklistTemplate::new(
        payload.name,
        payload.cleaning_type,
        items,
        payload.is_default.unwrap_or(false),
    );
    template.validate()?;

    let created = state.template_repo.create(&template).await?;
    info!("Created checklist template {} for {} (default: {})", created.name, created.cleaning_type, created.is_default);
    Ok((StatusCode::CREATED, Json(created)))
}
