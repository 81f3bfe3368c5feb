use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminAuth;
use crate::api::dtos::requests::CreateRuleRequest;
use crate::domain::models::checklist::{CleaningRule, NewRuleParams};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
) -> Result<impl IntoResponse, AppError> {
    let rules = state.rule_repo.list().await?;
    Ok(Json(rules))
}

pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Json(payload): Json<CreateRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let rule = CleaningRule::new(NewRuleParams {
        listing_id: payload.listing_id.filter(|l| !l.trim().is_empty()),
        name: payload.name,
        cleaning_type: payload.cleaning_type,
        trigger_type: payload.trigger_type,
        interval_days: payload.interval_days,
        min_nights: payload.min_nights.unwrap_or(0),
        template_id: payload.template_id,
    });
    rule.validate()?;

    if let Some(template_id) = &rule.template_id
        && state.template_repo.find_by_id(template_id).await?.is_none()
    {
        return Err(AppError::Validation(format!("Template {} does not exist", template_id)));
    }

    let created = state.rule_repo.create(&rule).await?;
    info!("Created cleaning rule {} ({} / {})", created.name, created.trigger_type, created.cleaning_type);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path(rule_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.rule_repo.delete(&rule_id).await?;
    info!("Deleted cleaning rule: {}", rule_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
