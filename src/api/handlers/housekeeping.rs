use axum::{body::Bytes, extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminAuth;
use crate::api::dtos::requests::{AssignTaskRequest, ChecklistItemUpdateRequest};
use crate::api::dtos::responses::CreatedTasksResponse;
use crate::domain::models::housekeeping::TaskFilter;
use crate::domain::services::task_creation::{ManualTaskRequest, TaskCreationService};
use crate::domain::services::task_generation::{GenerationRequest, TaskGenerationService};
use crate::domain::services::task_progress::TaskProgressService;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{error, info};

pub async fn generate_tasks(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request: GenerationRequest = if body.is_empty() {
        GenerationRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("Invalid generation request: {}", e)))?
    };
    let service = TaskGenerationService::new(
        state.booking_repo.clone(),
        state.task_repo.clone(),
        state.template_repo.clone(),
        state.rule_repo.clone(),
    );

    let summary = service.run(&request, state.config.today()).await;
    if summary.success {
        Ok((StatusCode::OK, Json(summary)))
    } else {
        error!("Task generation run failed: {:?}", summary.error);
        Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(summary)))
    }
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Json(payload): Json<ManualTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = TaskCreationService::new(state.task_repo.clone(), state.template_repo.clone());
    let mut created = service.create(payload).await?;
    if created.is_empty() {
        return Err(AppError::InternalWithMsg("No task was created".into()));
    }
    let primary = created.remove(0);
    info!("Manual task {} created with {} additional cleaning(s)", primary.id, created.len());
    Ok((StatusCode::CREATED, Json(CreatedTasksResponse { primary, additional: created })))
}

pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Query(filter): Query<TaskFilter>,
) -> Result<impl IntoResponse, AppError> {
    let tasks = state.task_repo.list(&filter).await?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.task_repo.find_by_id(&task_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))?;
    Ok(Json(task))
}

pub async fn assign_task(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path(task_id): Path<String>,
    Json(payload): Json<AssignTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = TaskProgressService::new(state.task_repo.clone());
    let task = service.assign(&task_id, payload.assigned_to).await?;
    Ok(Json(task))
}

pub async fn update_checklist_item(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path((task_id, item_id)): Path<(String, String)>,
    Json(payload): Json<ChecklistItemUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = TaskProgressService::new(state.task_repo.clone());
    let task = service.set_checklist_item(&task_id, &item_id, payload.completed).await?;
    Ok(Json(task))
}
