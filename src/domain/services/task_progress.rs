use std::sync::Arc;
use tracing::info;
use crate::domain::models::housekeeping::HousekeepingTask;
use crate::domain::ports::HousekeepingTaskRepository;
use crate::error::AppError;

/// Staff-side mutations of an existing task.
pub struct TaskProgressService {
    task_repo: Arc<dyn HousekeepingTaskRepository>,
}

impl TaskProgressService {
    pub fn new(task_repo: Arc<dyn HousekeepingTaskRepository>) -> Self {
        Self { task_repo }
    }

    async fn load(&self, task_id: &str) -> Result<HousekeepingTask, AppError> {
        self.task_repo.find_by_id(task_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))
    }

    pub async fn set_checklist_item(&self, task_id: &str, item_id: &str, completed: bool) -> Result<HousekeepingTask, AppError> {
        let mut task = self.load(task_id).await?;
        if !task.set_item_completed(item_id, completed) {
            return Err(AppError::NotFound(format!("Checklist item {} not found", item_id)));
        }
        let updated = self.task_repo.update(&task).await?;
        info!("Task {} checklist item {} -> {} (status {})", task_id, item_id, completed, updated.status);
        Ok(updated)
    }

    pub async fn assign(&self, task_id: &str, assigned_to: Option<String>) -> Result<HousekeepingTask, AppError> {
        let mut task = self.load(task_id).await?;
        task.assigned_to = assigned_to.filter(|a| !a.trim().is_empty());
        task.updated_at = chrono::Utc::now();
        let updated = self.task_repo.update(&task).await?;
        info!("Task {} assigned to {:?}", task_id, updated.assigned_to);
        Ok(updated)
    }
}
