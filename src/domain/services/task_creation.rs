use std::sync::Arc;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use crate::domain::models::housekeeping::{HousekeepingTask, NewTaskParams, CLEANING_FULL, CLEANING_LINEN_CHANGE};
use crate::domain::ports::{ChecklistTemplateRepository, HousekeepingTaskRepository};
use crate::domain::services::templates::resolve_checklist;
use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualTaskRequest {
    pub title: String,
    pub cleaning_type: String,
    pub due_date: NaiveDate,
    pub listing_id: String,
    pub booking_id: Option<String>,
    pub assigned_to: Option<String>,
    pub template_id: Option<String>,
    /// Stay dates, check-in first and check-out last.
    pub cleaning_schedule: Option<Vec<NaiveDate>>,
}

/// Cleaning type of the intermediate cleaning at `index` in a multi-cleaning schedule.
pub fn sibling_cleaning_type(index: usize) -> &'static str {
    if index % 2 == 1 { CLEANING_LINEN_CHANGE } else { CLEANING_FULL }
}

pub struct TaskCreationService {
    task_repo: Arc<dyn HousekeepingTaskRepository>,
    template_repo: Arc<dyn ChecklistTemplateRepository>,
}

impl TaskCreationService {
    pub fn new(task_repo: Arc<dyn HousekeepingTaskRepository>, template_repo: Arc<dyn ChecklistTemplateRepository>) -> Self {
        Self { task_repo, template_repo }
    }

    /// Creates the primary task and, for schedules longer than two dates, one
    /// extra task per intermediate date. Extra tasks each get a fresh
    /// `booking_id` rather than the primary's.
    pub async fn create(&self, request: ManualTaskRequest) -> Result<Vec<HousekeepingTask>, AppError> {
        if request.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".into()));
        }
        if request.cleaning_type.trim().is_empty() {
            return Err(AppError::Validation("Cleaning type is required".into()));
        }
        if request.listing_id.trim().is_empty() {
            return Err(AppError::Validation("Listing is required".into()));
        }

        let checklist = resolve_checklist(
            self.template_repo.as_ref(),
            request.template_id.as_deref(),
            &request.cleaning_type,
        ).await?;

        let primary = HousekeepingTask::new(NewTaskParams {
            booking_id: request.booking_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string()),
            listing_id: request.listing_id.clone(),
            title: request.title.clone(),
            due_date: request.due_date,
            task_type: request.cleaning_type.clone(),
            checklist_titles: checklist,
            assigned_to: request.assigned_to.clone(),
            is_primary: true,
        });
        let mut created = self.task_repo.create_many(std::slice::from_ref(&primary)).await?;
        info!("Created housekeeping task {} ({}) due {}", primary.id, primary.task_type, primary.due_date);

        let schedule = request.cleaning_schedule.unwrap_or_default();
        if schedule.len() > 2 {
            let mut siblings = Vec::with_capacity(schedule.len() - 2);
            for (index, due_date) in schedule.iter().enumerate().take(schedule.len() - 1).skip(1) {
                let cleaning_type = sibling_cleaning_type(index);
                let checklist = resolve_checklist(self.template_repo.as_ref(), None, cleaning_type).await?;
                siblings.push(HousekeepingTask::new(NewTaskParams {
                    booking_id: Uuid::new_v4().to_string(),
                    listing_id: request.listing_id.clone(),
                    title: format!("{} - {}", request.title, cleaning_type),
                    due_date: *due_date,
                    task_type: cleaning_type.to_string(),
                    checklist_titles: checklist,
                    assigned_to: request.assigned_to.clone(),
                    is_primary: false,
                }));
            }
            let saved = self.task_repo.create_many(&siblings).await?;
            info!("Created {} additional cleaning(s) for task {}", saved.len(), primary.id);
            created.extend(saved);
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_types_alternate_by_index() {
        assert_eq!(sibling_cleaning_type(1), "Linen & Towel Change");
        assert_eq!(sibling_cleaning_type(2), "Full");
        assert_eq!(sibling_cleaning_type(3), "Linen & Towel Change");
        assert_eq!(sibling_cleaning_type(4), "Full");
    }
}
