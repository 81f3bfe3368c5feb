use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const CLEANING_STANDARD: &str = "Standard";
pub const CLEANING_DEEP: &str = "Deep";
pub const CLEANING_LINEN_CHANGE: &str = "Linen & Towel Change";
pub const CLEANING_FULL: &str = "Full";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn from_checklist(items: &[ChecklistItem]) -> Self {
        let done = items.iter().filter(|i| i.completed).count();
        if done == 0 {
            TaskStatus::Pending
        } else if done == items.len() {
            TaskStatus::Completed
        } else {
            TaskStatus::InProgress
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(title: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            completed: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct HousekeepingTask {
    pub id: String,
    pub booking_id: String,
    pub listing_id: String,
    pub title: String,
    pub due_date: NaiveDate,
    pub task_type: String,
    pub checklist: Json<Vec<ChecklistItem>>,
    pub status: String,
    pub assigned_to: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewTaskParams {
    pub booking_id: String,
    pub listing_id: String,
    pub title: String,
    pub due_date: NaiveDate,
    pub task_type: String,
    pub checklist_titles: Vec<String>,
    pub assigned_to: Option<String>,
    pub is_primary: bool,
}

impl HousekeepingTask {
    pub fn new(params: NewTaskParams) -> Self {
        let now = Utc::now();
        let checklist = params.checklist_titles.iter()
            .map(|t| ChecklistItem::new(t))
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            booking_id: params.booking_id,
            listing_id: params.listing_id,
            title: params.title,
            due_date: params.due_date,
            task_type: params.task_type,
            checklist: Json(checklist),
            status: TaskStatus::Pending.as_str().to_string(),
            assigned_to: params.assigned_to,
            is_primary: params.is_primary,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks one checklist item and recomputes the task status.
    /// Returns false when the item does not exist.
    pub fn set_item_completed(&mut self, item_id: &str, completed: bool) -> bool {
        let Some(item) = self.checklist.0.iter_mut().find(|i| i.id == item_id) else {
            return false;
        };
        item.completed = completed;
        self.status = TaskStatus::from_checklist(&self.checklist.0).as_str().to_string();
        self.updated_at = Utc::now();
        true
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub listing_id: Option<String>,
    pub booking_id: Option<String>,
    pub status: Option<String>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
}
