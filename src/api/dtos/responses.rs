use serde::Serialize;
use crate::domain::models::housekeeping::HousekeepingTask;

#[derive(Serialize)]
pub struct CreatedTasksResponse {
    pub primary: HousekeepingTask,
    pub additional: Vec<HousekeepingTask>,
}
