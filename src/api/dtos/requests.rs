use serde::Deserialize;

#[derive(Deserialize)]
pub struct AssignTaskRequest {
    pub assigned_to: Option<String>,
}

#[derive(Deserialize)]
pub struct ChecklistItemUpdateRequest {
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub cleaning_type: String,
    pub items: Vec<String>,
    pub is_default: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateRuleRequest {
    pub listing_id: Option<String>,
    pub name: String,
    pub cleaning_type: String,
    pub trigger_type: String,
    pub interval_days: Option<i32>,
    pub min_nights: Option<i32>,
    pub template_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ListBookingsParams {
    pub listing_id: Option<String>,
}
