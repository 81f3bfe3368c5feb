use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ChecklistTemplate {
    pub id: String,
    pub name: String,
    pub cleaning_type: String,
    pub items: Json<Vec<String>>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl ChecklistTemplate {
    pub fn new(name: String, cleaning_type: String, items: Vec<String>, is_default: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            cleaning_type,
            items: Json(items),
            is_default,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Template name is required".into()));
        }
        if self.cleaning_type.trim().is_empty() {
            return Err(AppError::Validation("Cleaning type is required".into()));
        }
        if self.items.0.iter().all(|i| i.trim().is_empty()) {
            return Err(AppError::Validation("Template needs at least one item".into()));
        }
        Ok(())
    }
}

pub const TRIGGER_CHECKOUT: &str = "checkout";
pub const TRIGGER_MID_STAY: &str = "mid_stay";
/// Longest mid-stay interval a rule may declare.
pub const MAX_INTERVAL_DAYS: i32 = 365;

/// Decides which cleanings a stay receives. `listing_id = None` applies to every listing.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CleaningRule {
    pub id: String,
    pub listing_id: Option<String>,
    pub name: String,
    pub cleaning_type: String,
    pub trigger_type: String,
    pub interval_days: Option<i32>,
    pub min_nights: i32,
    pub template_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewRuleParams {
    pub listing_id: Option<String>,
    pub name: String,
    pub cleaning_type: String,
    pub trigger_type: String,
    pub interval_days: Option<i32>,
    pub min_nights: i32,
    pub template_id: Option<String>,
}

impl CleaningRule {
    pub fn new(params: NewRuleParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            listing_id: params.listing_id,
            name: params.name,
            cleaning_type: params.cleaning_type,
            trigger_type: params.trigger_type,
            interval_days: params.interval_days,
            min_nights: params.min_nights,
            template_id: params.template_id,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_checkout(&self) -> bool {
        self.trigger_type == TRIGGER_CHECKOUT
    }

    pub fn is_mid_stay(&self) -> bool {
        self.trigger_type == TRIGGER_MID_STAY
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() || self.cleaning_type.trim().is_empty() {
            return Err(AppError::Validation("Rule name and cleaning type are required".into()));
        }
        if !self.is_checkout() && !self.is_mid_stay() {
            return Err(AppError::Validation(format!("Unknown trigger type '{}'", self.trigger_type)));
        }
        if self.is_mid_stay() && self.interval_days.is_none_or(|n| n <= 0 || n > MAX_INTERVAL_DAYS) {
            return Err(AppError::Validation(format!(
                "Mid-stay rules need interval_days between 1 and {}",
                MAX_INTERVAL_DAYS
            )));
        }
        if self.min_nights < 0 {
            return Err(AppError::Validation("min_nights cannot be negative".into()));
        }
        Ok(())
    }
}
