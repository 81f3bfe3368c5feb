use crate::domain::models::{
    booking::{Booking, CandidateFilter},
    checklist::{ChecklistTemplate, CleaningRule},
    housekeeping::{HousekeepingTask, TaskFilter},
    token::IssuedToken,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn upsert(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list(&self, listing_id: Option<&str>) -> Result<Vec<Booking>, AppError>;
    /// Confirmed bookings with `check_out >= today`, ordered by checkout, capped at `limit`.
    async fn find_candidates(&self, filter: &CandidateFilter, today: NaiveDate, limit: i64) -> Result<Vec<Booking>, AppError>;
}

#[async_trait]
pub trait HousekeepingTaskRepository: Send + Sync {
    /// Inserts all tasks in one transaction.
    async fn create_many(&self, tasks: &[HousekeepingTask]) -> Result<Vec<HousekeepingTask>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<HousekeepingTask>, AppError>;
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<HousekeepingTask>, AppError>;
    async fn update(&self, task: &HousekeepingTask) -> Result<HousekeepingTask, AppError>;
    /// Subset of `booking_ids` that already have at least one task.
    async fn booking_ids_with_tasks(&self, booking_ids: &[String]) -> Result<HashSet<String>, AppError>;
}

#[async_trait]
pub trait ChecklistTemplateRepository: Send + Sync {
    async fn create(&self, template: &ChecklistTemplate) -> Result<ChecklistTemplate, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ChecklistTemplate>, AppError>;
    async fn find_default(&self, cleaning_type: &str) -> Result<Option<ChecklistTemplate>, AppError>;
    async fn list(&self) -> Result<Vec<ChecklistTemplate>, AppError>;
}

#[async_trait]
pub trait CleaningRuleRepository: Send + Sync {
    async fn create(&self, rule: &CleaningRule) -> Result<CleaningRule, AppError>;
    async fn list(&self) -> Result<Vec<CleaningRule>, AppError>;
    /// Active rules for the listing plus global ones, listing-specific first.
    async fn list_active_for_listing(&self, listing_id: &str) -> Result<Vec<CleaningRule>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// Exchanges configured credentials for a bearer token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<IssuedToken, AppError>;
}

/// Read side of the external channel manager.
#[async_trait]
pub trait ChannelManager: Send + Sync {
    async fn fetch_reservations(&self, checkout_from: NaiveDate, checkout_to: NaiveDate) -> Result<Vec<Booking>, AppError>;
}
