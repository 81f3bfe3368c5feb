use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, HousekeepingTaskRepository, ChecklistTemplateRepository,
    CleaningRuleRepository, ChannelManager,
};
use crate::domain::services::token_cache::TokenCache;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub task_repo: Arc<dyn HousekeepingTaskRepository>,
    pub template_repo: Arc<dyn ChecklistTemplateRepository>,
    pub rule_repo: Arc<dyn CleaningRuleRepository>,
    pub token_cache: Arc<TokenCache>,
    pub channel_manager: Arc<dyn ChannelManager>,
}
