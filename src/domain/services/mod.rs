pub mod booking_sync;
pub mod cleaning_rules;
pub mod defaults;
pub mod task_creation;
pub mod task_generation;
pub mod task_progress;
pub mod templates;
pub mod token_cache;
