pub mod sqlite_booking_repo;
pub mod sqlite_task_repo;
pub mod sqlite_template_repo;
pub mod sqlite_rule_repo;

pub mod postgres_booking_repo;
pub mod postgres_task_repo;
pub mod postgres_template_repo;
pub mod postgres_rule_repo;
