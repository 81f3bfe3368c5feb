pub mod channel_manager;
pub mod factory;
pub mod repositories;
