pub mod booking;
pub mod checklist;
pub mod housekeeping;
pub mod token;
