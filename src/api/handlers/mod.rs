pub mod bookings;
pub mod health;
pub mod housekeeping;
pub mod rules;
pub mod templates;
