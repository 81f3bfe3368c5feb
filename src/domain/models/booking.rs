use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// A stay mirrored from the channel manager. Only booking sync writes these.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub listing_id: String,
    pub guest_name: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: String,
    pub source: String,
    pub synced_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub id: String,
    pub listing_id: String,
    pub guest_name: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: String,
    pub source: String,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let now = Utc::now();
        Self {
            id: params.id,
            listing_id: params.listing_id,
            guest_name: params.guest_name,
            check_in: params.check_in,
            check_out: params.check_out,
            status: params.status,
            source: params.source,
            synced_at: now,
            created_at: now,
        }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == STATUS_CONFIRMED
    }
}

/// Filters for the candidate query of the task generation batch.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub listing_id: Option<String>,
    pub checkout_from: Option<NaiveDate>,
    pub checkout_to: Option<NaiveDate>,
}
