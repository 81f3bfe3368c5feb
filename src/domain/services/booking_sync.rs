use std::sync::Arc;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};
use crate::domain::ports::{BookingRepository, ChannelManager};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct SyncSummary {
    pub fetched: usize,
    pub upserted: usize,
    pub failed: usize,
}

/// Mirrors channel-manager reservations into the local bookings table.
pub struct BookingSyncService {
    channel_manager: Arc<dyn ChannelManager>,
    booking_repo: Arc<dyn BookingRepository>,
}

impl BookingSyncService {
    pub fn new(channel_manager: Arc<dyn ChannelManager>, booking_repo: Arc<dyn BookingRepository>) -> Self {
        Self { channel_manager, booking_repo }
    }

    /// Pulls reservations checking out between yesterday and `today + horizon_days`.
    pub async fn sync(&self, today: NaiveDate, horizon_days: i64) -> Result<SyncSummary, AppError> {
        let from = today - Duration::days(1);
        let to = today + Duration::days(horizon_days.max(0));

        let reservations = self.channel_manager.fetch_reservations(from, to).await?;
        let fetched = reservations.len();

        let mut upserted = 0;
        let mut failed = 0;
        for booking in &reservations {
            match self.booking_repo.upsert(booking).await {
                Ok(_) => upserted += 1,
                Err(e) => {
                    warn!("Failed to store reservation {}: {}", booking.id, e);
                    failed += 1;
                }
            }
        }

        info!("Booking sync {}..{}: fetched {}, stored {}, failed {}", from, to, fetched, upserted, failed);
        Ok(SyncSummary { fetched, upserted, failed })
    }
}
