use crate::domain::{models::booking::{Booking, CandidateFilter}, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::NaiveDate;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn upsert(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            r#"INSERT INTO bookings (id, listing_id, guest_name, check_in, check_out, status, source, synced_at, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
               listing_id=excluded.listing_id,
               guest_name=excluded.guest_name,
               check_in=excluded.check_in,
               check_out=excluded.check_out,
               status=excluded.status,
               source=excluded.source,
               synced_at=excluded.synced_at
               RETURNING *"#
        )
            .bind(&booking.id).bind(&booking.listing_id).bind(&booking.guest_name)
            .bind(booking.check_in).bind(booking.check_out).bind(&booking.status)
            .bind(&booking.source).bind(booking.synced_at).bind(booking.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, listing_id: Option<&str>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE (? IS NULL OR listing_id = ?) ORDER BY check_in ASC"
        )
            .bind(listing_id)
            .bind(listing_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_candidates(&self, filter: &CandidateFilter, today: NaiveDate, limit: i64) -> Result<Vec<Booking>, AppError> {
        let query = r#"
            SELECT * FROM bookings
            WHERE status = 'confirmed'
            AND check_out >= ?
            AND (? IS NULL OR listing_id = ?)
            AND (? IS NULL OR check_out >= ?)
            AND (? IS NULL OR check_out <= ?)
            ORDER BY check_out ASC, id ASC
            LIMIT ?
        "#;

        sqlx::query_as::<_, Booking>(query)
            .bind(today)
            .bind(&filter.listing_id).bind(&filter.listing_id)
            .bind(filter.checkout_from).bind(filter.checkout_from)
            .bind(filter.checkout_to).bind(filter.checkout_to)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
