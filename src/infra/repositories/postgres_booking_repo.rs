use crate::domain::{models::booking::{Booking, CandidateFilter}, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn upsert(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            r#"INSERT INTO bookings (id, listing_id, guest_name, check_in, check_out, status, source, synced_at, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               ON CONFLICT (id) DO UPDATE SET
               listing_id = EXCLUDED.listing_id,
               guest_name = EXCLUDED.guest_name,
               check_in = EXCLUDED.check_in,
               check_out = EXCLUDED.check_out,
               status = EXCLUDED.status,
               source = EXCLUDED.source,
               synced_at = EXCLUDED.synced_at
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
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, listing_id: Option<&str>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE ($1::text IS NULL OR listing_id = $1) ORDER BY check_in ASC"
        )
            .bind(listing_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_candidates(&self, filter: &CandidateFilter, today: NaiveDate, limit: i64) -> Result<Vec<Booking>, AppError> {
        let query = r#"
            SELECT * FROM bookings
            WHERE status = 'confirmed'
            AND check_out >= $1
            AND ($2::text IS NULL OR listing_id = $2)
            AND ($3::date IS NULL OR check_out >= $3)
            AND ($4::date IS NULL OR check_out <= $4)
            ORDER BY check_out ASC, id ASC
            LIMIT $5
        "#;

        sqlx::query_as::<_, Booking>(query)
            .bind(today)
            .bind(&filter.listing_id)
            .bind(filter.checkout_from)
            .bind(filter.checkout_to)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
