use crate::domain::models::booking::{BlockedRange, Booking, STATUS_CONFIRMED, STATUS_PENDING, STATUS_REJECTED};
use crate::domain::ports::BookingRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use chrono::{DateTime, NaiveDate, Utc};

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
    async fn create_submission(
        &self,
        booking: &Booking,
        rate_limit_after: Option<DateTime<Utc>>,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(window_start) = rate_limit_after {
            let recent = sqlx::query("SELECT id FROM bookings WHERE email = ? AND created_at >= ? LIMIT 1")
                .bind(&booking.email)
                .bind(window_start)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            if recent.is_some() {
                return Err(AppError::RateLimited(
                    "You can submit only once every 24 hours.".to_string(),
                ));
            }
        }

        let clashes = sqlx::query(
            "SELECT COUNT(*) as count FROM bookings WHERE status = ? AND from_date <= ? AND to_date >= ?",
        )
        .bind(STATUS_CONFIRMED)
        .bind(booking.to_date)
        .bind(booking.from_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;
        if clashes.get::<i64, _>("count") > 0 {
            return Err(AppError::Conflict(
                "These dates are already booked. Please choose different dates.".to_string(),
            ));
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, name, email, phone, event_type, guests, from_date, to_date, check_in, check_out, message, ip, status, confirmed_at, rejection_reason, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&booking.id).bind(&booking.name).bind(&booking.email).bind(&booking.phone)
        .bind(&booking.event_type).bind(booking.guests).bind(booking.from_date).bind(booking.to_date)
        .bind(&booking.check_in).bind(&booking.check_out).bind(&booking.message).bind(&booking.ip)
        .bind(&booking.status).bind(booking.confirmed_at).bind(&booking.rejection_reason).bind(booking.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_recent_by_email(&self, email: &str, since: DateTime<Utc>) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE email = ? AND created_at >= ? ORDER BY created_at DESC LIMIT 1",
        )
        .bind(email)
        .bind(since)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_confirmed_overlap(&self, from_date: NaiveDate, to_date: NaiveDate) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE status = ? AND from_date <= ? AND to_date >= ? LIMIT 1",
        )
        .bind(STATUS_CONFIRMED)
        .bind(to_date)
        .bind(from_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_status(&self, status: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE status = ? ORDER BY created_at ASC")
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn confirm(&self, id: &str, confirmed_at: DateTime<Utc>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let existing = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".to_string()))?;

        if existing.status != STATUS_PENDING {
            return Err(AppError::Conflict(format!(
                "Booking is already {} and cannot be confirmed",
                existing.status
            )));
        }

        // Another request may have been confirmed for these dates since
        // submission; confirming this one would break the no-overlap invariant.
        let clashes = sqlx::query(
            "SELECT COUNT(*) as count FROM bookings WHERE status = ? AND id != ? AND from_date <= ? AND to_date >= ?",
        )
        .bind(STATUS_CONFIRMED)
        .bind(id)
        .bind(existing.to_date)
        .bind(existing.from_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;
        if clashes.get::<i64, _>("count") > 0 {
            return Err(AppError::Conflict(
                "These dates were already confirmed for another booking.".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = ?, confirmed_at = ? WHERE id = ? AND status = ? RETURNING *",
        )
        .bind(STATUS_CONFIRMED)
        .bind(confirmed_at)
        .bind(id)
        .bind(STATUS_PENDING)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Conflict("Booking is no longer pending".to_string()))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn reject(&self, id: &str, reason: &str) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let existing = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".to_string()))?;

        if existing.status != STATUS_PENDING {
            return Err(AppError::Conflict(format!(
                "Booking is already {} and cannot be rejected",
                existing.status
            )));
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = ?, rejection_reason = ? WHERE id = ? AND status = ? RETURNING *",
        )
        .bind(STATUS_REJECTED)
        .bind(reason)
        .bind(id)
        .bind(STATUS_PENDING)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Conflict("Booking is no longer pending".to_string()))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn list_confirmed_ranges(&self) -> Result<Vec<BlockedRange>, AppError> {
        sqlx::query_as::<_, BlockedRange>(
            "SELECT from_date, to_date FROM bookings WHERE status = ? ORDER BY from_date ASC",
        )
        .bind(STATUS_CONFIRMED)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
