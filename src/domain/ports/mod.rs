use crate::domain::models::booking::{BlockedRange, Booking};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts a pending booking. The rate-limit and overlap guards are
    /// re-run inside the same transaction so that of two racing submissions
    /// only one can land; the loser gets the matching policy error.
    async fn create_submission(
        &self,
        booking: &Booking,
        rate_limit_after: Option<DateTime<Utc>>,
    ) -> Result<Booking, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn find_recent_by_email(&self, email: &str, since: DateTime<Utc>) -> Result<Option<Booking>, AppError>;
    async fn find_confirmed_overlap(&self, from_date: NaiveDate, to_date: NaiveDate) -> Result<Option<Booking>, AppError>;
    async fn list_all(&self) -> Result<Vec<Booking>, AppError>;
    async fn list_by_status(&self, status: &str) -> Result<Vec<Booking>, AppError>;

    /// pending -> confirmed. Re-checks the date range against other confirmed
    /// bookings in the same transaction.
    async fn confirm(&self, id: &str, confirmed_at: DateTime<Utc>) -> Result<Booking, AppError>;
    /// pending -> rejected.
    async fn reject(&self, id: &str, reason: &str) -> Result<Booking, AppError>;

    async fn list_confirmed_ranges(&self) -> Result<Vec<BlockedRange>, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        reply_to: Option<&str>,
        subject: &str,
        html_body: &str,
    ) -> Result<(), AppError>;
}
