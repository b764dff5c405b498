use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_REJECTED: &str = "rejected";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_type: String,
    pub guests: i32,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub check_in: String,
    pub check_out: String,
    pub message: Option<String>,
    pub ip: Option<String>,
    pub status: String,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_type: String,
    pub guests: i32,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub check_in: String,
    pub check_out: String,
    pub message: Option<String>,
    pub ip: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            // Normalized once here; the rate limit compares emails verbatim.
            email: params.email.to_lowercase(),
            phone: params.phone,
            event_type: params.event_type,
            guests: params.guests,
            from_date: params.from_date,
            to_date: params.to_date,
            check_in: params.check_in,
            check_out: params.check_out,
            message: params.message,
            ip: params.ip,
            status: STATUS_PENDING.to_string(),
            confirmed_at: None,
            rejection_reason: None,
            created_at: Utc::now(),
        }
    }
}

/// Confirmed date span exposed to the public booking form.
#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BlockedRange {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}
