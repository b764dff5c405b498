use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10}$").unwrap());

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(regex(
        path = *PHONE_REGEX,
        message = "Phone number must be exactly 10 digits"
    ))]
    pub phone: String,
    #[validate(length(min = 1, message = "Event type is required"))]
    pub event_type: String,
    #[validate(range(min = 1, message = "Guests must be a positive integer"))]
    pub guests: i32,
    pub from_date: String,
    pub to_date: String,
    #[validate(length(min = 1, message = "Check-in time is required"))]
    pub check_in: String,
    #[validate(length(min = 1, message = "Check-out time is required"))]
    pub check_out: String,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectBookingRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusFilterQuery {
    pub status: Option<String>,
}

/// Flattens validator output into a single user-facing message.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid input".to_string())
        })
        .collect();
    messages.sort();
    messages.join(", ")
}
