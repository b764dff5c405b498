use crate::domain::models::booking::{BlockedRange, Booking};
use serde::Serialize;

#[derive(Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    pub data: Booking,
}

#[derive(Serialize)]
pub struct BlockedDatesResponse {
    pub success: bool,
    pub data: Vec<BlockedRange>,
}
