use axum::{extract::{ConnectInfo, State}, http::{HeaderMap, StatusCode}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{validation_message, CreateBookingRequest};
use crate::api::dtos::responses::{BlockedDatesResponse, SubmissionResponse};
use crate::domain::models::booking::{Booking, NewBookingParams};
use crate::domain::services::notifications;
use crate::domain::services::policy::{self, Candidate, Decision};
use crate::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use tracing::{error, info, warn};
use validator::Validate;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let from_date = NaiveDate::parse_from_str(&payload.from_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid from date".into()))?;
    let to_date = NaiveDate::parse_from_str(&payload.to_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid to date".into()))?;
    if to_date < from_date {
        return Err(AppError::Validation("To date cannot be before from date".into()));
    }

    let check_in = NaiveTime::parse_from_str(&payload.check_in, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid check-in time (HH:MM)".into()))?;
    let check_out = NaiveTime::parse_from_str(&payload.check_out, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid check-out time (HH:MM)".into()))?;
    if check_out <= check_in {
        return Err(AppError::Validation("Check-out time must be after check-in time".into()));
    }

    let email = payload.email.to_lowercase();
    let now = Utc::now();
    let window_start = now - Duration::hours(policy::RATE_LIMIT_WINDOW_HOURS);

    // Snapshot the bookings the decision depends on, then run the pure
    // policy over it. The repository re-runs both guards in the insert
    // transaction to close the check-then-act race.
    let mut existing = Vec::new();
    if let Some(recent) = state.booking_repo.find_recent_by_email(&email, window_start).await? {
        existing.push(recent);
    }
    if let Some(overlap) = state.booking_repo.find_confirmed_overlap(from_date, to_date).await? {
        existing.push(overlap);
    }

    let candidate = Candidate { email: &email, from_date, to_date };
    match policy::evaluate_submission(&candidate, &existing, now, state.config.disable_rate_limit) {
        Decision::RateLimited => {
            warn!("Submission rate limited for {}", email);
            return Err(AppError::RateLimited("You can submit only once every 24 hours.".into()));
        }
        Decision::Overlap => {
            warn!("Submission rejected: dates {} - {} already booked", from_date, to_date);
            return Err(AppError::Conflict(
                "These dates are already booked. Please choose different dates.".into(),
            ));
        }
        Decision::Accept => {}
    }

    // First hop of x-forwarded-for when behind a proxy, peer address otherwise.
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
        .unwrap_or_else(|| peer.ip().to_string());

    let booking = Booking::new(NewBookingParams {
        name: payload.name,
        email,
        phone: payload.phone,
        event_type: payload.event_type,
        guests: payload.guests,
        from_date,
        to_date,
        check_in: payload.check_in,
        check_out: payload.check_out,
        message: payload.message,
        ip: Some(ip),
    });

    let rate_limit_after = if state.config.disable_rate_limit {
        None
    } else {
        Some(window_start)
    };
    let created = state.booking_repo.create_submission(&booking, rate_limit_after).await?;
    info!("Booking request saved: {} ({} - {})", created.id, created.from_date, created.to_date);

    // Owner notification is fire-and-forget: the booking is already
    // persisted, delivery failure only gets logged.
    match notifications::new_request_email(&state.templates, &created) {
        Ok((subject, html)) => {
            let mail_state = state.clone();
            let recipient = state.config.notification_email.clone();
            let reply_to = created.email.clone();
            tokio::spawn(async move {
                if let Err(e) = mail_state.email_service.send(&recipient, Some(&reply_to), &subject, &html).await {
                    error!("Failed to deliver owner notification: {:?}", e);
                }
            });
        }
        Err(e) => error!("Failed to render owner notification: {:?}", e),
    }

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            success: true,
            message: "Booking request received and awaiting review".to_string(),
            data: created,
        }),
    ))
}

pub async fn get_blocked_dates(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let data = state.booking_repo.list_confirmed_ranges().await?;
    Ok(Json(BlockedDatesResponse { success: true, data }))
}
