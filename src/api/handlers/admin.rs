use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{RejectBookingRequest, StatusFilterQuery};
use crate::api::extractors::auth::AdminSession;
use crate::domain::models::booking::{STATUS_CONFIRMED, STATUS_PENDING, STATUS_REJECTED};
use crate::domain::services::notifications;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::{error, info};

pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_status(STATUS_PENDING).await?;
    Ok(Json(bookings))
}

pub async fn list_all(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Query(query): Query<StatusFilterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = match query.status.as_deref() {
        None | Some("all") => state.booking_repo.list_all().await?,
        Some(status @ (STATUS_PENDING | STATUS_CONFIRMED | STATUS_REJECTED)) => {
            state.booking_repo.list_by_status(status).await?
        }
        Some(other) => {
            return Err(AppError::Validation(format!("Unknown status filter: {}", other)));
        }
    };
    Ok(Json(bookings))
}

pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let confirmed = state.booking_repo.confirm(&booking_id, Utc::now()).await?;
    info!("Booking confirmed: {} ({} - {})", confirmed.id, confirmed.from_date, confirmed.to_date);

    match notifications::confirmation_email(&state.templates, &confirmed) {
        Ok((subject, html)) => {
            let mail_state = state.clone();
            let recipient = confirmed.email.clone();
            tokio::spawn(async move {
                if let Err(e) = mail_state.email_service.send(&recipient, None, &subject, &html).await {
                    error!("Failed to deliver confirmation mail: {:?}", e);
                }
            });
        }
        Err(e) => error!("Failed to render confirmation mail: {:?}", e),
    }

    Ok(Json(confirmed))
}

pub async fn reject_booking(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Path(booking_id): Path<String>,
    Json(payload): Json<RejectBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reason = payload.reason.trim().to_string();
    if reason.is_empty() {
        return Err(AppError::Validation("Rejection reason is required".into()));
    }

    let rejected = state.booking_repo.reject(&booking_id, &reason).await?;
    info!("Booking rejected: {} (reason: {})", rejected.id, reason);

    match notifications::rejection_email(&state.templates, &rejected, &reason) {
        Ok((subject, html)) => {
            let mail_state = state.clone();
            let recipient = rejected.email.clone();
            tokio::spawn(async move {
                if let Err(e) = mail_state.email_service.send(&recipient, None, &subject, &html).await {
                    error!("Failed to deliver rejection mail: {:?}", e);
                }
            });
        }
        Err(e) => error!("Failed to render rejection mail: {:?}", e),
    }

    Ok(Json(rejected))
}
