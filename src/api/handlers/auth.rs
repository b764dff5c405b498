use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::AdminLoginRequest;
use crate::domain::models::auth::AuthResponse;
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::info;

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.verify_credentials(&payload.email, &payload.password)?;

    let (access_jwt, csrf_token) = state.auth_service.issue_session()?;

    let mut access_c = Cookie::new("access_token", access_jwt);
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::hours(8));
    cookies.add(access_c);

    info!("Admin logged in");

    Ok(Json(AuthResponse { csrf_token }))
}

pub async fn logout(cookies: Cookies) -> Result<impl IntoResponse, AppError> {
    cookies.remove(Cookie::build(("access_token", "")).path("/").into());

    info!("Admin logged out");

    Ok(StatusCode::OK)
}
