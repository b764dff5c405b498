use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use crate::domain::models::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

/// Server-verified admin session. Client-held role claims are never trusted;
/// every request decodes the signed cookie and, on mutations, checks the
/// CSRF token against the claims.
pub struct AdminSession(pub Claims);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .ok_or(AppError::Internal)?;

        let access_token = cookies.get("access_token")
            .ok_or(AppError::Unauthorized)?
            .value()
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let claims = app_state.auth_service.decode_session(&access_token)?;

        let method = &parts.method;
        if method != "GET" && method != "HEAD" && method != "OPTIONS" {
            let csrf_header_val = parts.headers.get("X-CSRF-Token")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| AppError::Forbidden("Missing or invalid CSRF token".to_string()))?;

            if csrf_header_val != claims.csrf_token {
                return Err(AppError::Forbidden("Missing or invalid CSRF token".to_string()));
            }
        }

        Span::current().record("admin", claims.sub.as_str());

        Ok(AdminSession(claims))
    }
}
