use crate::domain::models::auth::Claims;
use crate::error::AppError;
use crate::config::Config;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use argon2::{Argon2, PasswordHash, PasswordVerifier};

const SESSION_HOURS: i64 = 8;
const ISSUER: &str = "hall-booking-backend";

pub struct AuthService {
    admin_email: String,
    admin_password_hash: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        Self {
            admin_email: config.admin_email.to_lowercase(),
            admin_password_hash: config.admin_password_hash.clone(),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<(), AppError> {
        if !email.eq_ignore_ascii_case(&self.admin_email) {
            return Err(AppError::Unauthorized);
        }

        let parsed_hash = PasswordHash::new(&self.admin_password_hash)
            .map_err(|_| AppError::Internal)?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized)
    }

    /// Returns (access token, csrf token). The CSRF token is embedded in the
    /// claims and must be echoed in X-CSRF-Token on mutating requests.
    pub fn issue_session(&self) -> Result<(String, String), AppError> {
        let csrf_token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let now = Utc::now();
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: self.admin_email.clone(),
            exp: (now + Duration::hours(SESSION_HOURS)).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            csrf_token: csrf_token.clone(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        Ok((access_token, csrf_token))
    }

    pub fn decode_session(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized)?;

        Ok(token_data.claims)
    }
}
