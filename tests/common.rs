#![allow(dead_code)]

use hall_booking_backend::{
    api::router::create_router,
    config::Config,
    domain::ports::EmailService,
    domain::services::auth_service::AuthService,
    error::AppError,
    infra::factory::load_templates,
    infra::repositories::sqlite_booking_repo::SqliteBookingRepo,
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{header, Request},
    Router,
};
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use async_trait::async_trait;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@hall.test";
pub const ADMIN_PASSWORD: &str = "test-admin-secret";
pub const OWNER_EMAIL: &str = "owner@hall.test";

#[derive(Clone, Debug)]
pub struct SentEmail {
    pub recipient: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: String,
}

pub struct MockEmailService {
    pub sent: Arc<Mutex<Vec<SentEmail>>>,
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(
        &self,
        recipient: &str,
        reply_to: Option<&str>,
        subject: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            reply_to: reply_to.map(|r| r.to_string()),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub sent_emails: Arc<Mutex<Vec<SentEmail>>>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(false).await
    }

    pub async fn with_rate_limit_disabled() -> Self {
        Self::build(true).await
    }

    async fn build(disable_rate_limit: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let salt = SaltString::generate(&mut rand::thread_rng());
        let admin_password_hash = Argon2::default()
            .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
            .expect("Failed to hash test admin password")
            .to_string();

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            notification_email: OWNER_EMAIL.to_string(),
            admin_email: ADMIN_EMAIL.to_string(),
            admin_password_hash,
            jwt_secret: "test-jwt-secret".to_string(),
            disable_rate_limit,
        };

        let sent_emails = Arc::new(Mutex::new(Vec::new()));

        let state = Arc::new(AppState {
            config: config.clone(),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            auth_service: Arc::new(AuthService::new(&config)),
            email_service: Arc::new(MockEmailService { sent: sent_emails.clone() }),
            templates: Arc::new(load_templates()),
        });

        let router = create_router(state.clone())
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 41234))));

        Self {
            router,
            pool,
            db_filename,
            state,
            sent_emails,
        }
    }

    pub async fn login(&self) -> AuthHeaders {
        let payload = json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies.iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start + end].to_string();

        let body_json = parse_body(response).await;
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token,
        }
    }

    pub async fn submit(&self, payload: Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/booking")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn booking_payload(email: &str, from_date: &str, to_date: &str) -> Value {
    json!({
        "name": "Verification User",
        "email": email,
        "phone": "9998887777",
        "eventType": "Corporate",
        "guests": 50,
        "fromDate": from_date,
        "toDate": to_date,
        "checkIn": "09:00",
        "checkOut": "11:00",
        "message": "Test booking"
    })
}
