use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub notification_email: String,
    pub admin_email: String,
    pub admin_password_hash: String, // Argon2 PHC string
    pub jwt_secret: String,
    pub disable_rate_limit: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            notification_email: env::var("NOTIFICATION_EMAIL").expect("NOTIFICATION_EMAIL must be set (hall owner inbox)"),
            admin_email: env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL must be set"),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH").expect("ADMIN_PASSWORD_HASH must be set (Argon2 hash)"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            disable_rate_limit: env::var("DISABLE_RATE_LIMIT")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
