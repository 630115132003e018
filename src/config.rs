use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub resend_api_key: String,
    pub email_from: String,
    /// Salon seeded at startup so a fresh install has a usable dashboard login.
    pub default_salon_id: String,
    pub default_salon_name: String,
    pub owner_token: String,
    pub cors_allow_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "salon.db".to_string()),
            resend_api_key: env::var("RESEND_API_KEY").unwrap_or_default(),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "info@salon-booking.jp".to_string()),
            default_salon_id: env::var("DEFAULT_SALON_ID")
                .unwrap_or_else(|_| "default".to_string()),
            default_salon_name: env::var("DEFAULT_SALON_NAME").unwrap_or_default(),
            owner_token: env::var("OWNER_TOKEN").unwrap_or_default(),
            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN").ok().filter(|v| !v.is_empty()),
        }
    }
}
