use std::sync::{Arc, Mutex};

use anyhow::Context;
use axum::http::HeaderValue;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use salon_booking::config::AppConfig;
use salon_booking::db::{self, queries};
use salon_booking::handlers;
use salon_booking::models::Salon;
use salon_booking::services::notification::resend::ResendEmailProvider;
use salon_booking::services::notification::{DisabledEmailProvider, EmailProvider};
use salon_booking::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    if config.owner_token.is_empty() {
        tracing::warn!("OWNER_TOKEN not set, dashboard login only works for salons already in the database");
    } else {
        queries::save_salon(
            &conn,
            &Salon {
                id: config.default_salon_id.clone(),
                name: config.default_salon_name.clone(),
                email: String::new(),
                phone: String::new(),
                address: String::new(),
                api_token: config.owner_token.clone(),
            },
        )
        .context("failed to seed default salon")?;
        tracing::info!(salon_id = %config.default_salon_id, "default salon ready");
    }

    let email: Box<dyn EmailProvider> = if config.resend_api_key.is_empty() {
        tracing::warn!("RESEND_API_KEY not set, confirmation emails are disabled");
        Box::new(DisabledEmailProvider)
    } else {
        tracing::info!("using Resend email provider (from: {})", config.email_from);
        Box::new(ResendEmailProvider::new(config.resend_api_key.clone())?)
    };

    let (events_tx, _) = broadcast::channel(256);

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        email,
        events_tx,
    });

    let cors = match &config.cors_allow_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .context("invalid CORS_ALLOW_ORIGIN")?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new(),
    };

    let app = handlers::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
