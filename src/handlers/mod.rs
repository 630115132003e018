pub mod bookings;
pub mod dashboard;
pub mod events;
pub mod extract;
pub mod health;
pub mod session;
pub mod stylists;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/:id", get(bookings::get_confirmation))
        .route(
            "/api/dashboard/bookings",
            get(dashboard::list_bookings).post(dashboard::create_booking),
        )
        .route(
            "/api/dashboard/bookings/date/:date",
            get(dashboard::bookings_for_date),
        )
        .route(
            "/api/dashboard/bookings/:id",
            axum::routing::delete(dashboard::delete_booking),
        )
        .route(
            "/api/dashboard/bookings/:id/cancel",
            post(dashboard::cancel_booking),
        )
        .route(
            "/api/dashboard/bookings/:id/status",
            post(dashboard::update_status),
        )
        .route(
            "/api/dashboard/bookings/:id/stylist",
            post(dashboard::assign_stylist),
        )
        .route("/api/dashboard/calendar", get(dashboard::calendar_events))
        .route(
            "/api/dashboard/stylists",
            get(stylists::list_stylists).post(stylists::create_stylist),
        )
        .route("/api/dashboard/events", get(events::events_stream))
        .with_state(state)
}
