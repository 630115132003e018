use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::extract::AppJson;
use crate::models::BookingStatus;
use crate::services::intake::{self, BookingRequest};
use crate::state::AppState;

// POST /bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<BookingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let booking = intake::create_web_booking(&state, &body).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "bookingId": booking.id,
    })))
}

// GET /bookings/:id
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationResponse {
    id: String,
    customer_name: String,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    status: BookingStatus,
}

pub async fn get_confirmation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ConfirmationResponse>, AppError> {
    let booking = {
        let db = state.conn()?;
        queries::get_booking_by_id(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    Ok(Json(ConfirmationResponse {
        id: booking.id,
        customer_name: booking.customer_name,
        start_time: booking.start_time,
        end_time: booking.end_time,
        status: booking.status,
    }))
}
