use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::{AppError, ValidationErrors};
use crate::handlers::extract::AppJson;
use crate::handlers::session::Session;
use crate::models::{Booking, BookingFilter, BookingStatus};
use crate::services::calendar::{self, CalendarEvent};
use crate::services::filter;
use crate::services::intake::{self, DashboardBookingRequest};
use crate::services::management;
use crate::state::AppState;

// GET /api/dashboard/bookings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub customer_name: Option<String>,
    pub status: Option<String>,
    pub stylist_id: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<BookingsQuery> for BookingFilter {
    type Error = ValidationErrors;

    fn try_from(query: BookingsQuery) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let mut parse_date = |field: &'static str, value: Option<String>| {
            non_empty(value).and_then(|v| match NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.add(field, "expected a date as YYYY-MM-DD");
                    None
                }
            })
        };
        let start_date = parse_date("startDate", query.start_date);
        let end_date = parse_date("endDate", query.end_date);

        let status = non_empty(query.status).and_then(|s| match BookingStatus::parse(s.trim()) {
            Some(status) => Some(status),
            None => {
                errors.add("status", format!("unknown status: {s}"));
                None
            }
        });

        errors.into_result()?;

        Ok(BookingFilter {
            start_date,
            end_date,
            customer_name: non_empty(query.customer_name),
            status,
            stylist_id: non_empty(query.stylist_id),
        })
    }
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let filter = BookingFilter::try_from(query)?;

    let bookings = {
        let db = state.conn()?;
        queries::list_bookings_for_salon(&db, &session.salon_id)?
    };

    if filter.is_empty() {
        return Ok(Json(bookings));
    }
    Ok(Json(filter::filter_bookings(&bookings, &filter)))
}

// GET /api/dashboard/bookings/date/:date
pub async fn bookings_for_date(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(date): Path<String>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| ValidationErrors::single("date", "expected a date as YYYY-MM-DD"))?;

    let bookings = {
        let db = state.conn()?;
        queries::get_bookings_for_date(&db, &session.salon_id, date)?
    };
    Ok(Json(bookings))
}

// POST /api/dashboard/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    session: Session,
    AppJson(body): AppJson<DashboardBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = intake::create_dashboard_booking(&state, &session.salon_id, &body).await?;
    Ok(Json(booking))
}

// POST /api/dashboard/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    management::cancel(&state, &session.salon_id, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

// POST /api/dashboard/bookings/:id/status
#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: BookingStatus,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<String>,
    AppJson(body): AppJson<StatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = management::update_status(&state, &session.salon_id, &id, body.status)?;
    Ok(Json(booking))
}

// POST /api/dashboard/bookings/:id/stylist
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignStylistRequest {
    #[serde(default)]
    pub stylist_id: String,
    #[serde(default)]
    pub stylist_name: String,
}

pub async fn assign_stylist(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<String>,
    AppJson(body): AppJson<AssignStylistRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = management::assign_stylist(
        &state,
        &session.salon_id,
        &id,
        &body.stylist_id,
        &body.stylist_name,
    )?;
    Ok(Json(booking))
}

// DELETE /api/dashboard/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    management::delete(&state, &session.salon_id, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

// GET /api/dashboard/calendar
pub async fn calendar_events(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    let bookings = {
        let db = state.conn()?;
        queries::list_bookings_for_salon(&db, &session.salon_id)?
    };
    Ok(Json(calendar::to_calendar_events(&bookings)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_empty_filter() {
        let query = BookingsQuery {
            customer_name: Some(String::new()),
            status: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(BookingFilter::try_from(query).unwrap().is_empty());
    }

    #[test]
    fn test_query_parses_all_fields() {
        let query = BookingsQuery {
            start_date: Some("2025-04-01".to_string()),
            end_date: Some("2025-04-30".to_string()),
            customer_name: Some("Tanaka".to_string()),
            status: Some("confirmed".to_string()),
            stylist_id: Some("st-1".to_string()),
        };
        let filter = BookingFilter::try_from(query).unwrap();
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2025, 4, 1));
        assert_eq!(filter.end_date, NaiveDate::from_ymd_opt(2025, 4, 30));
        assert_eq!(filter.status, Some(BookingStatus::Confirmed));
        assert_eq!(filter.customer_name.as_deref(), Some("Tanaka"));
    }

    #[test]
    fn test_query_reports_bad_fields() {
        let query = BookingsQuery {
            start_date: Some("04/01/2025".to_string()),
            status: Some("archived".to_string()),
            ..Default::default()
        };
        let err = BookingFilter::try_from(query).unwrap_err();
        assert!(err.get("startDate").is_some());
        assert!(err.get("status").is_some());
    }
}
