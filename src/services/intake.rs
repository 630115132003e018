use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::{AppError, ValidationErrors};
use crate::models::{
    Booking, BookingEventKind, BookingStatus, APPOINTMENT_MINUTES, UNASSIGNED_STYLIST,
    WEB_BOOKING_TITLE,
};
use crate::services::{events, notification};
use crate::state::AppState;

/// Loose Japanese phone format: `03-1234-5678`, `090-1234-5678`, `09012345678`.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2,4}-?[0-9]{3,4}-?[0-9]{4}$").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("valid regex")
});

const MIN_NAME_CHARS: usize = 2;

/// Public booking form submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingRequest {
    pub salon_id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub notes: Option<String>,
    pub date: String,
    pub time: String,
}

/// Owner-entered booking from the dashboard. Carries an explicit end time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardBookingRequest {
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub notes: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub stylist_id: Option<String>,
}

fn validate_contact(
    errors: &mut ValidationErrors,
    customer_name: &str,
    phone_number: &str,
    email: &str,
) {
    if customer_name.trim().chars().count() < MIN_NAME_CHARS {
        errors.add("customerName", "name must be at least 2 characters");
    }
    if !PHONE_RE.is_match(phone_number.trim()) {
        errors.add("phoneNumber", "invalid phone number");
    }
    if !EMAIL_RE.is_match(email.trim()) {
        errors.add("email", "invalid email address");
    }
}

fn parse_date(errors: &mut ValidationErrors, field: &'static str, s: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            errors.add(field, "expected a date as YYYY-MM-DD");
            None
        }
    }
}

fn parse_time(errors: &mut ValidationErrors, field: &'static str, s: &str) -> Option<NaiveTime> {
    match NaiveTime::parse_from_str(s.trim(), "%H:%M") {
        Ok(t) => Some(t),
        Err(_) => {
            errors.add(field, "expected a time as HH:MM");
            None
        }
    }
}

/// Interprets `date` and `time` as salon-local civil time and returns the
/// fixed-length appointment interval starting there.
pub fn appointment_interval(
    date: &str,
    time: &str,
) -> Result<(NaiveDateTime, NaiveDateTime), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let date = parse_date(&mut errors, "date", date);
    let time = parse_time(&mut errors, "time", time);

    match (date, time) {
        (Some(d), Some(t)) => {
            let start = d.and_time(t);
            Ok((start, start + Duration::minutes(APPOINTMENT_MINUTES)))
        }
        _ => Err(errors),
    }
}

pub fn validate_web_request(req: &BookingRequest) -> Result<Booking, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if req.salon_id.trim().is_empty() {
        errors.add("salonId", "salon is required");
    }
    validate_contact(
        &mut errors,
        &req.customer_name,
        &req.phone_number,
        &req.email,
    );

    let interval = appointment_interval(&req.date, &req.time);
    if let Err(interval_errors) = &interval {
        for field in interval_errors.fields() {
            if let Some(msg) = interval_errors.get(field) {
                errors.add(field, msg);
            }
        }
    }
    errors.into_result()?;

    let (start_time, end_time) = interval?;
    let now = Utc::now().naive_utc();
    let email = req.email.trim().to_string();

    Ok(Booking {
        id: uuid::Uuid::new_v4().to_string(),
        salon_id: req.salon_id.trim().to_string(),
        stylist_id: UNASSIGNED_STYLIST.to_string(),
        customer_id: email.clone(),
        customer_name: req.customer_name.trim().to_string(),
        phone_number: req.phone_number.trim().to_string(),
        email,
        title: WEB_BOOKING_TITLE.to_string(),
        notes: req.notes.clone().unwrap_or_default(),
        start_time,
        end_time,
        status: BookingStatus::Confirmed,
        created_at: now,
        updated_at: now,
    })
}

pub fn validate_dashboard_request(
    salon_id: &str,
    req: &DashboardBookingRequest,
) -> Result<Booking, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    validate_contact(
        &mut errors,
        &req.customer_name,
        &req.phone_number,
        &req.email,
    );

    let date = parse_date(&mut errors, "date", &req.date);
    let start = parse_time(&mut errors, "startTime", &req.start_time);
    let end = parse_time(&mut errors, "endTime", &req.end_time);

    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            errors.add("endTime", "end time must be after start time");
        }
    }
    errors.into_result()?;

    // All three parsed if no errors were recorded.
    let (Some(date), Some(start), Some(end)) = (date, start, end) else {
        return Err(ValidationErrors::single("date", "invalid appointment time"));
    };

    let now = Utc::now().naive_utc();
    let email = req.email.trim().to_string();
    let customer_name = req.customer_name.trim().to_string();
    let stylist_id = req
        .stylist_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNASSIGNED_STYLIST)
        .to_string();

    Ok(Booking {
        id: uuid::Uuid::new_v4().to_string(),
        salon_id: salon_id.to_string(),
        stylist_id,
        customer_id: email.clone(),
        title: customer_name.clone(),
        customer_name,
        phone_number: req.phone_number.trim().to_string(),
        email,
        notes: req.notes.clone().unwrap_or_default(),
        start_time: date.and_time(start),
        end_time: date.and_time(end),
        status: BookingStatus::Pending,
        created_at: now,
        updated_at: now,
    })
}

/// Validates, persists, announces and emails a public booking. Returns the
/// stored booking; the confirmation email never affects the outcome.
pub async fn create_web_booking(
    state: &AppState,
    req: &BookingRequest,
) -> Result<Booking, AppError> {
    let booking = validate_web_request(req)?;

    {
        let db = state.conn()?;
        queries::create_booking(&db, &booking)?;
    }

    tracing::info!(
        booking_id = %booking.id,
        salon_id = %booking.salon_id,
        start_time = %booking.start_time,
        "web booking created"
    );
    events::publish(state, BookingEventKind::Created, &booking.salon_id, &booking.id);

    notification::send_booking_confirmation(
        state.email.as_ref(),
        &state.config.email_from,
        &booking,
    )
    .await;

    Ok(booking)
}

pub async fn create_dashboard_booking(
    state: &AppState,
    salon_id: &str,
    req: &DashboardBookingRequest,
) -> Result<Booking, AppError> {
    let booking = validate_dashboard_request(salon_id, req)?;

    {
        let db = state.conn()?;
        queries::create_booking(&db, &booking)?;
    }

    tracing::info!(booking_id = %booking.id, salon_id, "dashboard booking created");
    events::publish(state, BookingEventKind::Created, salon_id, &booking.id);

    Ok(booking)
}
