use crate::db::queries;
use crate::errors::{AppError, ValidationErrors};
use crate::models::{Booking, BookingEventKind, BookingStatus};
use crate::services::events;
use crate::state::AppState;

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("booking {id}"))
}

/// Marks a booking cancelled. Cancelling twice is a successful no-op.
pub fn cancel(state: &AppState, salon_id: &str, id: &str) -> Result<(), AppError> {
    let updated = {
        let db = state.conn()?;
        queries::update_booking_status(&db, salon_id, id, BookingStatus::Cancelled)?
    };
    if !updated {
        return Err(not_found(id));
    }

    tracing::info!(booking_id = %id, salon_id, "booking cancelled");
    events::publish(state, BookingEventKind::Updated, salon_id, id);
    Ok(())
}

pub fn update_status(
    state: &AppState,
    salon_id: &str,
    id: &str,
    status: BookingStatus,
) -> Result<Booking, AppError> {
    let booking = {
        let db = state.conn()?;
        let current = queries::get_salon_booking(&db, salon_id, id)?.ok_or_else(|| not_found(id))?;

        if !current.status.can_transition_to(status) {
            return Err(ValidationErrors::single(
                "status",
                format!("cannot move a {} booking to {}", current.status.as_str(), status.as_str()),
            )
            .into());
        }

        queries::update_booking_status(&db, salon_id, id, status)?;
        queries::get_salon_booking(&db, salon_id, id)?.ok_or_else(|| not_found(id))?
    };

    tracing::info!(booking_id = %id, status = status.as_str(), "booking status changed");
    events::publish(state, BookingEventKind::Updated, salon_id, id);
    Ok(booking)
}

pub fn assign_stylist(
    state: &AppState,
    salon_id: &str,
    id: &str,
    stylist_id: &str,
    stylist_name: &str,
) -> Result<Booking, AppError> {
    let mut errors = ValidationErrors::new();
    if stylist_id.trim().is_empty() {
        errors.add("stylistId", "stylist is required");
    }
    if stylist_name.trim().is_empty() {
        errors.add("stylistName", "stylist name is required");
    }
    errors.into_result()?;

    let booking = {
        let db = state.conn()?;
        if !queries::assign_stylist(&db, salon_id, id, stylist_id.trim(), stylist_name.trim())? {
            return Err(not_found(id));
        }
        queries::get_salon_booking(&db, salon_id, id)?.ok_or_else(|| not_found(id))?
    };

    tracing::info!(booking_id = %id, stylist_id, "stylist assigned");
    events::publish(state, BookingEventKind::Updated, salon_id, id);
    Ok(booking)
}

pub fn delete(state: &AppState, salon_id: &str, id: &str) -> Result<(), AppError> {
    let removed = {
        let db = state.conn()?;
        queries::delete_booking(&db, salon_id, id)?
    };
    if !removed {
        return Err(not_found(id));
    }

    tracing::info!(booking_id = %id, salon_id, "booking deleted");
    events::publish(state, BookingEventKind::Deleted, salon_id, id);
    Ok(())
}
