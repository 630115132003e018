use crate::models::{BookingEvent, BookingEventKind};
use crate::state::AppState;

pub fn publish(state: &AppState, kind: BookingEventKind, salon_id: &str, booking_id: &str) {
    let event = BookingEvent {
        kind,
        salon_id: salon_id.to_string(),
        booking_id: booking_id.to_string(),
    };
    // No dashboards listening is not an error.
    let _ = state.events_tx.send(event);
}
