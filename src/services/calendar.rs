use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{Booking, BookingStatus};

/// A booking shaped for a calendar widget.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub extended_props: CalendarEventProps,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventProps {
    pub salon_id: String,
    pub stylist_id: String,
    pub customer_id: String,
    pub status: BookingStatus,
    pub notes: String,
}

impl From<&Booking> for CalendarEvent {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.clone(),
            title: booking.title.clone(),
            start: booking.start_time,
            end: booking.end_time,
            extended_props: CalendarEventProps {
                salon_id: booking.salon_id.clone(),
                stylist_id: booking.stylist_id.clone(),
                customer_id: booking.customer_id.clone(),
                status: booking.status,
                notes: booking.notes.clone(),
            },
        }
    }
}

pub fn to_calendar_events(bookings: &[Booking]) -> Vec<CalendarEvent> {
    bookings.iter().map(CalendarEvent::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_event_shape() {
        let start = NaiveDateTime::parse_from_str("2025-04-01 10:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let booking = Booking {
            id: "b1".to_string(),
            salon_id: "salon-a".to_string(),
            stylist_id: "st-1".to_string(),
            customer_id: "yuki@example.jp".to_string(),
            customer_name: "Tanaka Yuki".to_string(),
            phone_number: "090-1234-5678".to_string(),
            email: "yuki@example.jp".to_string(),
            title: "Sato - Web予約".to_string(),
            notes: "first visit".to_string(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(60),
            status: BookingStatus::Confirmed,
            created_at: start,
            updated_at: start,
        };

        let events = to_calendar_events(&[booking]);
        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["title"], "Sato - Web予約");
        assert_eq!(json["start"], "2025-04-01T10:30:00");
        assert_eq!(json["end"], "2025-04-01T11:30:00");
        assert_eq!(json["extendedProps"]["stylistId"], "st-1");
        assert_eq!(json["extendedProps"]["status"], "confirmed");
    }
}
