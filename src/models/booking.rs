use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Placeholder stored in `stylist_id` until an owner assigns someone.
pub const UNASSIGNED_STYLIST: &str = "unassigned";

/// Title given to bookings submitted through the public form.
pub const WEB_BOOKING_TITLE: &str = "Web予約";

/// Fixed appointment length for web bookings.
pub const APPOINTMENT_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub salon_id: String,
    pub stylist_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub title: String,
    pub notes: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    /// Cancelled bookings never return to an active state.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        !matches!(self, BookingStatus::Cancelled) || next == BookingStatus::Cancelled
    }
}

/// Dashboard search criteria. Every field is optional; an empty filter
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub customer_name: Option<String>,
    pub status: Option<BookingStatus>,
    pub stylist_id: Option<String>,
}

impl BookingFilter {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.customer_name.is_none()
            && self.status.is_none()
            && self.stylist_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("archived"), None);
    }

    #[test]
    fn test_cancelled_is_terminal() {
        assert!(BookingStatus::Cancelled.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Pending));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BookingStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }

    #[test]
    fn test_default_filter_is_empty() {
        assert!(BookingFilter::default().is_empty());
        let filter = BookingFilter {
            stylist_id: Some("st-1".to_string()),
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }
}
