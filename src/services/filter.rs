use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{Booking, BookingFilter};

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    // 23:59:59.999, matching the millisecond resolution of the dashboard.
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| start_of_day(date))
}

/// Whether one booking satisfies every criterion set on `filter`.
///
/// Both date bounds are inclusive and compare against the booking's start
/// time, so an appointment starting on `end_date` matches even if it runs
/// past midnight.
pub fn matches(booking: &Booking, filter: &BookingFilter) -> bool {
    if let Some(start) = filter.start_date {
        if booking.start_time < start_of_day(start) {
            return false;
        }
    }

    if let Some(end) = filter.end_date {
        if booking.start_time > end_of_day(end) {
            return false;
        }
    }

    if let Some(name) = &filter.customer_name {
        if !booking
            .customer_name
            .to_lowercase()
            .contains(&name.to_lowercase())
        {
            return false;
        }
    }

    if let Some(status) = filter.status {
        if booking.status != status {
            return false;
        }
    }

    if let Some(stylist_id) = &filter.stylist_id {
        if &booking.stylist_id != stylist_id {
            return false;
        }
    }

    true
}

pub fn filter_bookings(bookings: &[Booking], filter: &BookingFilter) -> Vec<Booking> {
    bookings
        .iter()
        .filter(|b| matches(b, filter))
        .cloned()
        .collect()
}
