pub mod booking;
pub mod event;
pub mod salon;
pub mod stylist;

pub use booking::{
    Booking, BookingFilter, BookingStatus, APPOINTMENT_MINUTES, UNASSIGNED_STYLIST,
    WEB_BOOKING_TITLE,
};
pub use event::{BookingEvent, BookingEventKind};
pub use salon::Salon;
pub use stylist::Stylist;
