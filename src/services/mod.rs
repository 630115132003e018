pub mod calendar;
pub mod events;
pub mod filter;
pub mod intake;
pub mod management;
pub mod notification;
