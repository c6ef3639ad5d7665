pub mod calendar;
pub mod status;
