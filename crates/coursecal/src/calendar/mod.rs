//! iCalendar output for expanded course schedules.

pub mod ics;
pub mod name;
pub mod timezone;

pub use ics::generate_ics;
pub use name::{document_name, DocumentName};
