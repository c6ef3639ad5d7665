//! Turns University of Waterloo course schedules into importable iCalendar files.
//!
//! The pipeline is: fetch each requested course's schedule from the Open Data
//! API ([`schedule::client`]), normalize the records ([`schedule::extract`]),
//! expand each meeting pattern into weekly event series
//! ([`schedule::expand`]) and serialize them ([`calendar::ics`]).

pub mod calendar;
pub mod config;
pub mod schedule;
pub mod server;
pub mod types;
