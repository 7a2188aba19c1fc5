//! Cross-module tests for iCalendar temporal values.

mod ordering;
mod round_trip;
