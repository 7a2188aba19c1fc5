//! iCalendar (RFC 5545) date and date-time values, zone resolution and
//! RFC 5546 revision ordering.

pub mod error;
pub mod rfc;
