//! iCalendar RFC 5545 temporal values.
//!
//! - `core`: temporal value, legacy date types and a minimal property model
//! - `format`: the date format table used for parsing and formatting
//! - `parse`: parse entry point and error types
//! - `expand`: zone resolution
//! - `adapter`: [`TemporalAdapter`], the facade most callers use
//! - `sequence`: RFC 5546 revision ordering
//!
//! ## Example
//!
//! ```rust
//! use kalends_rfc::rfc::ical::TemporalAdapter;
//!
//! let dtstart = TemporalAdapter::parse("20240115T093000Z").unwrap();
//! assert!(dtstart.value().unwrap().is_utc());
//! assert_eq!(dtstart.to_text().unwrap(), "20240115T093000Z");
//! ```

pub mod adapter;
pub mod core;
pub mod expand;
pub mod format;
pub mod parse;
pub mod sequence;

#[cfg(test)]
mod tests;

pub use adapter::{TemporalAdapter, TzId};
pub use self::core::{
    Classification, Component, ComponentKind, Property, PropertyLookup, TemporalValue,
};
pub use parse::{ParseError, ParseResult, parse};
pub use sequence::{ComponentSequenceComparator, RevisionKey};
