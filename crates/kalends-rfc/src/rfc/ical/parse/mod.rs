//! Parsing of DATE and DATE-TIME text (RFC 5545 §3.3.4, §3.3.5).

mod error;

pub use error::{ParseError, ParseErrorKind, ParseResult};

use chrono::NaiveDateTime;

use crate::rfc::ical::core::TemporalValue;
use crate::rfc::ical::format::{self, FLOATING_DATE_TIME_FORMAT};

/// ## Summary
/// Parses DATE or DATE-TIME text using the date format table.
///
/// `YYYYMMDD'T'HHMMSS'Z'` becomes a UTC value, `YYYYMMDD'T'HHMMSS` a floating
/// value and `YYYYMMDD` a date.
///
/// ## Errors
/// Returns an error if no pattern matches or a field is out of range.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse(input: &str) -> ParseResult<TemporalValue> {
    let value = format::parse(input)?;
    tracing::trace!(form = ?value.classify(), "Parsed temporal value");
    Ok(value)
}

/// ## Summary
/// Parses floating DATE-TIME text (`YYYYMMDD'T'HHMMSS`) only.
///
/// Used where a zone is supplied out of band and the text must carry local
/// fields.
///
/// ## Errors
/// Returns an error for DATE or UTC text, or any other shape.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_floating(input: &str) -> ParseResult<NaiveDateTime> {
    match FLOATING_DATE_TIME_FORMAT.parse(input)? {
        TemporalValue::Floating(local) => Ok(local),
        other => Err(ParseError::new(ParseErrorKind::NoMatchingPattern, 1)
            .with_context(format!("{input} is not floating but {:?}", other.classify()))),
    }
}
