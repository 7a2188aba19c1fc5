//! Date format table (RFC 5545 §3.3.4, §3.3.5).
//!
//! Each [`CalendarDateFormat`] pairs a fixed-width pattern with an ordered
//! list of [`Selector`]s. Parsing reads the pattern and then tries the
//! selectors left to right; the first one that can build a value decides which
//! [`TemporalValue`] form the text becomes. Formatting runs the same pattern in
//! reverse.

pub mod pattern;

use std::borrow::Cow;
use std::fmt;

use chrono::format::{ParseErrorKind as ChronoErrorKind, Parsed};
use chrono::{NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

pub use pattern::Item;

use crate::rfc::ical::core::{Classification, TemporalValue};
use crate::rfc::ical::parse::{ParseError, ParseErrorKind, ParseResult};

/// Chooses which [`TemporalValue`] form a successfully read pattern becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// An absolute instant; needs an offset in the parsed fields.
    Utc,
    /// A local date-time without zone; needs clock fields.
    Floating,
    /// A calendar date.
    Date,
}

impl Selector {
    /// Attempts to build a value from parsed fields, `None` if the fields do
    /// not carry what this form needs.
    fn build(self, parsed: &Parsed) -> Option<TemporalValue> {
        match self {
            Self::Utc => parsed
                .to_datetime()
                .ok()
                .map(|dt| TemporalValue::Utc(dt.with_timezone(&Utc))),
            Self::Floating => parsed
                .to_naive_datetime_with_offset(0)
                .ok()
                .map(TemporalValue::Floating),
            Self::Date => parsed.to_naive_date().ok().map(TemporalValue::Date),
        }
    }
}

/// A pattern cannot render a value of the given form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The pattern writes clock fields but the value is date-only.
    #[error("pattern {pattern} needs a time of day but the value is date-only")]
    MissingTime {
        /// The offending pattern.
        pattern: String,
    },

    /// The pattern is pinned to a zone but the value has no absolute instant.
    #[error("pattern {pattern} is pinned to {zone} but a {form:?} value has no instant")]
    NoInstant {
        /// The offending pattern.
        pattern: String,
        /// Zone the pattern renders in.
        zone: Tz,
        /// Classification of the value.
        form: Classification,
    },
}

/// A pattern plus the selectors that turn its fields into a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDateFormat {
    items: Cow<'static, [Item]>,
    selectors: Cow<'static, [Selector]>,
    /// Zone every value is converted to before rendering.
    zone: Option<Tz>,
}

/// `yyyyMMdd` — DATE values.
pub static DATE_FORMAT: CalendarDateFormat =
    CalendarDateFormat::from_static(&[Item::Year, Item::Month, Item::Day], &[Selector::Date]);

/// `yyyyMMdd'T'HHmmss` — floating DATE-TIME values (FORM #1).
pub static FLOATING_DATE_TIME_FORMAT: CalendarDateFormat = CalendarDateFormat::from_static(
    &[
        Item::Year,
        Item::Month,
        Item::Day,
        Item::Literal('T'),
        Item::Hour,
        Item::Minute,
        Item::Second,
    ],
    &[Selector::Floating],
);

/// `yyyyMMdd'T'HHmmss'Z'` — UTC DATE-TIME values (FORM #2).
pub static UTC_DATE_TIME_FORMAT: CalendarDateFormat = CalendarDateFormat::from_static_in(
    &[
        Item::Year,
        Item::Month,
        Item::Day,
        Item::Literal('T'),
        Item::Hour,
        Item::Minute,
        Item::Second,
        Item::Literal('Z'),
    ],
    &[Selector::Utc],
    Tz::UTC,
);

/// Formats tried by [`parse`], in priority order.
pub static PARSE_TABLE: [&CalendarDateFormat; 3] = [
    &UTC_DATE_TIME_FORMAT,
    &FLOATING_DATE_TIME_FORMAT,
    &DATE_FORMAT,
];

impl CalendarDateFormat {
    /// Creates a format from static items and selectors.
    #[must_use]
    pub const fn from_static(items: &'static [Item], selectors: &'static [Selector]) -> Self {
        Self {
            items: Cow::Borrowed(items),
            selectors: Cow::Borrowed(selectors),
            zone: None,
        }
    }

    /// Creates a format that renders every value in `zone`.
    #[must_use]
    pub const fn from_static_in(
        items: &'static [Item],
        selectors: &'static [Selector],
        zone: Tz,
    ) -> Self {
        Self {
            items: Cow::Borrowed(items),
            selectors: Cow::Borrowed(selectors),
            zone: Some(zone),
        }
    }

    /// ## Summary
    /// Compiles a format from pattern notation, e.g. `yyyy-MM-dd'T'HH:mm:ss`.
    ///
    /// A pattern whose last item is a literal `Z` is pinned to UTC, matching
    /// the built-in UTC format.
    ///
    /// ## Errors
    /// Returns a [`ParseErrorKind::InvalidPattern`] error if the pattern uses
    /// unsupported fields.
    pub fn compile(pattern: &str, selectors: &[Selector]) -> ParseResult<Self> {
        let items = pattern::compile(pattern)?;
        let zone = matches!(items.last(), Some(Item::Literal('Z'))).then_some(Tz::UTC);
        Ok(Self {
            items: Cow::Owned(items),
            selectors: Cow::Owned(selectors.to_vec()),
            zone,
        })
    }

    /// The pattern items.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The selectors, in the order they are tried.
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// The zone this format is pinned to, if any.
    #[must_use]
    pub const fn zone(&self) -> Option<Tz> {
        self.zone
    }

    /// Returns whether the pattern contains clock fields.
    #[must_use]
    pub fn has_time(&self) -> bool {
        self.items.iter().any(|item| item.is_time())
    }

    /// ## Summary
    /// Parses `input` with this pattern and returns the value built by the
    /// first applicable selector.
    ///
    /// ## Errors
    /// Returns a shape error if the input does not follow the pattern, a field
    /// error for invalid calendar or clock values, or
    /// [`ParseErrorKind::NoMatchingPattern`] if no selector applies.
    pub fn parse(&self, input: &str) -> ParseResult<TemporalValue> {
        let mut parsed = Parsed::new();
        pattern::read(&self.items, input, &mut parsed)?;

        // set_* only checks ranges; day-of-month against the month happens here
        if let Err(err) = parsed.to_naive_date() {
            if err.kind() != ChronoErrorKind::NotEnough {
                return Err(ParseError::new(ParseErrorKind::InvalidDate, 1)
                    .with_context(format!("{input}: {err}")));
            }
        }

        if let Some(zone) = self.zone {
            apply_zone_offset(&mut parsed, zone, input)?;
        }

        self.selectors
            .iter()
            .find_map(|selector| selector.build(&parsed))
            .ok_or_else(|| {
                ParseError::new(ParseErrorKind::NoMatchingPattern, 1)
                    .with_context(format!("{input} does not satisfy {self}"))
            })
    }

    /// ## Summary
    /// Formats a value with this pattern.
    ///
    /// The rendering zone is the pinned zone if any, else `zone`, else the
    /// value's own representation. Floating values keep their local fields.
    ///
    /// ## Errors
    /// Returns [`FormatError`] if the pattern needs a time of day the value
    /// lacks, or if the pattern is pinned to a zone and the value has no
    /// instant.
    pub fn format(&self, value: &TemporalValue, zone: Option<Tz>) -> Result<String, FormatError> {
        if self.has_time() && value.is_date() {
            return Err(FormatError::MissingTime {
                pattern: self.to_string(),
            });
        }
        if let Some(pinned) = self.zone {
            if !value.supports_instant() {
                return Err(FormatError::NoInstant {
                    pattern: self.to_string(),
                    zone: pinned,
                    form: value.classify(),
                });
            }
        }

        let (date, time) = local_fields(value, self.zone.or(zone));
        let mut out = String::with_capacity(self.items.len() + 4);
        if pattern::write(&self.items, &mut out, date, time).is_err() {
            // unreachable after the checks above
            return Err(FormatError::MissingTime {
                pattern: self.to_string(),
            });
        }
        Ok(out)
    }

    /// Writes fields straight into a formatter; used for canonical display
    /// where the pattern is known to fit the value.
    pub(crate) fn write_fields(
        &self,
        f: &mut fmt::Formatter<'_>,
        date: NaiveDate,
        time: Option<NaiveTime>,
    ) -> fmt::Result {
        pattern::write(&self.items, f, date, time)
    }
}

impl fmt::Display for CalendarDateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        pattern::describe(&self.items, f)
    }
}

/// Text read by a zone-pinned pattern is local time in that zone, so the
/// zone's offset at that local time becomes the parsed offset.
fn apply_zone_offset(parsed: &mut Parsed, zone: Tz, input: &str) -> ParseResult<()> {
    let Ok(local) = parsed.to_naive_datetime_with_offset(0) else {
        // date-only pattern, nothing to anchor
        return Ok(());
    };
    let Some(dt) = zone.from_local_datetime(&local).earliest() else {
        return Err(ParseError::new(ParseErrorKind::InvalidTime, 1)
            .with_context(format!("{input} does not exist in {zone}")));
    };
    parsed
        .set_offset(i64::from(dt.offset().fix().local_minus_utc()))
        .map_err(|err| {
            ParseError::new(ParseErrorKind::InvalidTime, 1).with_context(err.to_string())
        })
}

/// Calendar and clock fields of `value` as seen in `zone`.
fn local_fields(value: &TemporalValue, zone: Option<Tz>) -> (NaiveDate, Option<NaiveTime>) {
    match (value, zone) {
        (TemporalValue::Date(date), _) => (*date, None),
        (TemporalValue::Floating(dt), _) => (dt.date(), Some(dt.time())),
        (TemporalValue::Utc(dt), None) => (dt.date_naive(), Some(dt.time())),
        (TemporalValue::Zoned(dt), None) => {
            let local = dt.naive_local();
            (local.date(), Some(local.time()))
        }
        (TemporalValue::Utc(dt), Some(tz)) => {
            let local = dt.with_timezone(&tz).naive_local();
            (local.date(), Some(local.time()))
        }
        (TemporalValue::Zoned(dt), Some(tz)) => {
            let local = dt.with_timezone(&tz).naive_local();
            (local.date(), Some(local.time()))
        }
    }
}

/// ## Summary
/// Parses `input` with the first format in `table` that accepts it.
///
/// Shape mismatches fall through to the next format. A field error (month 13,
/// hour 24, ...) from a format whose shape matched is reported as-is rather
/// than as "no matching pattern".
///
/// ## Errors
/// Returns the field error if one occurred, otherwise
/// [`ParseErrorKind::NoMatchingPattern`].
pub fn parse_with(table: &[&CalendarDateFormat], input: &str) -> ParseResult<TemporalValue> {
    let mut field_error = None;

    for format in table {
        match format.parse(input) {
            Ok(value) => {
                tracing::trace!(pattern = %format, "Date pattern matched");
                return Ok(value);
            }
            Err(err) if err.is_field_error() => {
                field_error.get_or_insert(err);
            }
            Err(err) => {
                tracing::trace!(pattern = %format, error = %err, "Date pattern rejected input");
            }
        }
    }

    Err(field_error.unwrap_or_else(|| {
        ParseError::new(ParseErrorKind::NoMatchingPattern, 1).with_context(input.to_string())
    }))
}

/// ## Summary
/// Parses `input` with [`PARSE_TABLE`].
///
/// ## Errors
/// See [`parse_with`].
pub fn parse(input: &str) -> ParseResult<TemporalValue> {
    parse_with(&PARSE_TABLE, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone};

    fn floating(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn parse_date_only() {
        let value = parse("20240115").unwrap();
        assert_eq!(
            value,
            TemporalValue::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
    }

    #[test]
    fn parse_utc() {
        let value = parse("20240115T093000Z").unwrap();
        assert_eq!(
            value,
            TemporalValue::Utc(Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap())
        );
    }

    #[test]
    fn parse_floating() {
        let value = parse("20240115T093000").unwrap();
        assert_eq!(
            value,
            TemporalValue::Floating(floating("2024-01-15 09:30:00"))
        );
    }

    #[test]
    fn parse_reports_field_errors() {
        let err = parse("20241301").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidDate);

        let err = parse("20240230T120000Z").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidDate);

        let err = parse("20240101T126000").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidTime);

        for leap in ["20240115T235960Z", "20240115T235960"] {
            let err = parse(leap).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::InvalidTime, "{leap}");
        }
    }

    #[test]
    fn parse_rejects_unknown_shapes() {
        for input in ["", "2024-01-15", "20240115T0930", "20240115T093000+0100", "2024115"] {
            let err = parse(input).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::NoMatchingPattern, "{input}");
        }
    }

    #[test]
    fn selectors_are_tried_in_order() {
        let format =
            CalendarDateFormat::compile("yyyyMMdd'T'HHmmss", &[Selector::Utc, Selector::Floating])
                .unwrap();
        // no offset field, so the UTC selector is skipped
        assert!(format.parse("20240115T093000").unwrap().is_floating());

        let date_first =
            CalendarDateFormat::compile("yyyyMMdd'T'HHmmss", &[Selector::Date, Selector::Floating])
                .unwrap();
        assert!(date_first.parse("20240115T093000").unwrap().is_date());
    }

    #[test]
    fn format_pads_and_marks_utc() {
        let value = TemporalValue::Utc(Utc.with_ymd_and_hms(812, 3, 4, 5, 6, 7).unwrap());
        assert_eq!(
            UTC_DATE_TIME_FORMAT.format(&value, None).unwrap(),
            "08120304T050607Z"
        );
    }

    #[test]
    fn utc_format_converts_zoned_values() {
        let zoned = chrono_tz::America::New_York
            .with_ymd_and_hms(2024, 1, 15, 9, 30, 0)
            .unwrap();
        let value = TemporalValue::Zoned(zoned);
        assert_eq!(
            UTC_DATE_TIME_FORMAT.format(&value, None).unwrap(),
            "20240115T143000Z"
        );
        // the explicit zone loses against the pinned one
        assert_eq!(
            UTC_DATE_TIME_FORMAT
                .format(&value, Some(chrono_tz::Asia::Tokyo))
                .unwrap(),
            "20240115T143000Z"
        );
    }

    #[test]
    fn floating_format_with_zone_keeps_floating_fields() {
        let value = TemporalValue::Floating(floating("2024-01-15 09:30:00"));
        assert_eq!(
            FLOATING_DATE_TIME_FORMAT
                .format(&value, Some(chrono_tz::Asia::Tokyo))
                .unwrap(),
            "20240115T093000"
        );

        let utc = TemporalValue::Utc(Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap());
        assert_eq!(
            FLOATING_DATE_TIME_FORMAT
                .format(&utc, Some(chrono_tz::Asia::Tokyo))
                .unwrap(),
            "20240115T183000"
        );
    }

    #[test]
    fn format_truncates_sub_seconds() {
        let dt = floating("2024-01-15 09:30:59") + chrono::TimeDelta::milliseconds(999);
        let value = TemporalValue::Floating(dt);
        assert_eq!(
            FLOATING_DATE_TIME_FORMAT.format(&value, None).unwrap(),
            "20240115T093059"
        );
    }

    #[test]
    fn format_rejects_mismatched_forms() {
        let date = TemporalValue::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert!(matches!(
            FLOATING_DATE_TIME_FORMAT.format(&date, None),
            Err(FormatError::MissingTime { .. })
        ));

        let floating = TemporalValue::Floating(floating("2024-01-15 09:30:00"));
        assert!(matches!(
            UTC_DATE_TIME_FORMAT.format(&floating, None),
            Err(FormatError::NoInstant { .. })
        ));
    }

    #[test]
    fn compiled_format_renders_custom_layout() {
        let format =
            CalendarDateFormat::compile("yyyy-MM-dd HH:mm", &[Selector::Floating]).unwrap();
        let value = TemporalValue::Floating(floating("2024-01-15 09:30:00"));
        assert_eq!(format.format(&value, None).unwrap(), "2024-01-15 09:30");
        assert_eq!(format.to_string(), "yyyy-MM-dd HH:mm");
        assert!(format.zone().is_none());
    }

    #[test]
    fn compiled_utc_pattern_is_pinned() {
        let format = CalendarDateFormat::compile("yyyyMMdd'T'HHmmss'Z'", &[Selector::Utc]).unwrap();
        assert_eq!(format.zone(), Some(Tz::UTC));
        assert_eq!(format, UTC_DATE_TIME_FORMAT.clone());
    }
}
