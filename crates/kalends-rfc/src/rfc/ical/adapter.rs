//! Facade over [`TemporalValue`].
//!
//! A [`TemporalAdapter`] holds one value, either directly or as raw text plus
//! a zone reference that is resolved on first access. Deferred resolution lets
//! a DATE-TIME carrying a TZID be read before the calendar's VTIMEZONE names
//! have been registered with the resolver.

use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use kalends_core::error::CoreError;

use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::core::legacy::{self, DateTimeForm, LegacyDate};
use crate::rfc::ical::core::{Classification, TemporalValue};
use crate::rfc::ical::expand::{
    ConversionError, TimeZoneResolver, ZoneRuleResolver, attach_zone, system_zone,
};
use crate::rfc::ical::format::CalendarDateFormat;
use crate::rfc::ical::parse::{self, ParseError, ParseErrorKind};

/// A TZID together with the resolver that turns it into zone rules.
#[derive(Clone)]
pub struct TzId {
    tzid: String,
    resolver: Arc<dyn ZoneRuleResolver>,
}

impl TzId {
    /// References `tzid` through the process-wide resolver.
    #[must_use]
    pub fn new(tzid: impl Into<String>) -> Self {
        Self::with_resolver(tzid, TimeZoneResolver::shared())
    }

    /// References `tzid` through an explicit resolver.
    #[must_use]
    pub fn with_resolver(tzid: impl Into<String>, resolver: Arc<dyn ZoneRuleResolver>) -> Self {
        Self {
            tzid: tzid.into(),
            resolver,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.tzid
    }

    /// ## Summary
    /// Looks up the zone rules for this TZID.
    ///
    /// ## Errors
    /// Returns [`ConversionError::UnknownTimezone`] if the resolver does not
    /// know the TZID (yet).
    pub fn to_zone(&self) -> Result<Tz, ConversionError> {
        self.resolver.resolve(&self.tzid)
    }
}

impl fmt::Debug for TzId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TzId")
            .field("tzid", &self.tzid)
            .finish_non_exhaustive()
    }
}

impl PartialEq for TzId {
    fn eq(&self, other: &Self) -> bool {
        self.tzid == other.tzid
    }
}

/// A DATE or DATE-TIME value, possibly not parsed yet.
#[derive(Debug, Clone)]
pub struct TemporalAdapter {
    repr: Repr,
}

#[derive(Debug, Clone)]
enum Repr {
    Eager(TemporalValue),
    Deferred(Box<Deferred>),
}

#[derive(Debug, Clone)]
struct Deferred {
    text: String,
    tzid: TzId,
    /// Written once by whichever first access finishes resolving.
    cell: OnceLock<TemporalValue>,
}

impl Deferred {
    fn get(&self) -> RfcResult<&TemporalValue> {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let value = resolve_deferred(&self.text, &self.tzid)?;
        if self.cell.set(value).is_err() {
            tracing::trace!(
                tzid = %self.tzid.as_str(),
                "Deferred value already published by another reader"
            );
        }
        self.cell.get().ok_or(RfcError::CoreError(CoreError::InvariantViolation(
            "deferred value missing after publication",
        )))
    }
}

/// Parses deferred floating text and binds it to the referenced zone.
fn resolve_deferred(text: &str, tzid: &TzId) -> RfcResult<TemporalValue> {
    let local = parse::parse_floating(text)?;
    let tz = tzid.to_zone()?;
    tracing::debug!(tzid = %tzid.as_str(), tz = %tz.name(), "Resolved deferred value");
    Ok(TemporalValue::Zoned(attach_zone(local, tz)))
}

impl TemporalAdapter {
    /// Wraps an already built value.
    #[must_use]
    pub const fn new(value: TemporalValue) -> Self {
        Self {
            repr: Repr::Eager(value),
        }
    }

    /// ## Summary
    /// Parses iCalendar DATE or DATE-TIME text.
    ///
    /// ## Errors
    /// Returns [`RfcError::ParseError`] if no pattern of the date format table
    /// accepts the text or a field is out of range.
    pub fn parse(text: &str) -> RfcResult<Self> {
        Ok(Self::new(parse::parse(text)?))
    }

    /// ## Summary
    /// Parses floating DATE-TIME text and binds it to `tz` right away.
    ///
    /// Local times inside a DST fold take the earlier offset; times inside a
    /// gap are moved forward by the length of the gap.
    ///
    /// ## Errors
    /// Returns [`RfcError::ParseError`] unless the text is a floating
    /// DATE-TIME.
    pub fn parse_in_zone(text: &str, tz: Tz) -> RfcResult<Self> {
        let local = parse::parse_floating(text)?;
        Ok(Self::new(TemporalValue::Zoned(attach_zone(local, tz))))
    }

    /// ## Summary
    /// Captures text and a zone reference without parsing.
    ///
    /// The text is parsed and bound to the zone on first access to the value.
    /// A failed attempt is not remembered, so registering the TZID with the
    /// resolver afterwards makes the next access succeed.
    #[must_use]
    pub fn parse_deferred(text: impl Into<String>, tzid: TzId) -> Self {
        Self {
            repr: Repr::Deferred(Box::new(Deferred {
                text: text.into(),
                tzid,
                cell: OnceLock::new(),
            })),
        }
    }

    /// ## Summary
    /// The wrapped value, resolving a deferred adapter on first call.
    ///
    /// ## Errors
    /// Returns the parse or zone resolution error of a deferred adapter.
    pub fn value(&self) -> RfcResult<&TemporalValue> {
        match &self.repr {
            Repr::Eager(value) => Ok(value),
            Repr::Deferred(deferred) => deferred.get(),
        }
    }

    /// Returns whether the value is available without further work.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match &self.repr {
            Repr::Eager(_) => true,
            Repr::Deferred(deferred) => deferred.cell.get().is_some(),
        }
    }

    /// ## Summary
    /// Unwraps the value, resolving it if necessary.
    ///
    /// ## Errors
    /// Same as [`TemporalAdapter::value`].
    pub fn into_value(self) -> RfcResult<TemporalValue> {
        match self.repr {
            Repr::Eager(value) => Ok(value),
            Repr::Deferred(deferred) => {
                let Deferred { text, tzid, cell } = *deferred;
                match cell.into_inner() {
                    Some(value) => Ok(value),
                    None => resolve_deferred(&text, &tzid),
                }
            }
        }
    }

    /// ## Summary
    /// Canonical iCalendar text.
    ///
    /// Zoned values are written as floating text in the system zone; the TZID
    /// travels separately as a parameter.
    ///
    /// ## Errors
    /// Returns the resolution error of a deferred adapter.
    pub fn to_text(&self) -> RfcResult<String> {
        Ok(self.value()?.to_string())
    }

    /// ## Errors
    /// Returns [`RfcError::FormatError`] if `format` cannot render the value.
    pub fn to_text_with(&self, format: &CalendarDateFormat) -> RfcResult<String> {
        Ok(format.format(self.value()?, None)?)
    }

    /// ## Errors
    /// Returns [`RfcError::FormatError`] if `format` cannot render the value.
    pub fn to_text_in(&self, format: &CalendarDateFormat, tz: Tz) -> RfcResult<String> {
        Ok(format.format(self.value()?, Some(tz))?)
    }

    /// ## Summary
    /// The value as a date-time in the system zone.
    ///
    /// ## Errors
    /// Returns the resolution error of a deferred adapter.
    pub fn to_local_time(&self) -> RfcResult<DateTime<Tz>> {
        self.to_local_time_in(system_zone())
    }

    /// ## Summary
    /// The value as a date-time in `tz`.
    ///
    /// Floating values and dates (at midnight) are anchored at `tz`, UTC
    /// values are converted, zoned values keep their own zone.
    ///
    /// ## Errors
    /// Returns the resolution error of a deferred adapter.
    pub fn to_local_time_in(&self, tz: Tz) -> RfcResult<DateTime<Tz>> {
        Ok(self.value()?.at_zone(tz))
    }

    #[must_use]
    pub const fn classify(value: &TemporalValue) -> Classification {
        value.classify()
    }

    #[must_use]
    pub const fn is_floating(value: &TemporalValue) -> bool {
        value.is_floating()
    }

    #[must_use]
    pub const fn is_utc(value: &TemporalValue) -> bool {
        value.is_utc()
    }

    /// Returns whether `a` is strictly before `b`. See [`TemporalValue::compare`].
    #[must_use]
    pub fn is_before(a: &TemporalValue, b: &TemporalValue) -> bool {
        a.is_before(b)
    }

    /// Returns whether `a` is strictly after `b`. See [`TemporalValue::compare`].
    #[must_use]
    pub fn is_after(a: &TemporalValue, b: &TemporalValue) -> bool {
        a.is_after(b)
    }

    #[must_use]
    pub fn compare(a: &TemporalValue, b: &TemporalValue) -> Ordering {
        a.compare(b)
    }

    /// ## Summary
    /// Converts a field-based legacy date.
    ///
    /// A date-time without TZID and without UTC marker is taken to be in the
    /// system zone, which is how the legacy type treated it.
    ///
    /// ## Errors
    /// Returns [`RfcError::ParseError`] for impossible fields and
    /// [`RfcError::ZoneResolutionError`] for an unknown TZID.
    pub fn from_legacy(legacy: &LegacyDate) -> RfcResult<Self> {
        let value = match legacy {
            LegacyDate::Date(date) => TemporalValue::Date(legacy_date(date)?),
            LegacyDate::DateTime(dt) => {
                let time = NaiveTime::from_hms_opt(
                    u32::from(dt.hour),
                    u32::from(dt.minute),
                    u32::from(dt.second),
                )
                .ok_or_else(|| {
                    ParseError::new(ParseErrorKind::InvalidTime, 1).with_context(dt.to_string())
                })?;
                let local = legacy_date(&dt.date)?.and_time(time);

                match &dt.form {
                    DateTimeForm::Utc => TemporalValue::Utc(local.and_utc()),
                    DateTimeForm::Zoned { tzid } => {
                        let tz = TzId::new(tzid.as_str()).to_zone()?;
                        TemporalValue::Zoned(attach_zone(local, tz))
                    }
                    DateTimeForm::Floating => {
                        TemporalValue::Zoned(attach_zone(local, system_zone()))
                    }
                }
            }
        };
        Ok(Self::new(value))
    }

    /// ## Summary
    /// Converts to the field-based legacy date.
    ///
    /// ## Errors
    /// Returns [`RfcError::PreconditionError`] if the year does not fit the
    /// legacy type, or the resolution error of a deferred adapter.
    pub fn to_legacy(&self) -> RfcResult<LegacyDate> {
        let value = self.value()?;
        let date = to_legacy_date(value.local_date())?;

        let (time, form) = match value {
            TemporalValue::Date(_) => return Ok(LegacyDate::Date(date)),
            TemporalValue::Floating(dt) => (dt.time(), DateTimeForm::Floating),
            TemporalValue::Utc(dt) => (dt.time(), DateTimeForm::Utc),
            TemporalValue::Zoned(dt) => (
                dt.time(),
                DateTimeForm::Zoned {
                    tzid: dt.timezone().name().to_string(),
                },
            ),
        };

        Ok(LegacyDate::DateTime(legacy::DateTime::new(
            date,
            clock_field(time.hour()),
            clock_field(time.minute()),
            clock_field(time.second()),
            form,
        )))
    }
}

fn legacy_date(date: &legacy::Date) -> RfcResult<NaiveDate> {
    NaiveDate::from_ymd_opt(
        i32::from(date.year),
        u32::from(date.month),
        u32::from(date.day),
    )
    .ok_or_else(|| {
        ParseError::new(ParseErrorKind::InvalidDate, 1)
            .with_context(date.to_string())
            .into()
    })
}

fn to_legacy_date(date: NaiveDate) -> RfcResult<legacy::Date> {
    let year = u16::try_from(date.year())
        .map_err(|_e| RfcError::PreconditionError("year outside the legacy date range"))?;
    Ok(legacy::Date::new(
        year,
        clock_field(date.month()),
        clock_field(date.day()),
    ))
}

/// Month, day and clock fields are all below 61.
fn clock_field(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

impl From<TemporalValue> for TemporalAdapter {
    fn from(value: TemporalValue) -> Self {
        Self::new(value)
    }
}

impl TryFrom<Option<TemporalValue>> for TemporalAdapter {
    type Error = RfcError;

    fn try_from(value: Option<TemporalValue>) -> RfcResult<Self> {
        value
            .map(Self::new)
            .ok_or(RfcError::PreconditionError("temporal value must be present"))
    }
}

/// Adapters are equal when their resolved values are. Deferred adapters that
/// cannot be resolved are equal only to one with the same text and TZID.
impl PartialEq for TemporalAdapter {
    fn eq(&self, other: &Self) -> bool {
        match (self.value(), other.value()) {
            (Ok(a), Ok(b)) => a == b,
            (Err(_), Err(_)) => match (&self.repr, &other.repr) {
                (Repr::Deferred(a), Repr::Deferred(b)) => a.text == b.text && a.tzid == b.tzid,
                _ => false,
            },
            _ => false,
        }
    }
}
