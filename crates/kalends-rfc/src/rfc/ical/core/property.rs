//! iCalendar property types (RFC 5545 §3.2, §3.8).

use super::Value;
use crate::error::RfcResult;
use crate::rfc::ical::adapter::{TemporalAdapter, TzId};
use crate::rfc::ical::parse;

/// A property parameter such as `TZID=America/New_York`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    /// Parameter value.
    pub value: String,
}

impl Parameter {
    /// Creates a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            value: value.into(),
        }
    }

    /// Creates a TZID parameter.
    #[must_use]
    pub fn tzid(value: impl Into<String>) -> Self {
        Self::new(names::TZID, value)
    }
}

/// A parsed iCalendar property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Parsed value.
    pub value: Value,
}

impl Property {
    /// Creates a property with a text value.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_value(name, Value::Text(value.into()))
    }

    /// Creates a property with an integer value.
    #[must_use]
    pub fn integer(name: impl Into<String>, value: i32) -> Self {
        Self::with_value(name, Value::Integer(value))
    }

    /// Creates a property with a DATE or DATE-TIME value.
    #[must_use]
    pub fn temporal(name: impl Into<String>, value: impl Into<TemporalAdapter>) -> Self {
        Self::with_value(name, Value::Temporal(value.into()))
    }

    fn with_value(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value,
        }
    }

    /// ## Summary
    /// Builds a DATE or DATE-TIME property from its raw value text.
    ///
    /// A floating DATE-TIME with a TZID parameter is bound to that zone
    /// lazily, on first access, so zone definitions may be registered after
    /// the property is built. DATE and UTC values ignore the TZID.
    ///
    /// ## Errors
    /// Returns a parse error for malformed text.
    pub fn parse_temporal(
        name: impl Into<String>,
        params: Vec<Parameter>,
        raw: &str,
    ) -> RfcResult<Self> {
        let value = parse::parse(raw)?;
        let tzid = params.iter().find(|p| p.name == names::TZID);

        let adapter = match tzid {
            Some(tzid) if value.is_floating() => {
                TemporalAdapter::parse_deferred(raw, TzId::new(tzid.value.clone()))
            }
            Some(tzid) => {
                tracing::debug!(tzid = %tzid.value, form = ?value.classify(), "TZID ignored");
                TemporalAdapter::new(value)
            }
            None => TemporalAdapter::new(value),
        };

        Ok(Self {
            name: name.into().to_ascii_uppercase(),
            params,
            value: Value::Temporal(adapter),
        })
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        self.params
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns the value as text if it is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.value.as_text()
    }

    /// Returns the value as an integer if it is an integer value.
    #[must_use]
    pub fn as_integer(&self) -> Option<i32> {
        self.value.as_integer()
    }

    /// Returns the value as a temporal adapter if it is a DATE or DATE-TIME.
    #[must_use]
    pub fn as_temporal(&self) -> Option<&TemporalAdapter> {
        self.value.as_temporal()
    }
}

/// Read access to the properties of a calendar item.
pub trait PropertyLookup {
    /// Returns the first property with the given name (case-insensitive).
    fn property(&self, name: &str) -> Option<&Property>;
}

impl PropertyLookup for [Property] {
    fn property(&self, name: &str) -> Option<&Property> {
        self.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

impl PropertyLookup for Vec<Property> {
    fn property(&self, name: &str) -> Option<&Property> {
        self.as_slice().property(name)
    }
}

/// Property and parameter names used by this crate.
pub mod names {
    pub const DTSTAMP: &str = "DTSTAMP";
    pub const SEQUENCE: &str = "SEQUENCE";
    pub const TZID: &str = "TZID";
}
