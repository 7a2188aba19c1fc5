//! Command implementations. Each returns the text to print.

use std::str::FromStr;

use chrono::SecondsFormat;
use kalends_rfc::rfc::ical::core::names;
use kalends_rfc::rfc::ical::expand::{TimeZoneResolver, ZoneRuleResolver, system_zone};
use kalends_rfc::rfc::ical::{
    ComponentSequenceComparator, Property, RevisionKey, TemporalAdapter, TemporalValue, TzId,
};

use crate::cli::Command;
use crate::error::{AppError, AppResult};

/// One revision given on the command line as `SEQUENCE[@DTSTAMP]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub sequence: u32,
    pub dtstamp: Option<String>,
}

impl FromStr for Revision {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sequence, dtstamp) = match s.split_once('@') {
            Some((sequence, dtstamp)) => (sequence, Some(dtstamp.to_string())),
            None => (s, None),
        };
        let sequence = sequence
            .trim()
            .parse()
            .map_err(|_err| AppError::InvalidRevision(s.to_string()))?;
        Ok(Self { sequence, dtstamp })
    }
}

impl Revision {
    fn to_properties(&self) -> AppResult<Vec<Property>> {
        let sequence = i32::try_from(self.sequence)
            .map_err(|_err| AppError::InvalidRevision(self.sequence.to_string()))?;
        let mut props = vec![Property::integer(names::SEQUENCE, sequence)];
        if let Some(dtstamp) = &self.dtstamp {
            props.push(Property::parse_temporal(names::DTSTAMP, Vec::new(), dtstamp)?);
        }
        Ok(props)
    }
}

/// ## Summary
/// Runs a parsed command.
///
/// ## Errors
/// Returns the parse, zone or comparison error of the command.
pub fn run(command: &Command) -> AppResult<String> {
    match command {
        Command::Parse { value, tzid } => parse(value, tzid.as_deref()),
        Command::Localize { value, zone } => localize(value, zone.as_deref()),
        Command::Supersedes { candidate, current } => supersedes(candidate, current),
    }
}

/// ## Summary
/// Describes a value: its form, classification and canonical text.
///
/// ## Errors
/// Returns an error if the value cannot be parsed or its TZID resolved. With
/// a TZID the value must be floating text.
#[tracing::instrument(skip(value), fields(value_len = value.len()))]
pub fn parse(value: &str, tzid: Option<&str>) -> AppResult<String> {
    let adapter = match tzid {
        Some(tzid) => TemporalAdapter::parse_deferred(value, TzId::new(tzid)),
        None => TemporalAdapter::parse(value)?,
    };

    let resolved = adapter.value()?;
    let form = match resolved {
        TemporalValue::Date(_) => "date",
        TemporalValue::Floating(_) => "floating",
        TemporalValue::Utc(_) => "utc",
        TemporalValue::Zoned(_) => "zoned",
    };

    let mut lines = vec![
        format!("form: {form}"),
        format!("classification: {:?}", resolved.classify()),
    ];
    if let Some(tz) = resolved.tz() {
        lines.push(format!("zone: {}", tz.name()));
    }
    if let Some(instant) = resolved.instant() {
        lines.push(format!(
            "instant: {}",
            instant.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
    lines.push(format!("text: {}", adapter.to_text()?));
    Ok(lines.join("\n"))
}

/// ## Summary
/// Renders a value as RFC 3339 local time in `zone`, or in the system zone.
///
/// ## Errors
/// Returns an error if the value cannot be parsed or the zone is unknown.
pub fn localize(value: &str, zone: Option<&str>) -> AppResult<String> {
    let tz = match zone {
        Some(zone) => TimeZoneResolver::shared()
            .resolve(zone)
            .map_err(|err| AppError::RfcError(err.into()))?,
        None => system_zone(),
    };
    let local = TemporalAdapter::parse(value)?.to_local_time_in(tz)?;
    Ok(format!(
        "{} {}",
        local.to_rfc3339_opts(SecondsFormat::Secs, true),
        local.timezone().name()
    ))
}

/// ## Summary
/// Reports whether `candidate` replaces `current`, with both revision keys.
///
/// ## Errors
/// Returns an error if a DTSTAMP cannot be parsed.
pub fn supersedes(candidate: &Revision, current: &Revision) -> AppResult<String> {
    let candidate = candidate.to_properties()?;
    let current = current.to_properties()?;

    let replaces =
        ComponentSequenceComparator::supersedes(candidate.as_slice(), current.as_slice())?;
    let describe = |key: RevisionKey| {
        format!(
            "{}@{}",
            key.sequence,
            key.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    };
    tracing::debug!(
        candidate = %describe(RevisionKey::of(candidate.as_slice())?),
        current = %describe(RevisionKey::of(current.as_slice())?),
        replaces,
        "Compared revisions"
    );
    Ok(replaces.to_string())
}
