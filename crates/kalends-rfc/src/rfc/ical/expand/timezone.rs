//! Timezone resolution for iCalendar date-times.
//!
//! Uses ICU4X for Windows timezone ID to IANA mapping and timezone canonicalization.

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Error during timezone conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or invalid timezone identifier.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Non-existent time during DST gap.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),

    /// Invalid datetime format.
    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),
}

/// Looks up zone rules by TZID.
///
/// Implementations must be safe to share between threads; deferred values
/// hold on to a resolver until their first access.
pub trait ZoneRuleResolver: Send + Sync {
    /// ## Errors
    /// Returns [`ConversionError::UnknownTimezone`] if the TZID has no rules.
    fn resolve(&self, tzid: &str) -> Result<Tz, ConversionError>;
}

/// Resolver for timezone identifiers.
///
/// Maintains a cache of resolved timezones and a table of registered aliases
/// for TZIDs that are not IANA names (e.g. a calendar's own VTIMEZONE names).
/// Aliases may be registered after values referring to them were created.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    /// Cache of resolved IANA timezones by TZID.
    cache: RwLock<HashMap<String, Tz>>,
    /// Registered TZID aliases.
    aliases: RwLock<HashMap<String, Tz>>,
}

static SHARED_RESOLVER: OnceLock<Arc<TimeZoneResolver>> = OnceLock::new();
static SYSTEM_ZONE: OnceLock<Tz> = OnceLock::new();

impl TimeZoneResolver {
    /// Creates a new timezone resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// The process-wide resolver used when no resolver is given explicitly.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(SHARED_RESOLVER.get_or_init(|| Arc::new(Self::new())))
    }

    /// ## Summary
    /// Maps `tzid` to `tz` for all later resolutions.
    pub fn register_alias(&self, tzid: impl Into<String>, tz: Tz) {
        let tzid = tzid.into();
        tracing::debug!(tzid = %tzid, tz = %tz.name(), "Registering timezone alias");
        self.aliases
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tzid, tz);
    }

    /// ## Summary
    /// Checks if a TZID has a registered alias.
    #[must_use]
    pub fn has_alias(&self, tzid: &str) -> bool {
        self.aliases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(tzid)
    }

    fn cached(&self, tzid: &str) -> Option<Tz> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tzid)
            .copied()
    }
}

impl ZoneRuleResolver for TimeZoneResolver {
    /// ## Summary
    /// Resolves a timezone identifier to a `chrono_tz::Tz`.
    ///
    /// Registered aliases win; otherwise the TZID is normalized and parsed as
    /// an IANA timezone name.
    ///
    /// ## Errors
    ///
    /// Returns `ConversionError::UnknownTimezone` if the TZID cannot be resolved.
    ///
    /// ## Side Effects
    ///
    /// Caches successful IANA resolutions to avoid repeated parsing.
    fn resolve(&self, tzid: &str) -> Result<Tz, ConversionError> {
        if let Some(tz) = self
            .aliases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tzid)
        {
            return Ok(*tz);
        }

        if let Some(tz) = self.cached(tzid) {
            return Ok(tz);
        }

        let normalized = normalize_tzid(tzid);
        let tz = Tz::from_str(&normalized)
            .map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))?;

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tzid.to_string(), tz);

        Ok(tz)
    }
}

/// Normalizes common CalDAV/iCalendar timezone identifiers to IANA names.
///
/// Many calendar clients use vendor-prefixed or Windows TZID values that need
/// to be mapped to standard IANA timezone names.
fn normalize_tzid(tzid: &str) -> String {
    let stripped = tzid
        .strip_prefix("/mozilla.org/")
        .or_else(|| tzid.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(tzid);

    let iana_parser = IanaParserExtended::new();

    if let Some(tz) = WindowsParser::new().parse(stripped, None) {
        if let Some(entry) = iana_parser.iter().find(|entry| entry.time_zone == tz) {
            return entry.canonical.to_string();
        }
    }

    // handles aliases like Europe/Kiev -> Europe/Kyiv
    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return parsed.canonical.to_string();
    }

    stripped.to_string()
}

/// ## Summary
/// Attaches `tz` to a local date-time.
///
/// A local time that occurs twice (DST fold) takes the earlier offset. A local
/// time that does not exist (DST gap) is moved forward by the length of the
/// gap, i.e. read with the offset in effect before the transition.
#[must_use]
pub fn attach_zone(local: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            let before = local - TimeDelta::days(1);
            let offset = tz.offset_from_local_datetime(&before).earliest().map_or_else(
                || tz.offset_from_utc_datetime(&local).fix(),
                |offset| offset.fix(),
            );
            let utc = local - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
            tracing::debug!(
                %local,
                tz = %tz.name(),
                "Local time falls in a DST gap, shifting forward"
            );
            tz.from_utc_datetime(&utc)
        }
    }
}

/// ## Summary
/// Attaches `tz` to a local date-time, rejecting times inside a DST gap.
///
/// ## Errors
/// Returns [`ConversionError::NonExistentTime`] if the local time does not
/// exist in `tz`.
pub fn attach_zone_strict(local: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>, ConversionError> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt),
        LocalResult::None => Err(ConversionError::NonExistentTime(format!(
            "{local} in timezone {}",
            tz.name()
        ))),
    }
}

/// ## Summary
/// Sets the zone used where a zone is needed but none is given.
///
/// Returns `false` if the system zone was already fixed, either by an earlier
/// call or by a lookup that happened first.
pub fn install_system_zone(tz: Tz) -> bool {
    let installed = SYSTEM_ZONE.set(tz).is_ok();
    if installed {
        tracing::info!(tz = %tz.name(), "System timezone installed");
    } else {
        tracing::warn!(
            requested = %tz.name(),
            current = %system_zone().name(),
            "System timezone already set"
        );
    }
    installed
}

/// ## Summary
/// The zone used where a zone is needed but none is given.
///
/// Unless installed explicitly, it is detected once: the `TZ` environment
/// variable wins, then the zone configured on the host, then UTC.
#[must_use]
pub fn system_zone() -> Tz {
    *SYSTEM_ZONE.get_or_init(detect_system_zone)
}

fn detect_system_zone() -> Tz {
    let tz_var = std::env::var("TZ").ok();
    let host = iana_time_zone::get_timezone()
        .inspect_err(|err| tracing::debug!(error = %err, "Host timezone unavailable"))
        .ok();
    pick_system_zone(tz_var.as_deref(), host.as_deref())
}

/// Chooses the system zone from the `TZ` variable and the host zone name.
fn pick_system_zone(tz_var: Option<&str>, host: Option<&str>) -> Tz {
    let resolver = TimeZoneResolver::shared();

    let from_var = tz_var
        .map(|raw| raw.trim().trim_start_matches(':'))
        .filter(|tzid| !tzid.is_empty());
    if let Some(tzid) = from_var {
        match resolver.resolve(tzid) {
            Ok(tz) => return tz,
            Err(err) => {
                tracing::warn!(error = %err, tz = %tzid, "Unusable TZ environment variable");
            }
        }
    }

    if let Some(tzid) = host.map(str::trim).filter(|tzid| !tzid.is_empty()) {
        match resolver.resolve(tzid) {
            Ok(tz) => return tz,
            Err(err) => {
                tracing::warn!(error = %err, tz = %tzid, "Unusable host timezone");
            }
        }
    }

    tracing::debug!("No system timezone found, using UTC");
    Tz::UTC
}
