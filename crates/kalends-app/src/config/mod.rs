use chrono_tz::Tz;
pub use kalends_core::config::*;
use kalends_rfc::rfc::ical::expand::{TimeZoneResolver, ZoneRuleResolver};

use crate::error::{AppError, AppResult};

/// ## Summary
/// Resolves the configured default zone.
///
/// Accepts anything the shared resolver does, including Windows zone names.
///
/// ## Errors
/// Returns an error if the zone is unknown.
pub fn default_zone(settings: &Settings) -> AppResult<Tz> {
    TimeZoneResolver::shared()
        .resolve(settings.timezone.default.trim())
        .map_err(|err| AppError::RfcError(err.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_zone_resolves_configured_name() {
        let settings = Settings::from_toml_str(
            r#"
            [timezone]
            default = "W. Europe Standard Time"
            "#,
        )
        .expect("valid settings");

        assert_eq!(default_zone(&settings).expect("known zone"), Tz::Europe__Berlin);
    }

    #[test]
    fn default_zone_rejects_unknown_name() {
        let settings = Settings::from_toml_str(
            r#"
            [timezone]
            default = "Atlantis/Central"
            "#,
        )
        .expect("valid settings");

        assert!(matches!(default_zone(&settings), Err(AppError::RfcError(_))));
    }
}
