//! Zone resolution and local-to-zoned conversion for iCalendar date-times.

pub mod timezone;

pub use timezone::{
    ConversionError, TimeZoneResolver, ZoneRuleResolver, attach_zone, attach_zone_strict,
    install_system_zone, system_zone,
};
