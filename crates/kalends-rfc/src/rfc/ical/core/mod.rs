//! iCalendar core models (RFC 5545).
//!
//! [`TemporalValue`] is the date and date-time model. The legacy field-based
//! types and a minimal component/property model sit beside it.

mod component;
pub mod legacy;
mod property;
mod temporal;
mod value;

pub use component::{Component, ComponentKind};
pub use legacy::LegacyDate;
pub use property::{Parameter, Property, PropertyLookup, names};
pub use temporal::{Classification, TemporalValue};
pub use value::Value;
