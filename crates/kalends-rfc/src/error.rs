use thiserror::Error;

use crate::rfc::ical::expand::ConversionError;
use crate::rfc::ical::format::FormatError;
use crate::rfc::ical::parse::ParseError;

/// Errors raised by temporal parsing, formatting and zone resolution.
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Format error: {0}")]
    FormatError(#[from] FormatError),

    #[error("Zone resolution error: {0}")]
    ZoneResolutionError(#[from] ConversionError),

    #[error("Precondition failed: {0}")]
    PreconditionError(&'static str),

    #[error(transparent)]
    CoreError(#[from] kalends_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
