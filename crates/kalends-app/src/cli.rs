use clap::{Parser, Subcommand};

use crate::commands::Revision;

#[derive(Parser, Debug)]
#[command(about, version, name = "kalends")]
/// Inspect iCalendar DATE and DATE-TIME values
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a DATE or DATE-TIME value and print its form and canonical text
    Parse {
        /// Value text, e.g. 20240115T093000Z
        value: String,
        /// Bind a floating value to this TZID, resolved on first use
        #[arg(long)]
        tzid: Option<String>,
    },
    /// Print a value as local time in a zone
    ///
    /// Floating values and dates are anchored in the zone, instants are
    /// converted to it.
    Localize {
        /// Value text, e.g. 20240115T093000Z
        value: String,
        /// Target zone; defaults to the configured zone
        #[arg(short, long)]
        zone: Option<String>,
    },
    /// Decide whether one revision of a calendar item replaces another
    Supersedes {
        /// Incoming revision as SEQUENCE[@DTSTAMP]
        #[arg(long)]
        candidate: Revision,
        /// Stored revision as SEQUENCE[@DTSTAMP]
        #[arg(long)]
        current: Revision,
    },
}
