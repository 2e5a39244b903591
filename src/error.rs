//! # Error Types
//!
//! Every failure in the prediction pipeline surfaces as a [`TideError`].
//! None of them are retried: they are deterministic functions of the caller's
//! input or of the static station data.

use chrono::NaiveDate;
use std::io;
use thiserror::Error;

/// Errors that can occur while selecting a station, a date, or computing a height.
#[derive(Error, Debug)]
pub enum TideError {
    /// Requested station name is not present in the station table
    #[error("unknown station: {0}")]
    UnknownStation(String),

    /// Year/month/day does not form a real calendar date
    #[error("invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// Date is valid but outside the window the mean longitudes are fitted for
    #[error("date {0} is outside the supported range 1900-03-01 to 2100-02-28")]
    DateOutOfRange(NaiveDate),

    /// A name that does not exist in the constituent catalog
    #[error("unknown constituent: {0}")]
    UnknownConstituent(String),

    /// Station references a constituent the date context has no phase for
    #[error("no reference phase for constituent {0}")]
    InconsistentConstituentSet(String),

    /// Height requested before both station and date were selected
    #[error("station and date must both be set before computing a height")]
    NotInitialized,

    /// Station data parsed but is not usable (duplicates, negative amplitudes...)
    #[error("invalid station data: {0}")]
    InvalidStationData(String),

    /// Sampling window or step cannot produce a usable series
    #[error("invalid sampling: {0}")]
    InvalidSampling(String),

    /// Station data file could not be read
    #[error("station data IO: {0}")]
    Io(#[from] io::Error),

    /// Station data file is not valid TOML for the expected layout
    #[error("station data format: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, TideError>;
