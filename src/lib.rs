//! # Harmonic Tide Prediction Library
//!
//! Predicts the height of the tide at a station for a calendar date and a
//! time of day with the harmonic method of the classical tide tables:
//!
//! ```text
//! h(t) = Z0 + Σ A · cos(V0 + ω · t − G)
//! ```
//!
//! ## Data Flow
//!
//! 1. **Station**: name → [`station::StationTable`] → mean level `Z0` and
//!    `(A, G)` per constituent
//! 2. **Date**: year/month/day → [`astro::DateContext`] → reference phase
//!    `V0` of every constituent at hour 0
//! 3. **Time**: decimal hours → [`synth::height`] → summed height
//!
//! The catalog and station tables are immutable once built; the height is a
//! pure function of (station, date context, hours), safe to call from any
//! number of threads.
//!
//! ## Modules
//!
//! - [`constituent`]: the static constituent catalog and angular speeds
//! - [`astro`]: day numbers, mean longitudes and reference phases
//! - [`station`]: station constants, TOML loading, minor-line inference
//! - [`synth`]: direct harmonic synthesis, sampling, high/low waters
//! - [`species`]: the calculator-era daily resultant method
//! - [`tide`]: the [`tide::Tide`] state holder (current station and date)
//!
//! ## Example
//!
//! ```
//! use harmonic_tide_lib::{station::StationTable, tide::Tide};
//!
//! let table = StationTable::builtin().unwrap();
//! let tide = Tide::new(table, "Concarneau", 2014, 8, 15).unwrap();
//! let h = tide.height(9.5).unwrap();
//! assert!(h.is_finite());
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Module declarations
pub mod astro;
pub mod config;
pub mod constituent;
pub mod error;
pub mod renderer;
pub mod species;
pub mod station;
pub mod synth;
pub mod tide;

pub use error::{Result, TideError};

#[cfg(test)]
mod tests;

/// A single predicted height.
///
/// # Example
/// ```
/// use harmonic_tide_lib::Sample;
///
/// // 09:30 is 9.5 decimal hours
/// let s = Sample { hours: 9.5, height: 3.04 };
/// assert_eq!(s.hours, 9.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Decimal hours after midnight of the series date (may exceed 24)
    pub hours: f64,
    /// Height in the station table's unit
    pub height: f64,
}

/// How heights are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Sum every constituent at every instant
    #[default]
    Direct,
    /// Per-species resultants interpolated across the day
    Species,
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Method::Direct),
            "species" => Ok(Method::Species),
            other => Err(format!("unknown method '{other}' (expected direct or species)")),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Direct => f.write_str("direct"),
            Method::Species => f.write_str("species"),
        }
    }
}

/// A day's worth of predictions for one station.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use harmonic_tide_lib::{Method, Sample, TideSeries};
///
/// let series = TideSeries {
///     station: "BREST".into(),
///     date: NaiveDate::from_ymd_opt(2014, 8, 15).unwrap(),
///     method: Method::Direct,
///     samples: vec![
///         Sample { hours: 0.0, height: 2.1 },
///         Sample { hours: 1.0, height: 2.6 },
///     ],
/// };
/// assert_eq!(series.samples.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideSeries {
    /// Normalised station name
    pub station: String,
    /// Date hour 0 refers to
    pub date: NaiveDate,
    /// Method used for every sample
    pub method: Method,
    /// Samples in ascending time order
    pub samples: Vec<Sample>,
}

impl TideSeries {
    /// Lowest and highest sampled heights, `None` for an empty series.
    pub fn range(&self) -> Option<(f64, f64)> {
        if self.samples.is_empty() {
            return None;
        }
        Some(
            self.samples
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), s| {
                    (min.min(s.height), max.max(s.height))
                }),
        )
    }
}
