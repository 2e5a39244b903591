//! # Astronomical Arguments
//!
//! Converts a calendar date into the equilibrium argument (reference phase)
//! of every catalog constituent at hour 0 of that date.
//!
//! The mean longitudes are the linear elements printed with the classical
//! tide tables, counted from 1980-01-01 00:00. They are only fitted for the
//! window 1900-03-01 to 2100-02-28; dates outside it are rejected rather
//! than silently extrapolated.
//!
//! Everything here is in degrees. Radians only appear where a cosine is
//! evaluated, in the synthesizer.

use crate::constituent::{self, Constituent, CATALOG, DAILY_RATES};
use crate::error::{Result, TideError};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// `num_days_from_ce()` of 1980-01-01, the origin of the day number.
const EPOCH_DAYS_FROM_CE: i64 = 722_815;

/// Longitudes of `s`, `h`, `p`, `N`, `p1` at the epoch, in degrees.
const EPOCH_LONGITUDES: [f64; 5] = [78.16, 279.82, 349.5, 208.1, 282.6];

/// First and last supported dates as (year, month, day).
const FIRST_DATE: (i32, u32, u32) = (1900, 3, 1);
const LAST_DATE: (i32, u32, u32) = (2100, 2, 28);

/// Wrap an angle into [0, 360).
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Validate a calendar date and the supported window.
pub fn validate_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(TideError::InvalidDate { year, month, day })?;

    let key = (date.year(), date.month(), date.day());
    if key < FIRST_DATE || key > LAST_DATE {
        return Err(TideError::DateOutOfRange(date));
    }
    Ok(date)
}

/// Whole days elapsed between the epoch and `date`.
fn days_since_epoch(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - EPOCH_DAYS_FROM_CE
}

/// Day number (days since 1980-01-01) of a validated calendar date.
pub fn day_number(year: i32, month: u32, day: u32) -> Result<i64> {
    validate_date(year, month, day).map(days_since_epoch)
}

/// Mean longitudes of the Moon, Sun, lunar perigee, lunar node and solar perigee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanLongitudes {
    pub s: f64,
    pub h: f64,
    pub p: f64,
    pub n: f64,
    pub p1: f64,
}

impl MeanLongitudes {
    /// Longitudes `days` after the epoch (fractional days allowed).
    ///
    /// Values are left unwrapped: they only ever feed a cosine or a final
    /// normalisation, and keeping them linear keeps the arguments exactly
    /// linear in time.
    pub fn at(days: f64) -> Self {
        let values: [f64; 5] =
            std::array::from_fn(|i| EPOCH_LONGITUDES[i] + DAILY_RATES[i] * days);
        let [s, h, p, n, p1] = values;
        Self { s, h, p, n, p1 }
    }

    fn as_array(&self) -> [f64; 5] {
        [self.s, self.h, self.p, self.n, self.p1]
    }
}

/// Equilibrium argument of `constituent` at `hours` after midnight of the day
/// whose midnight longitudes would be `MeanLongitudes::at(day)`.
///
/// `longitudes` must already include the `hours / 24` advance; the species
/// term accounts for the rotation of the Earth.
pub fn equilibrium_argument(constituent: &Constituent, longitudes: &MeanLongitudes, hours: f64) -> f64 {
    let astronomical: f64 = constituent
        .multipliers
        .iter()
        .zip(longitudes.as_array())
        .map(|(&n, longitude)| f64::from(n) * longitude)
        .sum();
    15.0 * f64::from(constituent.species) * hours + astronomical + constituent.offset_deg
}

/// Everything the synthesizer needs to know about one calendar date.
///
/// Built fresh for every date and never mutated; selecting another date
/// produces another context.
#[derive(Debug, Clone, PartialEq)]
pub struct DateContext {
    date: NaiveDate,
    day_number: i64,
    /// Reference phase per catalog index, degrees in [0, 360)
    phases: Vec<Option<f64>>,
}

impl DateContext {
    /// Compute reference phases for every catalog constituent.
    pub fn for_date(year: i32, month: u32, day: u32) -> Result<Self> {
        let date = validate_date(year, month, day)?;
        Ok(Self::from_validated(date))
    }

    fn from_validated(date: NaiveDate) -> Self {
        let day_number = days_since_epoch(date);
        let longitudes = MeanLongitudes::at(day_number as f64);
        let phases = CATALOG
            .iter()
            .map(|c| Some(normalize_degrees(equilibrium_argument(c, &longitudes, 0.0))))
            .collect();

        Self {
            date,
            day_number,
            phases,
        }
    }

    /// Build a context from externally supplied reference phases, e.g. values
    /// read from a published table of astronomical arguments.
    ///
    /// Constituents missing from `phases` have no reference phase; a station
    /// using one of them fails synthesis with `InconsistentConstituentSet`.
    pub fn from_phases<'n, I>(date: NaiveDate, phases: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'n str, f64)>,
    {
        let mut table = vec![None; CATALOG.len()];
        for (name, phase) in phases {
            let index = constituent::index_of(name)?;
            table[index] = Some(normalize_degrees(phase));
        }

        Ok(Self {
            date,
            day_number: days_since_epoch(date),
            phases: table,
        })
    }

    /// The next calendar day's context.
    pub fn next_day(&self) -> Result<Self> {
        let next = self
            .date
            .succ_opt()
            .ok_or(TideError::DateOutOfRange(self.date))?;
        validate_date(next.year(), next.month(), next.day()).map(Self::from_validated)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn day_number(&self) -> i64 {
        self.day_number
    }

    /// Reference phase (degrees) of a constituent at hour 0.
    pub fn phase_of(&self, name: &str) -> Option<f64> {
        constituent::index_of(name)
            .ok()
            .and_then(|i| self.phase_at(i))
    }

    pub(crate) fn phase_at(&self, index: usize) -> Option<f64> {
        self.phases.get(index).copied().flatten()
    }

    /// `(name, phase)` pairs in catalog order, skipping absent phases.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        CATALOG
            .iter()
            .zip(self.phases.iter())
            .filter_map(|(c, phase)| phase.map(|p| (c.name, p)))
    }
}

impl fmt::Display for DateContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (day {})", self.date, self.day_number)
    }
}

/// Reference phases of every catalog constituent at hour 0 of a date.
pub fn reference_phases(year: i32, month: u32, day: u32) -> Result<DateContext> {
    DateContext::for_date(year, month, day)
}
