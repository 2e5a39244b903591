//! # Constituent Catalog
//!
//! Static registry of the harmonic constituents used by the classical tide
//! tables. Each constituent is described by its species (cycles per mean
//! solar day) and by integer multipliers of the five slowly varying mean
//! longitudes:
//!
//! | symbol | meaning                          |
//! |--------|----------------------------------|
//! | `s`    | mean longitude of the Moon       |
//! | `h`    | mean longitude of the Sun        |
//! | `p`    | longitude of the lunar perigee   |
//! | `N`    | longitude of the lunar node      |
//! | `p1`   | longitude of the solar perigee   |
//!
//! Angular speeds are never typed in by hand: they follow from the species
//! and the daily rates of those longitudes, so the catalog and the
//! astronomical arguments can never disagree.
//!
//! The nodal modulation (18.6 years) is represented by four satellite lines
//! (`O1N`, `K1N`, `M2N`, `K2N`) rather than by nodal factors.

use crate::error::{Result, TideError};

/// Daily rates (degrees/day) of `s`, `h`, `p`, `N`, `p1`.
pub const DAILY_RATES: [f64; 5] = [
    13.176_396_73,
    0.985_647_34,
    0.111_404_08,
    0.052_953_92,
    0.000_047_069,
];

/// One sinusoidal line of the tide signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constituent {
    /// Catalog name, upper case (e.g. `"M2"`)
    pub name: &'static str,
    /// Cycles per mean solar day: 0 (long period), 1, 2 or 4
    pub species: u8,
    /// Multipliers of `s`, `h`, `p`, `N`, `p1`
    pub multipliers: [i8; 5],
    /// Fixed phase offset in degrees (multiples of 90)
    pub offset_deg: f64,
}

impl Constituent {
    const fn new(name: &'static str, species: u8, multipliers: [i8; 5], offset_deg: f64) -> Self {
        Self {
            name,
            species,
            multipliers,
            offset_deg,
        }
    }

    /// Angular speed in degrees per hour.
    pub fn speed(&self) -> f64 {
        let slow: f64 = self
            .multipliers
            .iter()
            .zip(DAILY_RATES.iter())
            .map(|(&n, &rate)| f64::from(n) * rate)
            .sum();
        15.0 * f64::from(self.species) + slow / 24.0
    }

    /// Period in hours, `None` for a zero-speed line.
    pub fn period_hours(&self) -> Option<f64> {
        let speed = self.speed();
        (speed != 0.0).then(|| 360.0 / speed)
    }
}

/// All known constituents, in the order synthesis sums them.
pub static CATALOG: &[Constituent] = &[
    // Long period
    Constituent::new("SA", 0, [0, 1, 0, 0, 0], 0.0),
    // Diurnal
    Constituent::new("K1", 1, [0, 1, 0, 0, 0], 90.0),
    Constituent::new("O1", 1, [-2, 1, 0, 0, 0], -90.0),
    Constituent::new("Q1", 1, [-3, 1, 1, 0, 0], -90.0),
    Constituent::new("P1", 1, [0, -1, 0, 0, 0], 90.0),
    Constituent::new("O1N", 1, [-2, 1, 0, -1, 0], -90.0),
    Constituent::new("K1N", 1, [0, 1, 0, 1, 0], 90.0),
    // Semidiurnal
    Constituent::new("M2", 2, [-2, 2, 0, 0, 0], 0.0),
    Constituent::new("N2", 2, [-3, 2, 1, 0, 0], 0.0),
    Constituent::new("S2", 2, [0, 0, 0, 0, 0], 0.0),
    Constituent::new("2N2", 2, [-4, 2, 2, 0, 0], 0.0),
    Constituent::new("MU2", 2, [-4, 4, 0, 0, 0], 0.0),
    Constituent::new("NU2", 2, [-3, 4, -1, 0, 0], 0.0),
    Constituent::new("L2", 2, [-1, 2, -1, 0, 0], 0.0),
    Constituent::new("K2", 2, [0, 2, 0, 0, 0], 0.0),
    Constituent::new("T2", 2, [0, -1, 0, 0, 1], 0.0),
    Constituent::new("M2N", 2, [-2, 2, 0, -1, 0], 0.0),
    Constituent::new("K2N", 2, [0, 2, 0, 1, 0], 0.0),
    // Shallow water (quarter-diurnal)
    Constituent::new("MN4", 4, [-5, 4, 1, 0, 0], 0.0),
    Constituent::new("M4", 4, [-4, 4, 0, 0, 0], 0.0),
    Constituent::new("MS4", 4, [-2, 2, 0, 0, 0], 0.0),
];

/// Find a constituent by name, ignoring ASCII case and surrounding whitespace.
pub fn find(name: &str) -> Option<&'static Constituent> {
    let name = name.trim();
    CATALOG.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Position of a constituent in [`CATALOG`].
pub fn index_of(name: &str) -> Result<usize> {
    let trimmed = name.trim();
    CATALOG
        .iter()
        .position(|c| c.name.eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| TideError::UnknownConstituent(trimmed.to_string()))
}

/// Angular speed (degrees/hour) of a named constituent.
pub fn speed_of(name: &str) -> Result<f64> {
    find(name)
        .map(Constituent::speed)
        .ok_or_else(|| TideError::UnknownConstituent(name.trim().to_string()))
}
