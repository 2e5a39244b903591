//! # Daily Species Resultants
//!
//! The method behind the printed tables was designed for a pocket
//! calculator: instead of summing twenty cosines for every requested time,
//! all lines of one species (long period, diurnal, semidiurnal,
//! quarter-diurnal) are folded into a single resultant wave at 0 h and at
//! 24 h of the day. Heights during the day use one cosine per species, with
//! amplitude and phase interpolated linearly between the two ends.
//!
//! The result equals the full harmonic sum exactly at 0 h and 24 h and stays
//! within a few centimetres in between for ordinary stations. A station with
//! a single line per species is reproduced exactly at every hour.

use crate::astro::DateContext;
use crate::error::{Result, TideError};
use crate::station::Station;

/// Species handled by the method, cycles per day.
const SPECIES: [u8; 4] = [0, 1, 2, 4];

/// Resultant of one species at both ends of the day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resultant {
    pub species: u8,
    /// Amplitude at 0 h and 24 h
    pub amplitude: [f64; 2],
    /// Phase in degrees, (-180, 180], at 0 h and 24 h
    pub phase: [f64; 2],
}

impl Resultant {
    /// Phase travelled over the day beyond whole turns, wrapped to [-180, 180].
    fn drift(&self) -> f64 {
        let mut delta = self.phase[1] - self.phase[0];
        if delta < -180.0 {
            delta += 360.0;
        }
        if delta > 180.0 {
            delta -= 360.0;
        }
        delta
    }

    /// Contribution of this species at `hours`.
    pub fn value_at(&self, hours: f64) -> f64 {
        let f = hours / 24.0;
        let amplitude = self.amplitude[0] + f * (self.amplitude[1] - self.amplitude[0]);
        let phase = self.phase[0] + f * (360.0 * f64::from(self.species) + self.drift());
        amplitude * phase.to_radians().cos()
    }
}

/// Per-species resultants of one station on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyResultants {
    mean_level: f64,
    resultants: Vec<Resultant>,
}

impl DailyResultants {
    /// Fold the station's lines into one resultant per species.
    pub fn compute(station: &Station, ctx: &DateContext) -> Result<Self> {
        let resultants = SPECIES
            .iter()
            .map(|&species| {
                let start = fold(station, ctx, species, 0.0)?;
                let end = fold(station, ctx, species, 24.0)?;
                Ok(Resultant {
                    species,
                    amplitude: [start.0, end.0],
                    phase: [start.1, end.1],
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            mean_level: station.mean_level(),
            resultants,
        })
    }

    /// Interpolated height at `hours` after midnight.
    pub fn height(&self, hours: f64) -> f64 {
        self.resultants
            .iter()
            .fold(self.mean_level, |acc, r| acc + r.value_at(hours))
    }

    pub fn resultants(&self) -> &[Resultant] {
        &self.resultants
    }
}

/// Amplitude and phase (degrees) of the sum of all lines of one species at `hours`.
fn fold(station: &Station, ctx: &DateContext, species: u8, hours: f64) -> Result<(f64, f64)> {
    let mut x = 0.0;
    let mut y = 0.0;
    for entry in station.entries() {
        let constituent = entry.catalog();
        if constituent.species != species {
            continue;
        }
        let reference = ctx
            .phase_at(entry.catalog_index())
            .ok_or_else(|| TideError::InconsistentConstituentSet(entry.constituent.to_string()))?;
        let angle = (reference + constituent.speed() * hours - entry.phase_lag).to_radians();
        x += entry.amplitude * angle.cos();
        y += entry.amplitude * angle.sin();
    }

    let amplitude = x.hypot(y);
    // A species the station does not use still needs a defined phase
    let phase = if amplitude == 0.0 {
        90.0
    } else {
        y.atan2(x).to_degrees()
    };
    Ok((amplitude, phase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::reference_phases;
    use crate::synth;

    fn realistic() -> Station {
        Station::new(
            "R",
            3.0,
            [
                ("SA", 0.06, 296.0),
                ("K1", 0.064, 74.0),
                ("O1", 0.065, 326.0),
                ("Q1", 0.02, 282.0),
                ("M2", 1.56, 95.0),
                ("N2", 0.315, 76.0),
                ("S2", 0.555, 130.0),
                ("MN4", 0.017, 88.0),
                ("M4", 0.047, 113.0),
                ("MS4", 0.03, 170.0),
            ],
        )
        .unwrap()
        .with_inferred_minor()
    }

    #[test]
    fn test_exact_at_day_boundaries() {
        let station = realistic();
        let ctx = reference_phases(1982, 1, 1).unwrap();
        let daily = DailyResultants::compute(&station, &ctx).unwrap();

        for t in [0.0, 24.0] {
            let direct = synth::height(&station, &ctx, t).unwrap();
            assert!((daily.height(t) - direct).abs() < 1e-9, "mismatch at {t}");
        }
    }

    #[test]
    fn test_close_to_direct_sum_during_the_day() {
        let station = realistic();
        let ctx = reference_phases(2014, 8, 15).unwrap();
        let daily = DailyResultants::compute(&station, &ctx).unwrap();

        for step in 0..=48 {
            let t = f64::from(step) * 0.5;
            let direct = synth::height(&station, &ctx, t).unwrap();
            assert!((daily.height(t) - direct).abs() < 0.05, "drift at {t}");
        }
    }

    #[test]
    fn test_single_line_reproduced_exactly() {
        let station = Station::new("ONE", 2.0, [("M2", 1.0, 104.0)]).unwrap();
        let ctx = reference_phases(2014, 8, 15).unwrap();
        let daily = DailyResultants::compute(&station, &ctx).unwrap();

        for t in [0.0, 3.0, 9.5, 17.25] {
            let direct = synth::height(&station, &ctx, t).unwrap();
            assert!((daily.height(t) - direct).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unused_species_has_zero_amplitude() {
        let station = Station::new("ONE", 2.0, [("M2", 1.0, 104.0)]).unwrap();
        let ctx = reference_phases(2014, 8, 15).unwrap();
        let daily = DailyResultants::compute(&station, &ctx).unwrap();

        let diurnal = daily.resultants().iter().find(|r| r.species == 1).unwrap();
        assert_eq!(diurnal.amplitude, [0.0, 0.0]);
        assert_eq!(diurnal.phase, [90.0, 90.0]);
    }
}
