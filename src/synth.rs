//! # Harmonic Synthesis
//!
//! The height at `hours` after midnight of the context's date is
//!
//! ```text
//! h = Z0 + Σ A · cos(V0 + ω · hours − G)
//! ```
//!
//! summed over the station's entries in catalog order, so repeated calls are
//! bit-for-bit identical.
//!
//! `hours` is not clamped to a single day. Arguments are linear in time, so
//! `height(ctx, 24 · k + t)` predicts day `k` after the context's date; see
//! [`height_on_day_offset`].

use crate::astro::DateContext;
use crate::error::{Result, TideError};
use crate::station::Station;
use crate::Sample;
use serde::Serialize;

/// Tide height of `station` at `hours` after midnight of `ctx`'s date.
///
/// Heights come back in the unit of the station table; nothing is converted.
pub fn height(station: &Station, ctx: &DateContext, hours: f64) -> Result<f64> {
    station
        .entries()
        .iter()
        .try_fold(station.mean_level(), |acc, entry| {
            let reference = ctx
                .phase_at(entry.catalog_index())
                .ok_or_else(|| TideError::InconsistentConstituentSet(entry.constituent.to_string()))?;
            let argument = reference + entry.catalog().speed() * hours - entry.phase_lag;
            Ok(acc + entry.amplitude * argument.to_radians().cos())
        })
}

/// Height `day_offset` whole days after the context's date.
pub fn height_on_day_offset(
    station: &Station,
    ctx: &DateContext,
    day_offset: i64,
    hours: f64,
) -> Result<f64> {
    height(station, ctx, 24.0 * day_offset as f64 + hours)
}

/// Most samples a single series may hold (a year at one-minute spacing).
pub const MAX_SAMPLES: usize = 366 * 24 * 60 + 1;

/// Sample `model` every `step_minutes` from `start_hours` to `end_hours` inclusive.
///
/// A zero step, a non-finite window, or a window needing more than
/// [`MAX_SAMPLES`] points is rejected with [`TideError::InvalidSampling`].
pub fn sample<F>(start_hours: f64, end_hours: f64, step_minutes: u32, mut model: F) -> Result<Vec<Sample>>
where
    F: FnMut(f64) -> Result<f64>,
{
    if step_minutes == 0 {
        return Err(TideError::InvalidSampling(
            "step must be at least one minute".into(),
        ));
    }
    if !start_hours.is_finite() || !end_hours.is_finite() {
        return Err(TideError::InvalidSampling(format!(
            "window {start_hours}..{end_hours} is not finite"
        )));
    }

    let step = f64::from(step_minutes) / 60.0;
    let intervals = ((end_hours - start_hours) / step + 1e-9).floor().max(0.0);
    if intervals >= MAX_SAMPLES as f64 {
        return Err(TideError::InvalidSampling(format!(
            "{start_hours}..{end_hours} h every {step_minutes} min exceeds {MAX_SAMPLES} samples"
        )));
    }
    let count = intervals as usize + 1;

    let mut samples = Vec::with_capacity(count);
    for i in 0..count {
        let hours = start_hours + i as f64 * step;
        samples.push(Sample {
            hours,
            height: model(hours)?,
        });
    }
    Ok(samples)
}

/// Whether an extreme is a high or a low water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtremeKind {
    High,
    Low,
}

/// A high or low water located from a sampled curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extreme {
    pub kind: ExtremeKind,
    pub hours: f64,
    pub height: f64,
}

/// Locate high and low waters in uniformly spaced samples.
///
/// Each local maximum/minimum is refined by fitting a parabola through it
/// and its two neighbours. Extremes at the very first or last sample are not
/// reported since the turning point may lie outside the window.
pub fn extremes(samples: &[Sample]) -> Vec<Extreme> {
    samples
        .windows(3)
        .filter_map(|w| {
            let (y0, y1, y2) = (w[0].height, w[1].height, w[2].height);
            let kind = if y1 >= y0 && y1 > y2 {
                ExtremeKind::High
            } else if y1 <= y0 && y1 < y2 {
                ExtremeKind::Low
            } else {
                return None;
            };

            let d = w[2].hours - w[1].hours;
            let curvature = y0 - 2.0 * y1 + y2;
            let (hours, height) = if curvature != 0.0 {
                (
                    w[1].hours + d * (y0 - y2) / (2.0 * curvature),
                    y1 - (y2 - y0).powi(2) / (8.0 * curvature),
                )
            } else {
                (w[1].hours, y1)
            };

            Some(Extreme { kind, hours, height })
        })
        .collect()
}
