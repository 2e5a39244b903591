//! # End-to-End Prediction Tests
//!
//! Exercises the whole pipeline (station table → date context → synthesis)
//! on the built-in stations and on station files written to disk, checking
//! the properties a tide prediction must have regardless of the exact
//! harmonic constants.

use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::NamedTempFile;

use crate::astro::{reference_phases, DateContext};
use crate::constituent::speed_of;
use crate::station::{Station, StationTable};
use crate::synth;
use crate::tide::Tide;
use crate::{Method, TideError};

/// Height written out term by term, independent of `synth::height`.
fn manual_height(station: &Station, ctx: &DateContext, hours: f64) -> f64 {
    station.entries().iter().fold(station.mean_level(), |acc, e| {
        let speed = speed_of(e.constituent).unwrap();
        let reference = ctx.phase_of(e.constituent).unwrap();
        acc + e.amplitude * (reference + speed * hours - e.phase_lag).to_radians().cos()
    })
}

/// The built-in CONCARNEAU station follows the harmonic formula exactly.
#[test]
fn builtin_concarneau_matches_formula() {
    let table = StationTable::builtin().unwrap();
    let tide = Tide::new(table, "CONCARNEAU", 2014, 8, 15).unwrap();
    let station = tide.station().unwrap();
    let ctx = tide.date().unwrap();

    // Principal lines plus everything inferred from them
    assert!(station.entries().len() > 10);

    let expected = manual_height(station, ctx, 9.5);
    assert!((tide.height(9.5).unwrap() - expected).abs() < 1e-9);
}

/// The built-in CONCARNEAU table reproduces the published 2302 mm at
/// 00:00 on 1982-01-01 with both methods.
#[test]
fn concarneau_1982_reference_height() {
    let table = StationTable::builtin().unwrap();
    let tide = Tide::new(table, "CONCARNEAU", 1982, 1, 1).unwrap();

    let direct = tide.height(0.0).unwrap();
    let species = tide.height_with(Method::Species, 0.0).unwrap();
    assert!((direct - 2.302).abs() < 0.01, "direct {direct}");
    assert!((species - 2.302).abs() < 0.01, "species {species}");
    assert_eq!((direct * 1000.0) as i64, 2302);
}

/// Heights never leave the envelope mean ± Σ amplitudes.
#[test]
fn heights_stay_within_amplitude_envelope() {
    let table = StationTable::builtin().unwrap();
    for name in table.names() {
        let station = table.lookup(name).unwrap();
        let bound: f64 = station.entries().iter().map(|e| e.amplitude).sum();
        let ctx = reference_phases(1982, 1, 1).unwrap();

        for step in 0..=96 {
            let h = synth::height(station, &ctx, f64::from(step) * 0.25).unwrap();
            assert!(
                (h - station.mean_level()).abs() <= bound + 1e-9,
                "{name}: {h} outside envelope"
            );
        }
    }
}

/// A semidiurnal station shows two highs and two lows on most days.
#[test]
fn builtin_station_has_semidiurnal_extremes() {
    let table = StationTable::builtin().unwrap();
    let tide = Tide::new(table, "brest", 2014, 8, 15).unwrap();
    let extremes = tide.extremes().unwrap();

    assert!(
        (3..=5).contains(&extremes.len()),
        "expected 3-5 extremes, got {}",
        extremes.len()
    );
    for pair in extremes.windows(2) {
        let gap = pair[1].hours - pair[0].hours;
        assert!((4.0..8.5).contains(&gap), "HW/LW gap {gap} h is implausible");
    }
}

/// Extrapolating past 24 h agrees with re-deriving the next date's context.
#[test]
fn multi_day_extrapolation_matches_new_date() {
    let table = StationTable::builtin().unwrap();
    let station = table.lookup("CONCARNEAU").unwrap();
    let start = reference_phases(2014, 8, 15).unwrap();

    let mut ctx = start.clone();
    for day in 1..=3 {
        ctx = ctx.next_day().unwrap();
        for t in [0.0, 6.5, 18.0] {
            let extrapolated = synth::height(station, &start, 24.0 * f64::from(day) + t).unwrap();
            let fresh = synth::height(station, &ctx, t).unwrap();
            assert!((extrapolated - fresh).abs() < 1e-9);
        }
    }
}

/// A station file on disk loads and predicts like the embedded table.
#[test]
fn station_file_on_disk() {
    let file = NamedTempFile::new().expect("Should create temp file");
    fs::write(
        file.path(),
        r#"
[[station]]
name = "Anse Test"
mean_level = 250.0   # centimetres
infer_minor = false

[station.constituents]
M2 = { amplitude = 120.0, phase = 90.0 }
"#,
    )
    .expect("Should write station file");

    let table = StationTable::from_path(file.path()).unwrap();
    let tide = Tide::new(&table, "anse test", 2014, 8, 15).unwrap();

    // Heights come back in the file's unit
    let h = tide.height(3.0).unwrap();
    assert!((130.0..=370.0).contains(&h));
}

/// A missing station file is an IO error, not a panic.
#[test]
fn missing_station_file() {
    assert!(matches!(
        StationTable::from_path("/nonexistent/stations.toml"),
        Err(TideError::Io(_))
    ));
}

/// Unknown inputs are rejected with the documented error kinds.
#[test]
fn unknown_input_rejection() {
    let table = StationTable::builtin().unwrap();
    assert!(matches!(
        table.lookup("NONEXISTENT_STATION"),
        Err(TideError::UnknownStation(_))
    ));
    assert!(matches!(
        reference_phases(2014, 2, 30),
        Err(TideError::InvalidDate { .. })
    ));
    assert!(matches!(
        Tide::new(table, "BREST", 1899, 12, 31),
        Err(TideError::DateOutOfRange(_))
    ));
}

/// Shared read-only data gives identical results on every thread.
#[test]
fn concurrent_queries_agree() {
    let table = StationTable::builtin().unwrap();
    let station = table.lookup("BREST").unwrap();
    let ctx = Arc::new(reference_phases(2020, 3, 20).unwrap());
    let expected: Vec<u64> = (0..24)
        .map(|t| synth::height(station, &ctx, f64::from(t)).unwrap().to_bits())
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                let station = StationTable::builtin().unwrap().lookup("BREST").unwrap();
                (0..24)
                    .map(|t| synth::height(station, &ctx, f64::from(t)).unwrap().to_bits())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

/// Both methods produce the same sample grid and stay close to each other.
#[test]
fn species_method_tracks_direct_sum() {
    let table = StationTable::builtin().unwrap();
    let tide = Tide::new(table, "CONCARNEAU", 1982, 1, 1).unwrap();

    let direct = tide.series(Method::Direct, 0.0, 24.0, 10).unwrap();
    let species = tide.series(Method::Species, 0.0, 24.0, 10).unwrap();
    assert_eq!(direct.samples.len(), 145);
    assert_eq!(direct.samples.len(), species.samples.len());

    for (a, b) in direct.samples.iter().zip(&species.samples) {
        assert_eq!(a.hours, b.hours);
        assert!((a.height - b.height).abs() < 0.05);
    }

    // Exact at both ends of the day
    assert!((direct.samples[0].height - species.samples[0].height).abs() < 1e-9);
    assert!((direct.samples[144].height - species.samples[144].height).abs() < 1e-9);
}

/// Samples are evenly spaced and in chronological order.
#[test]
fn series_is_chronological() {
    let table = StationTable::builtin().unwrap();
    let tide = Tide::new(table, "BREST", 2014, 8, 15).unwrap();
    let series = tide.series(Method::Direct, 0.0, 24.0, 10).unwrap();

    for window in series.samples.windows(2) {
        let gap = window[1].hours - window[0].hours;
        assert!((gap - 10.0 / 60.0).abs() < 1e-9, "uneven spacing {gap}");
    }
    assert_eq!(series.samples[0].hours, 0.0);
}

/// Series survive a JSON round trip unchanged.
#[test]
fn series_json_roundtrip() {
    let table = StationTable::builtin().unwrap();
    let tide = Tide::new(table, "BREST", 2014, 8, 15).unwrap();
    let series = tide.series(Method::Species, 0.0, 2.0, 30).unwrap();

    let encoded = serde_json::to_string(&series).expect("Should serialize tide series");
    assert!(encoded.contains("\"method\":\"species\""));
    let decoded: crate::TideSeries = serde_json::from_str(&encoded).expect("Should deserialize");
    assert_eq!(decoded.station, series.station);
    assert_eq!(decoded.date, series.date);
    assert_eq!(decoded.method, series.method);
    assert_eq!(decoded.samples.len(), series.samples.len());
    for (original, loaded) in series.samples.iter().zip(&decoded.samples) {
        assert!((original.hours - loaded.hours).abs() < 1e-12);
        assert!((original.height - loaded.height).abs() < 1e-12);
    }
}

#[cfg(test)]
mod performance_tests {
    use super::*;
    use std::time::Instant;

    /// A full day at one-minute resolution is well under a blink.
    #[test]
    fn full_day_prediction_is_fast() {
        let table = StationTable::builtin().unwrap();
        let tide = Tide::new(table, "BREST", 2014, 8, 15).unwrap();

        let start = Instant::now();
        let series = tide.series(Method::Direct, 0.0, 24.0, 1).unwrap();
        let duration = start.elapsed();

        assert_eq!(series.samples.len(), 1441);
        assert!(
            duration.as_millis() < 500,
            "prediction took too long: {:?}",
            duration
        );
    }
}
