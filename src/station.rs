//! # Station Harmonic Constants
//!
//! A station is a mean level plus a sparse table of (amplitude, phase lag)
//! pairs, one per catalog constituent it uses. Stations are built once from
//! static data and never change afterwards.
//!
//! ## Data Format
//!
//! Station tables are TOML documents:
//!
//! ```toml
//! [[station]]
//! name = "CONCARNEAU"
//! mean_level = 3.0        # same unit as the amplitudes
//! utc_offset = 0.0        # time zone the phase lags refer to
//!
//! [station.constituents]
//! M2 = { amplitude = 1.56, phase = 104.0 }
//! S2 = { amplitude = 0.56, phase = 141.0 }
//! ```
//!
//! ## Minor Constituents
//!
//! Printed tables only list the principal lines. Unless `infer_minor = false`,
//! the minor lines are derived from their parent with the fixed amplitude
//! ratios of the classical method; a minor line listed explicitly always wins.

use crate::astro::normalize_degrees;
use crate::constituent::{self, Constituent, CATALOG};
use crate::error::{Result, TideError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Station used when none is named.
pub const DEFAULT_STATION: &str = "BREST";

/// Station table shipped with the crate.
const EMBEDDED_STATIONS: &str = include_str!("../data/stations.toml");

/// (minor, parent, amplitude ratio). A negative ratio is a 180° phase shift.
const INFERENCES: &[(&str, &str, f64)] = &[
    ("P1", "K1", -1.0 / 3.0),
    ("O1N", "O1", 1.0 / 5.3),
    ("K1N", "K1", 1.0 / 7.4),
    ("2N2", "N2", 1.0 / 7.6),
    ("MU2", "N2", 1.0 / 6.3),
    ("NU2", "N2", 1.0 / 5.3),
    ("L2", "M2", -1.0 / 35.0),
    ("K2", "S2", 1.0 / 3.7),
    ("T2", "S2", 1.0 / 17.0),
    ("M2N", "M2", -1.0 / 27.0),
    ("K2N", "S2", 1.0 / 12.0),
];

/// Canonical form of a station name: trimmed, upper case.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Amplitude and phase lag of one constituent at one station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationEntry {
    /// Catalog name of the constituent
    pub constituent: &'static str,
    /// Half the range contributed by this line, station height unit
    pub amplitude: f64,
    /// Phase lag in degrees, [0, 360)
    pub phase_lag: f64,
    #[serde(skip)]
    index: usize,
}

impl StationEntry {
    /// Validate and build an entry for a catalog constituent.
    pub fn new(name: &str, amplitude: f64, phase_lag: f64) -> Result<Self> {
        let index = constituent::index_of(name)?;
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(TideError::InvalidStationData(format!(
                "amplitude of {} must be a finite non-negative number, got {amplitude}",
                CATALOG[index].name
            )));
        }
        if !phase_lag.is_finite() {
            return Err(TideError::InvalidStationData(format!(
                "phase of {} must be finite, got {phase_lag}",
                CATALOG[index].name
            )));
        }

        Ok(Self {
            constituent: CATALOG[index].name,
            amplitude,
            phase_lag: normalize_degrees(phase_lag),
            index,
        })
    }

    /// Minor line at catalog `index`, scaled from an already validated parent.
    fn derived(index: usize, parent: &StationEntry, ratio: f64) -> Self {
        let shift = if ratio < 0.0 { 180.0 } else { 0.0 };
        Self {
            constituent: CATALOG[index].name,
            amplitude: parent.amplitude * ratio.abs(),
            phase_lag: normalize_degrees(parent.phase_lag + shift),
            index,
        }
    }

    /// Catalog record of the constituent.
    pub fn catalog(&self) -> &'static Constituent {
        &CATALOG[self.index]
    }

    pub(crate) fn catalog_index(&self) -> usize {
        self.index
    }
}

/// Harmonic constants of one tide station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    name: String,
    mean_level: f64,
    latitude: Option<f64>,
    longitude: Option<f64>,
    utc_offset: Option<f64>,
    /// Sorted by catalog index, no duplicates
    entries: Vec<StationEntry>,
}

impl Station {
    /// Build a station from `(constituent, amplitude, phase_lag)` triples.
    ///
    /// Entries are stored in catalog order so that synthesis always sums in
    /// the same order. A constituent listed twice is rejected.
    pub fn new<'n, I>(name: &str, mean_level: f64, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'n str, f64, f64)>,
    {
        let name = normalize_name(name);
        if name.is_empty() {
            return Err(TideError::InvalidStationData("empty station name".into()));
        }
        if !mean_level.is_finite() {
            return Err(TideError::InvalidStationData(format!(
                "{name}: mean level must be finite"
            )));
        }

        let mut parsed = entries
            .into_iter()
            .map(|(c, amplitude, phase)| StationEntry::new(c, amplitude, phase))
            .collect::<Result<Vec<_>>>()?;
        parsed.sort_by_key(StationEntry::catalog_index);

        if let Some(pair) = parsed.windows(2).find(|w| w[0].index == w[1].index) {
            return Err(TideError::InvalidStationData(format!(
                "{name}: constituent {} listed twice",
                pair[0].constituent
            )));
        }

        Ok(Self {
            name,
            mean_level,
            latitude: None,
            longitude: None,
            utc_offset: None,
            entries: parsed,
        })
    }

    /// Attach the printed position of the station.
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Attach the time zone (hours east of UTC) the phase lags refer to.
    pub fn with_utc_offset(mut self, hours: f64) -> Self {
        self.utc_offset = Some(hours);
        self
    }

    /// Add the minor constituents derived from their parents.
    pub fn with_inferred_minor(mut self) -> Self {
        for &(minor, parent, ratio) in INFERENCES {
            if self.entry(minor).is_some() {
                continue;
            }
            let Some(parent) = self.entry(parent).copied() else {
                continue;
            };
            let Some(index) = CATALOG.iter().position(|c| c.name == minor) else {
                continue;
            };
            self.entries.push(StationEntry::derived(index, &parent, ratio));
        }
        self.entries.sort_by_key(StationEntry::catalog_index);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mean level about which the constituents oscillate.
    pub fn mean_level(&self) -> f64 {
        self.mean_level
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn utc_offset(&self) -> Option<f64> {
        self.utc_offset
    }

    /// Entries in catalog order.
    pub fn entries(&self) -> &[StationEntry] {
        &self.entries
    }

    /// Entry for a constituent, if the station uses it.
    pub fn entry(&self, name: &str) -> Option<&StationEntry> {
        let index = constituent::index_of(name).ok()?;
        self.entries.iter().find(|e| e.index == index)
    }
}

/// Read-only table of stations keyed by normalised name.
#[derive(Debug, Clone, Default)]
pub struct StationTable {
    stations: HashMap<String, Station>,
}

impl StationTable {
    /// Build a table, rejecting two stations with the same name.
    pub fn from_stations<I>(stations: I) -> Result<Self>
    where
        I: IntoIterator<Item = Station>,
    {
        let mut table = HashMap::new();
        for station in stations {
            let key = station.name.clone();
            if table.insert(key.clone(), station).is_some() {
                return Err(TideError::InvalidStationData(format!(
                    "station {key} defined twice"
                )));
            }
        }
        Ok(Self { stations: table })
    }

    /// Parse a TOML station document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: RawStationFile = toml::from_str(contents)?;
        let stations = file
            .station
            .into_iter()
            .map(RawStation::into_station)
            .collect::<Result<Vec<_>>>()?;
        let table = Self::from_stations(stations)?;
        debug!(stations = table.len(), "station table parsed");
        Ok(table)
    }

    /// Load a TOML station document from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(&path)?;
        debug!(path = %path.as_ref().display(), "loading station table");
        Self::from_toml_str(&contents)
    }

    /// Table compiled into the crate, parsed on first use.
    pub fn builtin() -> Result<&'static StationTable> {
        static BUILTIN: OnceLock<StationTable> = OnceLock::new();

        if let Some(table) = BUILTIN.get() {
            return Ok(table);
        }
        let table = Self::from_toml_str(EMBEDDED_STATIONS)?;
        Ok(BUILTIN.get_or_init(|| table))
    }

    /// Resolve a station name; case and surrounding whitespace are ignored.
    pub fn lookup(&self, name: &str) -> Result<&Station> {
        let key = normalize_name(name);
        self.stations
            .get(&key)
            .ok_or(TideError::UnknownStation(key))
    }

    /// Station names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

// -- On-disk layout --

#[derive(Debug, Deserialize)]
struct RawStationFile {
    #[serde(default)]
    station: Vec<RawStation>,
}

#[derive(Debug, Deserialize)]
struct RawStation {
    name: String,
    mean_level: f64,
    latitude: Option<f64>,
    longitude: Option<f64>,
    utc_offset: Option<f64>,
    #[serde(default = "default_infer_minor")]
    infer_minor: bool,
    #[serde(default)]
    constituents: BTreeMap<String, RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    amplitude: f64,
    phase: f64,
}

fn default_infer_minor() -> bool {
    true
}

impl RawStation {
    fn into_station(self) -> Result<Station> {
        let entries = self
            .constituents
            .iter()
            .map(|(name, e)| (name.as_str(), e.amplitude, e.phase));
        let mut station = Station::new(&self.name, self.mean_level, entries)?;

        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            station = station.with_location(lat, lon);
        }
        if let Some(offset) = self.utc_offset {
            station = station.with_utc_offset(offset);
        }
        if self.infer_minor {
            station = station.with_inferred_minor();
        }
        Ok(station)
    }
}
