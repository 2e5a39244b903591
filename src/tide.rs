//! # Tide Façade
//!
//! [`Tide`] remembers the currently selected station and date and forwards
//! height queries to the pure synthesis functions. Selection must succeed
//! for both before [`Tide::height`] can answer; a failed selection leaves
//! the previous one in place.
//!
//! A `Tide` is cheap and owned by whoever uses it. Share the
//! [`StationTable`] between threads, not the `Tide`.

use crate::astro::DateContext;
use crate::error::{Result, TideError};
use crate::species::DailyResultants;
use crate::station::{Station, StationTable};
use crate::synth::{self, Extreme};
use crate::{Method, TideSeries};
use chrono::{Datelike, Local};
use std::fmt;
use tracing::debug;

/// Current station/date selection over a station table.
#[derive(Debug, Clone)]
pub struct Tide<'a> {
    table: &'a StationTable,
    station: Option<&'a Station>,
    date: Option<DateContext>,
}

impl<'a> Tide<'a> {
    /// A façade with nothing selected yet.
    pub fn unselected(table: &'a StationTable) -> Self {
        Self {
            table,
            station: None,
            date: None,
        }
    }

    /// Select a station and a date in one step.
    pub fn new(table: &'a StationTable, station: &str, year: i32, month: u32, day: u32) -> Result<Self> {
        let mut tide = Self::unselected(table);
        tide.set_station(station)?;
        tide.set_date(year, month, day)?;
        Ok(tide)
    }

    /// Select a station and today's local calendar date.
    pub fn for_today(table: &'a StationTable, station: &str) -> Result<Self> {
        let today = Local::now().date_naive();
        Self::new(table, station, today.year(), today.month(), today.day())
    }

    /// Select the station used by subsequent queries.
    pub fn set_station(&mut self, name: &str) -> Result<()> {
        let station = self.table.lookup(name)?;
        debug!(station = station.name(), "station selected");
        self.station = Some(station);
        Ok(())
    }

    /// Select the date used by subsequent queries.
    pub fn set_date(&mut self, year: i32, month: u32, day: u32) -> Result<()> {
        let ctx = DateContext::for_date(year, month, day)?;
        debug!(date = %ctx, "date selected");
        self.date = Some(ctx);
        Ok(())
    }

    pub fn station(&self) -> Option<&'a Station> {
        self.station
    }

    pub fn date(&self) -> Option<&DateContext> {
        self.date.as_ref()
    }

    fn selection(&self) -> Result<(&'a Station, &DateContext)> {
        match (self.station, self.date.as_ref()) {
            (Some(station), Some(ctx)) => Ok((station, ctx)),
            _ => Err(TideError::NotInitialized),
        }
    }

    /// Height at `hours` after midnight of the selected date.
    pub fn height(&self, hours: f64) -> Result<f64> {
        let (station, ctx) = self.selection()?;
        synth::height(station, ctx, hours)
    }

    /// Height using an explicit computation method.
    pub fn height_with(&self, method: Method, hours: f64) -> Result<f64> {
        let (station, ctx) = self.selection()?;
        match method {
            Method::Direct => synth::height(station, ctx, hours),
            Method::Species => Ok(DailyResultants::compute(station, ctx)?.height(hours)),
        }
    }

    /// Sampled curve over `[start_hours, end_hours]`.
    pub fn series(
        &self,
        method: Method,
        start_hours: f64,
        end_hours: f64,
        step_minutes: u32,
    ) -> Result<TideSeries> {
        let (station, ctx) = self.selection()?;
        let samples = match method {
            Method::Direct => {
                synth::sample(start_hours, end_hours, step_minutes, |t| synth::height(station, ctx, t))?
            }
            Method::Species => {
                let daily = DailyResultants::compute(station, ctx)?;
                synth::sample(start_hours, end_hours, step_minutes, |t| Ok(daily.height(t)))?
            }
        };

        Ok(TideSeries {
            station: station.name().to_string(),
            date: ctx.date(),
            method,
            samples,
        })
    }

    /// High and low waters of the selected day, from a one-minute direct curve.
    pub fn extremes(&self) -> Result<Vec<Extreme>> {
        let series = self.series(Method::Direct, 0.0, 24.0, 1)?;
        Ok(synth::extremes(&series.samples))
    }

    /// Names of every station in the table.
    pub fn station_list(&self) -> Vec<&'a str> {
        self.table.names()
    }

    /// Time zone of the selected station, hours east of UTC.
    pub fn utc_offset(&self) -> Option<f64> {
        self.station.and_then(Station::utc_offset)
    }
}

impl fmt::Display for Tide<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let station = self.station.map_or("(no station)", Station::name);
        match &self.date {
            Some(ctx) => write!(f, "Tide for {} on {}", station, ctx.date().format("%d %b %Y")),
            None => write!(f, "Tide for {} (no date)", station),
        }
    }
}
