//! # Harmonic Tide Command Line
//!
//! Prints tide predictions for one station and one day.
//!
//! Usage:
//!   harmonic-tide --station CONCARNEAU --date 2014-08-15            # hourly table + HW/LW
//!   harmonic-tide --station CONCARNEAU --date 2014-08-15 --time 9.5 # single height
//!   harmonic-tide --list                                            # known stations
//!
//! Defaults for station, step and method come from `tide-config.toml`.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use harmonic_tide_lib::{
    config::{Config, CONFIG_FILE},
    renderer::{draw_ascii, format_hours, render_extremes, render_table},
    station::StationTable,
    tide::Tide,
    Method,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "harmonic-tide",
    about = "Predict tide heights with the harmonic method"
)]
struct Args {
    /// Station name (case-insensitive); defaults to the configured station
    #[arg(short, long)]
    station: Option<String>,

    /// Date as YYYY-MM-DD; defaults to today
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Single time of day in decimal hours (9.5 = 09:30)
    #[arg(short, long, allow_negative_numbers = true)]
    time: Option<f64>,

    /// Table spacing in minutes
    #[arg(long)]
    step: Option<u32>,

    /// Computation method: direct or species
    #[arg(short, long)]
    method: Option<Method>,

    /// List known stations and exit
    #[arg(long)]
    list: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Draw an ASCII curve of the day
    #[arg(long)]
    ascii: bool,

    /// TOML station table replacing the built-in one
    #[arg(long)]
    data: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for tables and JSON
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load_from_path(&args.config);

    let owned;
    let table: &StationTable = match args.data.as_ref().or(config.station.data_file.as_ref()) {
        Some(path) => {
            owned = StationTable::from_path(path)
                .with_context(|| format!("loading station table {}", path.display()))?;
            &owned
        }
        None => StationTable::builtin().context("parsing built-in station table")?,
    };
    debug!(stations = table.len(), "station table ready");

    if args.list {
        for name in table.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let station = args.station.as_deref().unwrap_or(&config.station.name);
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let method = args.method.unwrap_or(config.output.method);

    let tide = Tide::new(table, station, date.year(), date.month(), date.day())
        .with_context(|| format!("selecting {station} on {date}"))?;

    if let Some(hours) = args.time {
        let height = tide.height_with(method, hours)?;
        if args.json {
            let out = json!({
                "station": tide.station().map(|s| s.name()),
                "date": date,
                "hours": hours,
                "height": height,
                "method": method,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            println!("{tide} at {}: {height:.3}", format_hours(hours));
        }
        return Ok(());
    }

    let step = args.step.unwrap_or(config.output.step_minutes);
    let series = tide.series(method, 0.0, 24.0, step)?;
    let extremes = tide.extremes()?;

    if args.json {
        let out = json!({ "series": series, "extremes": extremes });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print!("{}", render_table(&series));
    println!();
    print!("{}", render_extremes(&extremes));

    if args.ascii || config.output.ascii {
        println!();
        draw_ascii(&tide.series(method, 0.0, 24.0, 15)?);
    }

    Ok(())
}
