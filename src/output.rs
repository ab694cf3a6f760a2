//! CSV report files.
//!
//! Every report is written with an explicit header row, so a report with no
//! rows is still a valid CSV. Existing files are overwritten.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::dates::{CityDateCount, TearGasDay};
use crate::rates::{RateRow, rate_headers};

pub const TEAR_GAS_FILE_NAME: &str = "tear_gas_incidents_by_date.csv";

pub fn rates_file_name(min_incidents: usize, min_population: u64) -> String {
    format!("incidents_per_100k_min_{min_incidents}_incidents_min_{min_population}_pop.csv")
}

pub fn city_dates_file_name(city: &str) -> String {
    format!("incidents_{}_incidents_by_date.csv", city.to_lowercase())
}

/// Writes `headers` then every row of `rows`, in order, to `path`.
pub fn write_rows<R: Serialize>(path: &Path, headers: &[&str], rows: &[R]) -> Result<()> {
    info!(path = %path.display(), rows = rows.len(), "Writing report");

    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!(path = %path.display(), "Report flushed");
    Ok(())
}

pub fn write_rate_report(
    dir: &Path,
    min_incidents: usize,
    min_population: u64,
    metro: bool,
    rows: &[RateRow],
) -> Result<PathBuf> {
    let path = dir.join(rates_file_name(min_incidents, min_population));
    write_rows(&path, &rate_headers(metro), rows)?;
    Ok(path)
}

pub fn write_city_dates(dir: &Path, city: &str, rows: &[CityDateCount]) -> Result<PathBuf> {
    let path = dir.join(city_dates_file_name(city));
    write_rows(&path, &["Date", "Num Incidents"], rows)?;
    Ok(path)
}

pub fn write_tear_gas_days(dir: &Path, rows: &[TearGasDay]) -> Result<PathBuf> {
    let path = dir.join(TEAR_GAS_FILE_NAME);
    write_rows(&path, &["Date", "Num Incidents With Tear Gas"], rows)?;
    Ok(path)
}
