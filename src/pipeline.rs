//! Runs the stages in order: fetch, aggregate, join, histogram, write.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::info;

use crate::aggregate::count_by_city;
use crate::config::{ReportConfig, TEAR_GAS_TAG};
use crate::dates::{count_city_by_date, count_tag_by_date};
use crate::fetch::{HttpClient, fetch_incidents};
use crate::incidents::{Incident, normalize};
use crate::output::{write_city_dates, write_rate_report, write_tear_gas_days};
use crate::population::{PopulationTable, load_population};
use crate::rates::{RateOptions, build_rates};

/// Paths of the reports written by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub rates: PathBuf,
    pub city_dates: PathBuf,
    pub tear_gas: PathBuf,
}

impl From<&ReportConfig> for RateOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            min_incidents: config.min_incidents,
            min_population: config.min_population,
            metro: config.metro,
            sort_by: config.sort_by,
            on_missing_population: config.on_missing_population,
        }
    }
}

/// Full run: one fetch, then [`write_reports`] with today's date as the end
/// of the tear-gas series.
#[tracing::instrument(skip_all, fields(api_url = %config.api_url))]
pub async fn run<C: HttpClient>(client: &C, config: &ReportConfig) -> Result<Written> {
    let incidents = fetch_incidents(client, &config.api_url).await?;
    let incidents = normalize(incidents, config.exclude_non_protest);
    info!(count = incidents.len(), "Found incidents");

    let populations = load_population(&config.population_file, config.metro)?;

    write_reports(&incidents, &populations, config, Local::now().date_naive())
}

/// Derives and writes every report from already-normalized incidents.
pub fn write_reports(
    incidents: &[Incident],
    populations: &PopulationTable,
    config: &ReportConfig,
    today: NaiveDate,
) -> Result<Written> {
    let counts = count_by_city(incidents);
    let rate_rows = build_rates(&counts, populations, &RateOptions::from(config))?;
    let rates = write_rate_report(
        &config.output_dir,
        config.min_incidents,
        config.min_population,
        config.metro,
        &rate_rows,
    )?;

    let city_rows = count_city_by_date(incidents, &config.city);
    let city_dates = write_city_dates(&config.output_dir, &config.city, &city_rows)?;

    let tear_gas_rows = count_tag_by_date(incidents, TEAR_GAS_TAG, config.since, today)?;
    let tear_gas = write_tear_gas_days(&config.output_dir, &tear_gas_rows)?;

    Ok(Written {
        rates,
        city_dates,
        tear_gas,
    })
}
