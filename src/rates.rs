//! Incidents-per-100k rate report.

use anyhow::{Result, bail};
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::Counts;
use crate::config::{MissingPopulation, SortKey};
use crate::population::PopulationTable;

const PER_RESIDENTS: f64 = 100_000.0;

/// Thresholds and policies for [`build_rates`].
#[derive(Debug, Clone, Copy)]
pub struct RateOptions {
    pub min_incidents: usize,
    pub min_population: u64,
    pub metro: bool,
    pub sort_by: SortKey,
    pub on_missing_population: MissingPopulation,
}

/// One row of the rate report. Metro columns are omitted entirely when `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRow {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Incidents")]
    pub incidents: usize,
    #[serde(rename = "Population")]
    pub population: u64,
    #[serde(rename = "Metro Population", skip_serializing_if = "Option::is_none")]
    pub metro_population: Option<u64>,
    #[serde(rename = "Incidents per 100k residents")]
    pub rate: f64,
    #[serde(
        rename = "Incidents per 100k metro residents",
        skip_serializing_if = "Option::is_none"
    )]
    pub metro_rate: Option<f64>,
}

/// Column names for the rate report, with or without metro columns.
pub fn rate_headers(metro: bool) -> Vec<&'static str> {
    let mut headers = vec!["State", "City", "Incidents", "Population"];
    if metro {
        headers.push("Metro Population");
    }
    headers.push("Incidents per 100k residents");
    if metro {
        headers.push("Incidents per 100k metro residents");
    }
    headers
}

/// Incidents per 100,000 residents, rounded to 5 decimal places.
pub fn per_100k(incidents: usize, population: u64) -> f64 {
    let rate = incidents as f64 / (population as f64 / PER_RESIDENTS);
    (rate * 1e5).round() / 1e5
}

/// Joins incident counts with population data and computes rates.
///
/// Keys mentioning "Unknown" and keys under either threshold are dropped.
/// Output is sorted descending by `options.sort_by`; equal keys keep their
/// (state, city) order.
///
/// # Errors
///
/// Under [`MissingPopulation::Fail`], a counted city with no population
/// entry is a lookup error.
#[tracing::instrument(skip(counts, populations), fields(cities = counts.len()))]
pub fn build_rates(
    counts: &Counts,
    populations: &PopulationTable,
    options: &RateOptions,
) -> Result<Vec<RateRow>> {
    let enough = counts
        .values()
        .filter(|&&n| n >= options.min_incidents)
        .count();
    info!(enough, min_incidents = options.min_incidents, "Cities with enough incidents");

    let mut rows = Vec::new();

    for (key, &incidents) in counts {
        if key.is_unknown() || incidents < options.min_incidents {
            continue;
        }

        let Some(record) = populations.get(key) else {
            match options.on_missing_population {
                MissingPopulation::Fail => bail!("No population entry for {key}"),
                MissingPopulation::Skip => {
                    warn!(%key, incidents, "No population entry, skipping");
                    continue;
                }
            }
        };

        if record.population < options.min_population {
            continue;
        }
        if record.population == 0 {
            warn!(%key, "Population is zero, skipping");
            continue;
        }

        let (metro_population, metro_rate) = if options.metro {
            match record.metro_population {
                Some(metro) if metro > 0 => (Some(metro), Some(per_100k(incidents, metro))),
                _ => {
                    warn!(%key, "No usable metro population, skipping");
                    continue;
                }
            }
        } else {
            (None, None)
        };

        rows.push(RateRow {
            state: key.state().to_string(),
            city: key.city().to_string(),
            incidents,
            population: record.population,
            metro_population,
            rate: per_100k(incidents, record.population),
            metro_rate,
        });
    }

    match options.sort_by {
        SortKey::Incidents => rows.sort_by(|a, b| b.incidents.cmp(&a.incidents)),
        SortKey::Rate => rows.sort_by(|a, b| b.rate.total_cmp(&a.rate)),
    }

    info!(rows = rows.len(), "Rate report built");
    Ok(rows)
}
