//! Run configuration shared by every pipeline stage.

use chrono::NaiveDate;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str =
    "https://raw.githubusercontent.com/2020PB/police-brutality/data_build/all-locations-v2.json";
pub const DEFAULT_POPULATION_FILE: &str = "city_pop.csv";
pub const DEFAULT_CITY: &str = "Portland";
pub const DEFAULT_MIN_INCIDENTS: usize = 10;
pub const DEFAULT_MIN_POPULATION: u64 = 100_000;

/// Tag counted by the dense by-date series.
pub const TEAR_GAS_TAG: &str = "tear-gas";

/// Tag marking records that are not protest-related.
pub const NON_PROTEST_TAG: &str = "non-protest";

/// Secondary place names folded into a canonical city at ingestion.
pub const CITY_ALIASES: &[(&str, &str)] = &[
    ("Hollywood", "Los Angeles"),
    ("Compton", "Los Angeles"),
];

/// First day of the tear-gas series.
pub fn default_since() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 5, 28).unwrap_or_default()
}

/// What to do when a counted city has no population entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MissingPopulation {
    /// Abort the run with a lookup error.
    #[default]
    Fail,
    /// Log a warning and leave the city out of the report.
    Skip,
}

/// Descending sort key for the rate report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    #[default]
    Incidents,
    Rate,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub api_url: String,
    pub population_file: PathBuf,
    pub output_dir: PathBuf,
    pub min_incidents: usize,
    pub min_population: u64,
    pub city: String,
    pub since: NaiveDate,
    pub metro: bool,
    pub sort_by: SortKey,
    pub on_missing_population: MissingPopulation,
    pub exclude_non_protest: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            population_file: PathBuf::from(DEFAULT_POPULATION_FILE),
            output_dir: PathBuf::from("."),
            min_incidents: DEFAULT_MIN_INCIDENTS,
            min_population: DEFAULT_MIN_POPULATION,
            city: DEFAULT_CITY.to_string(),
            since: default_since(),
            metro: false,
            sort_by: SortKey::default(),
            on_missing_population: MissingPopulation::default(),
            exclude_non_protest: true,
        }
    }
}

/// Returns the canonical city for `city`, folding known aliases.
pub fn canonical_city(city: &str) -> Option<&'static str> {
    CITY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == city)
        .map(|(_, canonical)| *canonical)
}
