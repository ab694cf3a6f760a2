//! CLI entry point: fetch incidents once and write the per-capita and by-date reports.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use incident_rates::config::{
    DEFAULT_API_URL, DEFAULT_CITY, DEFAULT_MIN_INCIDENTS, DEFAULT_MIN_POPULATION,
    DEFAULT_POPULATION_FILE, MissingPopulation, ReportConfig, SortKey,
};
use incident_rates::fetch::{BasicClient, WithHeader};
use incident_rates::pipeline::run;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "incident_rates")]
#[command(about = "Per-capita and by-date reports over published incident data", long_about = None)]
struct Cli {
    /// Minimum number of incidents for a city to be analyzed
    #[arg(long = "min_incidents", default_value_t = DEFAULT_MIN_INCIDENTS)]
    min_incidents: usize,

    /// Minimum population for a city to be analyzed (city proper, not metro)
    #[arg(long = "min_population", default_value_t = DEFAULT_MIN_POPULATION)]
    min_population: u64,

    /// City to use for the by-date report
    #[arg(long, default_value = DEFAULT_CITY)]
    city: String,

    /// CSV of state,city,population[,metro_population]
    #[arg(long, default_value = DEFAULT_POPULATION_FILE)]
    population_file: PathBuf,

    /// Directory the reports are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Incident API endpoint
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// First day of the tear-gas series
    #[arg(long, default_value = "2020-05-28")]
    since: NaiveDate,

    /// Read metro population and add per-100k metro columns
    #[arg(long, default_value_t = false)]
    metro: bool,

    /// Descending sort key for the rate report
    #[arg(long, value_enum, default_value_t = SortKey::Incidents)]
    sort_by: SortKey,

    /// What to do when a counted city has no population entry
    #[arg(long, value_enum, default_value_t = MissingPopulation::Fail)]
    on_missing_population: MissingPopulation,

    /// Keep records tagged non-protest
    #[arg(long, default_value_t = false)]
    include_non_protest: bool,
}

impl From<Cli> for ReportConfig {
    fn from(cli: Cli) -> Self {
        Self {
            api_url: cli.api_url,
            population_file: cli.population_file,
            output_dir: cli.output_dir,
            min_incidents: cli.min_incidents,
            min_population: cli.min_population,
            city: cli.city,
            since: cli.since,
            metro: cli.metro,
            sort_by: cli.sort_by,
            on_missing_population: cli.on_missing_population,
            exclude_non_protest: !cli.include_non_protest,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/incident_rates.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("incident_rates.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let config = ReportConfig::from(Cli::parse());
    info!(
        min_incidents = config.min_incidents,
        min_population = config.min_population,
        city = %config.city,
        "Starting report run"
    );

    let client = WithHeader::no_cache(BasicClient::new()?);
    let written = run(&client, &config).await?;

    info!(
        rates = %written.rates.display(),
        city_dates = %written.city_dates.display(),
        tear_gas = %written.tear_gas.display(),
        "Reports written"
    );
    Ok(())
}
