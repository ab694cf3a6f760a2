//! City population reference data.

use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::key::CityStateKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationRecord {
    pub population: u64,
    pub metro_population: Option<u64>,
}

pub type PopulationTable = HashMap<CityStateKey, PopulationRecord>;

/// Loads `state,city,population[,metro_population]` rows from `path`.
///
/// The first row is always treated as a header. Later rows for the same
/// key replace earlier ones.
pub fn load_population(path: &Path, require_metro: bool) -> Result<PopulationTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open population CSV: {}", path.display()))?;
    let table = read_population(file, require_metro)
        .with_context(|| format!("Failed to load population CSV: {}", path.display()))?;

    info!(path = %path.display(), cities = table.len(), "Population data loaded");
    Ok(table)
}

/// Reader-based core of [`load_population`].
///
/// # Errors
///
/// Any row with fewer than three columns, a non-integer population, or
/// (when `require_metro` is set) a missing or non-integer metro column.
pub fn read_population<R: Read>(reader: R, require_metro: bool) -> Result<PopulationTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut table = PopulationTable::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() < 3 {
            bail!("line {line}: expected at least 3 columns, found {}", record.len());
        }

        let population = parse_count(&record[2])
            .with_context(|| format!("line {line}: invalid population {:?}", &record[2]))?;

        let metro_population = match record.get(3) {
            Some(raw) if !raw.trim().is_empty() => Some(
                parse_count(raw)
                    .with_context(|| format!("line {line}: invalid metro population {raw:?}"))?,
            ),
            _ if require_metro => bail!("line {line}: missing metro population"),
            _ => None,
        };

        table.insert(
            CityStateKey::new(&record[0], &record[1]),
            PopulationRecord {
                population,
                metro_population,
            },
        );
    }

    Ok(table)
}

fn parse_count(raw: &str) -> Result<u64> {
    Ok(raw.trim().parse::<u64>()?)
}
