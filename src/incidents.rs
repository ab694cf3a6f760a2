//! Incident records as served by the API, plus ingestion-time normalization.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{NON_PROTEST_TAG, canonical_city};
use crate::key::CityStateKey;

/// A single incident record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Incident {
    #[serde(default)]
    pub id: Option<String>,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub geolocation: Option<serde_json::Value>,
}

impl Incident {
    pub fn key(&self) -> CityStateKey {
        CityStateKey::new(self.state.as_str(), self.city.as_str())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// A null or empty-string geolocation counts as absent.
    pub fn has_geolocation(&self) -> bool {
        match &self.geolocation {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Vec<Incident>,
}

/// Decodes the `{"data": [...]}` envelope returned by the incident API.
///
/// # Errors
///
/// Returns an error if the body is not JSON or lacks a well-formed `data` array.
pub fn parse_incidents(bytes: &[u8]) -> Result<Vec<Incident>> {
    let envelope: Envelope =
        serde_json::from_slice(bytes).context("Failed to parse incident API response")?;
    Ok(envelope.data)
}

/// Applies city aliases and, when `exclude_non_protest` is set, drops
/// non-protest records.
pub fn normalize(incidents: Vec<Incident>, exclude_non_protest: bool) -> Vec<Incident> {
    let total = incidents.len();
    let mut geolocated = 0usize;

    let kept: Vec<Incident> = incidents
        .into_iter()
        .filter_map(|mut incident| {
            if let Some(canonical) = canonical_city(&incident.city) {
                incident.city = canonical.to_string();
            }

            if exclude_non_protest && incident.has_tag(NON_PROTEST_TAG) {
                debug!(id = ?incident.id, "Skipping non-protest incident");
                return None;
            }

            if incident.has_geolocation() {
                geolocated += 1;
            }
            Some(incident)
        })
        .collect();

    info!(total, kept = kept.len(), geolocated, "Incidents normalized");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(city: &str, tags: &[&str]) -> Incident {
        Incident {
            id: Some(format!("test-{}", city.to_lowercase())),
            city: city.to_string(),
            state: "California".to_string(),
            date: "2020-05-30".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            geolocation: None,
        }
    }

    #[test]
    fn test_parse_envelope() {
        let body = br#"{"edit_at": "x", "data": [
            {"id": "or-portland-1", "city": "Portland", "state": "Oregon",
             "date": "2020-05-28", "tags": ["tear-gas"], "geolocation": "45.5, -122.6"},
            {"city": "Austin", "state": "Texas"}
        ]}"#;

        let incidents = parse_incidents(body).unwrap();
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].id.as_deref(), Some("or-portland-1"));
        assert!(incidents[0].has_tag("tear-gas"));
        assert!(incidents[0].has_geolocation());
        assert_eq!(incidents[1].date, "");
        assert!(incidents[1].tags.is_empty());
        assert!(!incidents[1].has_geolocation());
    }

    #[test]
    fn test_parse_missing_data_fails() {
        assert!(parse_incidents(br#"{"records": []}"#).is_err());
        assert!(parse_incidents(b"not json").is_err());
    }

    #[test]
    fn test_normalize_aliases() {
        let out = normalize(
            vec![incident("Compton", &[]), incident("Hollywood", &[]), incident("Oakland", &[])],
            true,
        );
        let cities: Vec<_> = out.iter().map(|i| i.city.as_str()).collect();
        assert_eq!(cities, vec!["Los Angeles", "Los Angeles", "Oakland"]);
        assert_eq!(out[0].key(), incident("Los Angeles", &[]).key());
    }

    #[test]
    fn test_normalize_non_protest_filter() {
        let input = vec![incident("Oakland", &["non-protest"]), incident("Oakland", &["arrest"])];

        assert_eq!(normalize(input.clone(), true).len(), 1);
        assert_eq!(normalize(input, false).len(), 2);
    }
}
