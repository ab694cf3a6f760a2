use std::collections::BTreeMap;

use crate::incidents::Incident;
use crate::key::CityStateKey;

/// Incident counts per city, ordered by key so downstream output is stable.
pub type Counts = BTreeMap<CityStateKey, usize>;

/// Counts incidents per (state, city). Input order does not matter.
pub fn count_by_city<'a, I>(incidents: I) -> Counts
where
    I: IntoIterator<Item = &'a Incident>,
{
    let mut counts = Counts::new();
    for incident in incidents {
        *counts.entry(incident.key()).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incidents::normalize;

    fn incident(state: &str, city: &str) -> Incident {
        Incident {
            id: None,
            city: city.to_string(),
            state: state.to_string(),
            date: String::new(),
            tags: vec![],
            geolocation: None,
        }
    }

    #[test]
    fn test_counts_each_incident_once() {
        let incidents = vec![
            incident("Oregon", "Portland"),
            incident("Oregon", "Portland"),
            incident("Maine", "Portland"),
        ];

        let counts = count_by_city(&incidents);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&CityStateKey::new("Oregon", "Portland")], 2);
        assert_eq!(counts[&CityStateKey::new("Maine", "Portland")], 1);
    }

    #[test]
    fn test_order_independent() {
        let incidents = vec![
            incident("Oregon", "Portland"),
            incident("Texas", "Austin"),
            incident("Oregon", "Portland"),
            incident("New York", "New York City"),
            incident("Texas", "Austin"),
        ];

        let forward = count_by_city(&incidents);
        let reversed = count_by_city(incidents.iter().rev());
        let mut rotated = incidents.clone();
        rotated.rotate_left(2);

        assert_eq!(forward, reversed);
        assert_eq!(forward, count_by_city(&rotated));
    }

    #[test]
    fn test_aliases_merge_into_canonical_city() {
        let incidents = normalize(
            vec![
                incident("California", "Compton"),
                incident("California", "Los Angeles"),
            ],
            true,
        );

        let counts = count_by_city(&incidents);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&CityStateKey::new("California", "Los Angeles")], 2);
    }
}
