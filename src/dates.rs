//! Per-date incident histograms.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::incidents::Incident;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityDateCount {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Num Incidents")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TearGasDay {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Num Incidents With Tear Gas")]
    pub count: usize,
}

/// Consecutive calendar days from `start` through `end`, inclusive.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }
}

pub fn date_range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange {
        next: Some(start),
        end,
    }
}

/// Counts incidents per literal date string for one city (case-insensitive),
/// ascending by date string.
pub fn count_city_by_date(incidents: &[Incident], city: &str) -> Vec<CityDateCount> {
    let city = city.to_lowercase();
    let mut by_date: BTreeMap<&str, usize> = BTreeMap::new();

    for incident in incidents {
        if incident.city.to_lowercase() == city {
            *by_date.entry(incident.date.as_str()).or_default() += 1;
        }
    }

    by_date
        .into_iter()
        .map(|(date, count)| CityDateCount {
            date: date.to_string(),
            count,
        })
        .collect()
}

/// Builds a dense per-day series of incidents carrying `tag`, one row for
/// every day from `since` through `until`.
///
/// Incidents with an empty date or a date outside the range are ignored.
///
/// # Errors
///
/// A non-empty date that is not `YYYY-MM-DD`.
pub fn count_tag_by_date(
    incidents: &[Incident],
    tag: &str,
    since: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<TearGasDay>> {
    let mut days: BTreeMap<NaiveDate, usize> = date_range(since, until).map(|d| (d, 0)).collect();

    for incident in incidents {
        if incident.date.is_empty() {
            continue;
        }
        let date = NaiveDate::parse_from_str(&incident.date, DATE_FORMAT).with_context(|| {
            format!("Incident {:?} has invalid date {:?}", incident.id, incident.date)
        })?;

        if let Some(count) = days.get_mut(&date) {
            if incident.has_tag(tag) {
                *count += 1;
            }
        }
    }

    let with_tag = days.values().filter(|&&n| n > 0).count();
    info!(tag, with_tag, without_tag = days.len() - with_tag, "Tag series built");

    Ok(days
        .into_iter()
        .map(|(date, count)| TearGasDay { date, count })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn incident(city: &str, date: &str, tags: &[&str]) -> Incident {
        Incident {
            id: None,
            city: city.to_string(),
            state: "Oregon".to_string(),
            date: date.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            geolocation: None,
        }
    }

    #[test]
    fn test_date_range_is_dense_and_inclusive() {
        let days: Vec<_> = date_range(ymd(2020, 5, 28), ymd(2020, 5, 30)).collect();
        assert_eq!(days, vec![ymd(2020, 5, 28), ymd(2020, 5, 29), ymd(2020, 5, 30)]);
    }

    #[test]
    fn test_date_range_crosses_month() {
        let days: Vec<_> = date_range(ymd(2020, 5, 30), ymd(2020, 6, 2)).collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days[2], ymd(2020, 6, 1));
    }

    #[test]
    fn test_date_range_empty_when_end_before_start() {
        assert_eq!(date_range(ymd(2020, 5, 28), ymd(2020, 5, 27)).count(), 0);
    }

    #[test]
    fn test_portland_histograms() {
        let incidents = vec![
            incident("Portland", "2020-05-28", &["tear-gas"]),
            incident("Portland", "2020-05-29", &[]),
        ];

        let by_city = count_city_by_date(&incidents, "Portland");
        assert_eq!(
            by_city,
            vec![
                CityDateCount {
                    date: "2020-05-28".to_string(),
                    count: 1
                },
                CityDateCount {
                    date: "2020-05-29".to_string(),
                    count: 1
                },
            ]
        );

        let series =
            count_tag_by_date(&incidents, "tear-gas", ymd(2020, 5, 28), ymd(2020, 5, 29)).unwrap();
        assert_eq!(
            series,
            vec![
                TearGasDay {
                    date: ymd(2020, 5, 28),
                    count: 1
                },
                TearGasDay {
                    date: ymd(2020, 5, 29),
                    count: 0
                },
            ]
        );
    }

    #[test]
    fn test_city_match_is_case_insensitive() {
        let incidents = vec![
            incident("PORTLAND", "2020-06-01", &[]),
            incident("portland", "2020-06-01", &[]),
            incident("Portland Heights", "2020-06-01", &[]),
        ];

        let by_city = count_city_by_date(&incidents, "Portland");
        assert_eq!(by_city.len(), 1);
        assert_eq!(by_city[0].count, 2);
    }

    #[test]
    fn test_city_dates_sorted_including_empty_date() {
        let incidents = vec![
            incident("Portland", "2020-06-02", &[]),
            incident("Portland", "", &[]),
            incident("Portland", "2020-05-31", &[]),
        ];

        let dates: Vec<_> = count_city_by_date(&incidents, "portland")
            .into_iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec!["", "2020-05-31", "2020-06-02"]);
    }

    #[test]
    fn test_tag_series_skips_empty_and_out_of_range() {
        let incidents = vec![
            incident("Portland", "", &["tear-gas"]),
            incident("Portland", "2020-05-01", &["tear-gas"]),
            incident("Portland", "2020-07-01", &["tear-gas"]),
            incident("Seattle", "2020-05-29", &["tear-gas", "pepper-spray"]),
        ];

        let series =
            count_tag_by_date(&incidents, "tear-gas", ymd(2020, 5, 28), ymd(2020, 5, 30)).unwrap();
        let counts: Vec<_> = series.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![0, 1, 0]);
    }

    #[test]
    fn test_tag_series_rejects_malformed_date() {
        let incidents = vec![incident("Portland", "May 28", &["tear-gas"])];
        assert!(count_tag_by_date(&incidents, "tear-gas", ymd(2020, 5, 28), ymd(2020, 5, 30)).is_err());
    }
}
