//! Composite (state, city) key used to join incident counts with population data.

use anyhow::{Result, anyhow};
use std::fmt;

/// Separator used by the delimited text form of a key.
pub const DELIMITER: &str = "||--||";

/// Marker that excludes a key from rate reports.
const UNKNOWN_MARKER: &str = "Unknown";

/// An immutable state/city pair. Ordered by state, then city.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CityStateKey {
    state: String,
    city: String,
}

impl CityStateKey {
    pub fn new(state: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            city: city.into(),
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Splits the key back into `(state, city)`.
    pub fn into_parts(self) -> (String, String) {
        (self.state, self.city)
    }

    /// True when either component mentions "Unknown".
    pub fn is_unknown(&self) -> bool {
        self.state.contains(UNKNOWN_MARKER) || self.city.contains(UNKNOWN_MARKER)
    }

    /// Renders the key as `state||--||city`.
    pub fn to_delimited(&self) -> String {
        format!("{}{}{}", self.state, DELIMITER, self.city)
    }

    /// Parses the `state||--||city` form produced by [`CityStateKey::to_delimited`].
    ///
    /// # Errors
    ///
    /// Returns an error if the delimiter is missing.
    pub fn from_delimited(s: &str) -> Result<Self> {
        let (state, city) = s
            .split_once(DELIMITER)
            .ok_or_else(|| anyhow!("Composite key {:?} is missing delimiter {:?}", s, DELIMITER))?;
        Ok(Self::new(state, city))
    }
}

impl fmt::Display for CityStateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}
