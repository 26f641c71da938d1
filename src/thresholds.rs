//! Concentration → severity description tables.
//!
//! A [`ThresholdTable`] is an ascending list of `(bound, description)`
//! pairs.  Lookup is a *ceiling* search: the description bound to the
//! smallest key that is `>=` the queried value wins.  A value above the
//! largest key has no description at all; the last entry is **not**
//! reused as a catch-all.
//!
//! ```text
//!   bound:   400      1000      2000      5000      40000
//!   value: ──]────────]─────────]─────────]─────────]──── (none)
//!          ≤400   401..1000  1001..2000   ...   5001..40000  >40000
//! ```

use core::fmt;

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

/// Maximum entries per table (stack-allocated).
pub const MAX_THRESHOLDS: usize = 8;
/// Maximum description length in bytes.
pub const MAX_DESCRIPTION_LEN: usize = 128;

/// Fixed-capacity description string.
pub type Description = String<MAX_DESCRIPTION_LEN>;

/// One row of a threshold table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    /// Upper bound (inclusive) this description applies to.
    pub bound: i32,
    pub description: Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdError {
    /// More than [`MAX_THRESHOLDS`] entries.
    TooManyEntries,
    /// A description exceeds [`MAX_DESCRIPTION_LEN`].
    DescriptionTooLong,
    /// Keys are duplicated or not ascending.
    NotStrictlyIncreasing,
}

impl fmt::Display for ThresholdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyEntries => write!(f, "too many threshold entries"),
            Self::DescriptionTooLong => write!(f, "threshold description too long"),
            Self::NotStrictlyIncreasing => write!(f, "threshold keys must be strictly increasing"),
        }
    }
}

/// Ordered, validated threshold table.
///
/// Deserialization goes through [`TryFrom`] so a persisted table can never
/// violate the ordering invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Threshold, MAX_THRESHOLDS>", into = "Vec<Threshold, MAX_THRESHOLDS>")]
pub struct ThresholdTable {
    entries: Vec<Threshold, MAX_THRESHOLDS>,
}

impl ThresholdTable {
    /// Build a table from `(bound, description)` pairs.
    pub fn new(entries: &[(i32, &str)]) -> Result<Self, ThresholdError> {
        let mut rows: Vec<Threshold, MAX_THRESHOLDS> = Vec::new();
        for &(bound, text) in entries {
            let description =
                Description::try_from(text).map_err(|_| ThresholdError::DescriptionTooLong)?;
            rows.push(Threshold { bound, description })
                .map_err(|_| ThresholdError::TooManyEntries)?;
        }
        Self::try_from(rows)
    }

    /// Ceiling lookup: description of the smallest bound `>= value`.
    pub fn lookup(&self, value: i32) -> Option<&str> {
        let idx = self.entries.partition_point(|t| t.bound < value);
        self.entries.get(idx).map(|t| t.description.as_str())
    }

    pub fn entries(&self) -> &[Threshold] {
        &self.entries
    }

    /// Default CO2 interpretation table (ppm).
    pub fn co2_default() -> Self {
        Self::from_builtin(&[
            (400, "Normal background concentration in outdoor ambient air"),
            (
                1000,
                "Concentrations typical of occupied indoor spaces with good air exchange",
            ),
            (2000, "Complaints of drowsiness and poor air"),
            (5000, "Headaches, sleepiness and stagnant, stale, stuffy air"),
            (
                40000,
                "Exposure may lead to serious oxygen deprivation resulting in permanent brain damage, coma, even death",
            ),
        ])
    }

    /// Default CO interpretation table (ppm).
    pub fn co_default() -> Self {
        Self::from_builtin(&[
            (9, "CO Max prolonged exposure (ASHRAE standard)"),
            (35, "CO Max exposure for 8 hour work day (OSHA)"),
            (800, "CO Death within 2 to 3 hours"),
            (12000, "CO Death within 1 to 3 minutes"),
        ])
    }

    /// Built-in tables are known-good; an error here is a programming bug.
    /// Panics in debug builds, returns an empty table in release.
    fn from_builtin(entries: &[(i32, &str)]) -> Self {
        match Self::new(entries) {
            Ok(table) => table,
            Err(e) => {
                debug_assert!(false, "invalid built-in threshold table: {e}");
                Self::default()
            }
        }
    }
}

impl TryFrom<Vec<Threshold, MAX_THRESHOLDS>> for ThresholdTable {
    type Error = ThresholdError;

    fn try_from(entries: Vec<Threshold, MAX_THRESHOLDS>) -> Result<Self, Self::Error> {
        if entries.windows(2).any(|w| w[0].bound >= w[1].bound) {
            return Err(ThresholdError::NotStrictlyIncreasing);
        }
        Ok(Self { entries })
    }
}

impl From<ThresholdTable> for Vec<Threshold, MAX_THRESHOLDS> {
    fn from(table: ThresholdTable) -> Self {
        table.entries
    }
}

/// The pair of tables the snapshot formatter annotates readings with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub co2: ThresholdTable,
    pub co: ThresholdTable,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            co2: ThresholdTable::co2_default(),
            co: ThresholdTable::co_default(),
        }
    }
}
