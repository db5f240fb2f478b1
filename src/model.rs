// src/model.rs

use std::collections::BTreeMap;

/// A retained input row after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountyRecord {
    /// Trimmed, title-cased county label (suffix still attached).
    pub county: String,
    /// Trimmed, upper-cased two-letter code.
    pub state: String,
    /// Single-unit limit.
    pub one_unit: i64,
}

/// Per-state block of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    /// Always the global baseline.
    pub baseline: i64,
    /// Normalized county name → limit, only where the limit differs from `baseline`.
    pub counties: BTreeMap<String, i64>,
}

/// The whole generated data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitsDocument {
    pub year: i32,
    pub baseline: i64,
    /// Display name (or raw code when unmapped) → entry.
    pub states: BTreeMap<String, StateEntry>,
}

impl LimitsDocument {
    /// Total number of county overrides across all states.
    pub fn override_count(&self) -> usize {
        self.states.values().map(|s| s.counties.len()).sum()
    }
}
