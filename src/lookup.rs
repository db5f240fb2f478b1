// src/lookup.rs
//
// Read-side queries over a generated document, matching how the client
// resolves a limit: county override, then state baseline, then national baseline.

use std::fmt;

use crate::model::LimitsDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanKind {
    Conforming,
    Jumbo,
}

impl fmt::Display for LoanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanKind::Conforming => write!(f, "Conforming"),
            LoanKind::Jumbo => write!(f, "Jumbo"),
        }
    }
}

/// A principal compared against the applicable limit.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanClassification {
    pub kind: LoanKind,
    pub limit: i64,
    pub principal: i64,
    /// `principal - limit`; negative when under the limit.
    pub difference: i64,
}

impl LoanClassification {
    pub fn is_conforming(&self) -> bool {
        self.kind == LoanKind::Conforming
    }

    pub fn percent_of_limit(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        self.principal as f64 / self.limit as f64 * 100.0
    }
}

impl LimitsDocument {
    /// Limit for a state display name and optional county name.
    pub fn limit_for(&self, state: &str, county: Option<&str>) -> i64 {
        let Some(entry) = self.states.get(state) else {
            return self.baseline;
        };
        county
            .and_then(|c| entry.counties.get(c).copied())
            .unwrap_or(entry.baseline)
    }

    /// Conforming when `principal` is at or below the applicable limit.
    pub fn classify(&self, principal: i64, state: &str, county: Option<&str>) -> LoanClassification {
        let limit = self.limit_for(state, county);
        let kind = if principal <= limit {
            LoanKind::Conforming
        } else {
            LoanKind::Jumbo
        };
        LoanClassification {
            kind,
            limit,
            principal,
            difference: principal - limit,
        }
    }

    pub fn state_names(&self) -> Vec<&str> {
        self.states.keys().map(String::as_str).collect()
    }

    /// Sorted override county names for `state`; empty when unknown.
    pub fn counties(&self, state: &str) -> Vec<&str> {
        self.states
            .get(state)
            .map(|e| e.counties.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
