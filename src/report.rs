// src/report.rs

use std::fmt;

use crate::model::{CountyRecord, LimitsDocument};

const TOP_N: usize = 10;

/// One of the highest-limit input rows, labelled as read (suffix not stripped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopCounty {
    pub county: String,
    pub state: String,
    pub limit: i64,
}

/// Console summary for a run. Never feeds back into the written file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub year: i32,
    pub output_path: String,
    pub baseline: i64,
    pub valid_records: usize,
    pub dropped_rows: usize,
    pub distinct_states: usize,
    pub states_in_output: usize,
    pub override_count: usize,
    pub top: Vec<TopCounty>,
}

impl Summary {
    pub fn new(
        records: &[CountyRecord],
        dropped_rows: usize,
        doc: &LimitsDocument,
        output_path: impl Into<String>,
    ) -> Self {
        let mut codes: Vec<&str> = records.iter().map(|r| r.state.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();

        let mut above: Vec<&CountyRecord> =
            records.iter().filter(|r| r.one_unit > doc.baseline).collect();
        // stable, so equal limits keep input order
        above.sort_by(|a, b| b.one_unit.cmp(&a.one_unit));
        let top = above
            .into_iter()
            .take(TOP_N)
            .map(|r| TopCounty {
                county: r.county.clone(),
                state: r.state.clone(),
                limit: r.one_unit,
            })
            .collect();

        Self {
            year: doc.year,
            output_path: output_path.into(),
            baseline: doc.baseline,
            valid_records: records.len(),
            dropped_rows,
            distinct_states: codes.len(),
            states_in_output: doc.states.len(),
            override_count: doc.override_count(),
            top,
        }
    }
}

/// `$1,249,125`
pub fn format_usd(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Baseline conforming limit for {}: {}",
            self.year,
            format_usd(self.baseline)
        )?;
        writeln!(f, "Total counties: {}", self.valid_records)?;
        writeln!(f, "Total states: {}", self.distinct_states)?;
        if self.dropped_rows > 0 {
            writeln!(f, "Dropped rows: {}", self.dropped_rows)?;
        }
        writeln!(f)?;
        writeln!(f, "✅ Successfully generated {}", self.output_path)?;
        writeln!(f, "   Baseline limit: {}", format_usd(self.baseline))?;
        writeln!(f, "   States included: {}", self.states_in_output)?;
        writeln!(f, "   High-cost counties: {}", self.override_count)?;
        writeln!(f)?;
        writeln!(f, "📊 Top {} highest loan limits:", TOP_N)?;
        for t in &self.top {
            writeln!(f, "   {}, {}: {}", t.county, t.state, format_usd(t.limit))?;
        }
        Ok(())
    }
}
