// src/process/mod.rs
use tracing::info;

use crate::error::Result;
use crate::model::{CountyRecord, LimitsDocument};

pub mod baseline;
pub mod group;
pub mod normalize;

pub use baseline::baseline_limit;
pub use group::{build_document, county_key};
pub use normalize::{normalize_all, normalize_record};

/// Baseline plus per-state grouping over already-normalized records.
pub fn transform(records: &[CountyRecord], year: i32) -> Result<LimitsDocument> {
    let baseline = baseline_limit(records)?;
    info!(baseline, records = records.len(), "computed baseline");
    let doc = build_document(records, baseline, year);
    info!(
        states = doc.states.len(),
        overrides = doc.override_count(),
        "grouped counties"
    );
    Ok(doc)
}
