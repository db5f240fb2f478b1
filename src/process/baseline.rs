use std::collections::BTreeMap;

use crate::error::{LimitsError, Result};
use crate::model::CountyRecord;

/// Most frequent single-unit limit. Ties resolve to the smallest value.
pub fn baseline_limit(records: &[CountyRecord]) -> Result<i64> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.one_unit).or_default() += 1;
    }

    let mut best: Option<(i64, usize)> = None;
    // ascending keys, so only a strictly larger count replaces the current pick
    for (value, count) in counts {
        match best {
            Some((_, n)) if n >= count => {}
            _ => best = Some((value, count)),
        }
    }

    best.map(|(value, _)| value)
        .ok_or(LimitsError::NoValidRecords)
}
