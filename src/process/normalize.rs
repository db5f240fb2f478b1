use crate::ingest::RawRecord;
use crate::model::CountyRecord;

/// Upper-case a letter that follows a non-letter, lower-case every other letter.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

/// Coerce a limit cell to an integer. Blank, unparseable and non-finite
/// values are missing; fractional values truncate toward zero.
pub fn coerce_limit(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let v: f64 = s.parse().ok()?;
    if v.is_finite() {
        Some(v.trunc() as i64)
    } else {
        None
    }
}

/// Clean one row, or `None` when county, state or limit is missing.
pub fn normalize_record(raw: &RawRecord) -> Option<CountyRecord> {
    let county = title_case(raw.county.trim());
    let state = raw.state.trim().to_uppercase();
    let one_unit = coerce_limit(&raw.one_unit)?;
    if county.is_empty() || state.is_empty() {
        return None;
    }
    Some(CountyRecord {
        county,
        state,
        one_unit,
    })
}

/// Normalize every row, returning the retained records and the dropped count.
pub fn normalize_all(raw: &[RawRecord]) -> (Vec<CountyRecord>, usize) {
    let records: Vec<CountyRecord> = raw.iter().filter_map(normalize_record).collect();
    let dropped = raw.len() - records.len();
    (records, dropped)
}
