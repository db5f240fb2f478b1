use std::collections::{btree_map::Entry, BTreeMap};
use tracing::debug;

use crate::model::{CountyRecord, LimitsDocument, StateEntry};
use crate::states;

/// Output key for a county label: drop one trailing `" County"` or `" COUNTY"`, then trim.
pub fn county_key(county: &str) -> String {
    county
        .strip_suffix(" County")
        .or_else(|| county.strip_suffix(" COUNTY"))
        .unwrap_or(county)
        .trim()
        .to_string()
}

/// Group records by state code and keep only counties whose limit differs
/// from `baseline`. States without overrides are still present with an
/// empty county map.
pub fn build_document(records: &[CountyRecord], baseline: i64, year: i32) -> LimitsDocument {
    let mut by_code: BTreeMap<&str, Vec<&CountyRecord>> = BTreeMap::new();
    for r in records {
        by_code.entry(r.state.as_str()).or_default().push(r);
    }

    let mut states: BTreeMap<String, StateEntry> = BTreeMap::new();
    for (code, rows) in by_code {
        let entry = states
            .entry(states::display_name(code).to_string())
            .or_insert_with(|| StateEntry {
                baseline,
                counties: BTreeMap::new(),
            });

        for r in rows {
            if r.one_unit == baseline {
                continue;
            }
            match entry.counties.entry(county_key(&r.county)) {
                Entry::Vacant(v) => {
                    v.insert(r.one_unit);
                }
                Entry::Occupied(mut o) => {
                    debug!(state = code, county = %o.key(), "duplicate county, keeping last");
                    o.insert(r.one_unit);
                }
            }
        }
    }

    LimitsDocument {
        year,
        baseline,
        states,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(county: &str, state: &str, one_unit: i64) -> CountyRecord {
        CountyRecord {
            county: county.into(),
            state: state.into(),
            one_unit,
        }
    }

    #[test]
    fn county_suffix_is_case_sensitive() {
        assert_eq!(county_key("Los Angeles County"), "Los Angeles");
        assert_eq!(county_key("ANCHORAGE COUNTY"), "ANCHORAGE");
        assert_eq!(county_key("Adams county"), "Adams county");
        assert_eq!(county_key("Anchorage Municipality"), "Anchorage Municipality");
        assert_eq!(county_key("County Line County"), "County Line");
    }

    #[test]
    fn only_non_baseline_counties_are_kept() {
        let records = vec![
            rec("Los Angeles County", "CA", 1209750),
            rec("Fresno County", "CA", 832750),
            rec("Autauga County", "AL", 832750),
            rec("Honolulu County", "HI", 1249125),
        ];
        let doc = build_document(&records, 832750, 2026);

        assert_eq!(doc.baseline, 832750);
        let names: Vec<&str> = doc.states.keys().map(String::as_str).collect();
        assert_eq!(names, ["Alabama", "California", "Hawaii"]);

        let ca = &doc.states["California"];
        assert_eq!(ca.baseline, 832750);
        assert_eq!(ca.counties.len(), 1);
        assert_eq!(ca.counties["Los Angeles"], 1209750);
        assert!(doc.states["Alabama"].counties.is_empty());

        for entry in doc.states.values() {
            assert!(entry.counties.values().all(|&v| v != entry.baseline));
        }
    }

    #[test]
    fn unknown_codes_pass_through() {
        let doc = build_document(&[rec("Somewhere", "ZZ", 900000)], 832750, 2026);
        assert_eq!(doc.states["ZZ"].counties["Somewhere"], 900000);
    }

    #[test]
    fn unknown_codes_sort_among_full_names() {
        let records = vec![
            rec("Teton County", "WY", 832750),
            rec("Somewhere", "ZZ", 900000),
            rec("Elsewhere", "AA", 832750),
            rec("O'Brien County", "IA", 900000),
        ];
        let doc = build_document(&records, 832750, 2026);
        let names: Vec<&str> = doc.states.keys().map(String::as_str).collect();
        assert_eq!(names, ["AA", "Iowa", "Wyoming", "ZZ"]);
    }

    #[test]
    fn baseline_duplicate_does_not_remove_override() {
        let records = vec![
            rec("Kings County", "NY", 1209750),
            rec("Kings", "NY", 832750),
        ];
        let doc = build_document(&records, 832750, 2026);
        assert_eq!(doc.states["New York"].counties["Kings"], 1209750);
    }
}
