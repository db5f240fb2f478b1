// src/pipeline.rs
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::fs;
use tracing::{info, warn};

use crate::{
    config::Config,
    ingest,
    model::LimitsDocument,
    process,
    render::{self, RenderOptions},
    report::Summary,
};

/// What a run produced, for the caller to print.
#[derive(Debug)]
pub struct RunOutcome {
    pub document: LimitsDocument,
    pub summary: Summary,
}

/// Load, transform, render and write, stamping today's date in the header comment.
pub fn run(config: &Config) -> Result<RunOutcome> {
    run_at(config, Local::now().date_naive())
}

/// As [`run`], with an explicit generation date.
///
/// Nothing is written unless the input loads and yields at least one valid record.
#[tracing::instrument(level = "info", skip(config), fields(input = %config.input_path.display()))]
pub fn run_at(config: &Config, generated: NaiveDate) -> Result<RunOutcome> {
    // ─── 1) load sheet ───────────────────────────────────────────────
    let sheet = ingest::load_records(&config.input_path)
        .with_context(|| format!("loading {}", config.input_path.display()))?;

    // ─── 2) normalize + drop incomplete rows ─────────────────────────
    let (records, dropped) = process::normalize_all(&sheet.records);
    if dropped > 0 {
        warn!(dropped, "rows without county, state or numeric limit were skipped");
    }

    // ─── 3) baseline + grouping ──────────────────────────────────────
    let document = process::transform(&records, config.year)
        .with_context(|| format!("transforming {}", config.input_path.display()))?;

    // ─── 4) render + write ───────────────────────────────────────────
    let source_name = config.input_file_name();
    let text = render::render_document(
        &document,
        &RenderOptions {
            constant_name: &config.constant_name,
            source_name: &source_name,
            generated,
        },
    );

    if let Some(parent) = config.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(&config.output_path, &text)
        .with_context(|| format!("writing {}", config.output_path.display()))?;
    info!(path = %config.output_path.display(), bytes = text.len(), "wrote data file");

    let summary = Summary::new(
        &records,
        dropped,
        &document,
        config.output_path.display().to_string(),
    );
    Ok(RunOutcome { document, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LimitsError;
    use crate::reader::parse_document;
    use std::collections::{BTreeMap, BTreeSet};
    use std::io::Write;
    use std::path::Path;
    use tempfile::{Builder, TempDir};
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,loanlimits=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    const HEADER: &str = "FHFA Conforming Loan Limits,,,,,,,,
FIPS State Code,FIPS County Code,County Name,State,CBSA Number,One-Unit Limit,Two-Unit Limit,Three-Unit Limit,Four-Unit Limit
";

    fn write_csv(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let mut file = Builder::new()
            .suffix(".csv")
            .tempfile_in(dir.path())
            .unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        let (_, path) = file.keep().unwrap();
        path
    }

    fn config_for(dir: &TempDir, input: &Path) -> Config {
        Config {
            input_path: input.to_path_buf(),
            output_path: dir.path().join("js").join("loan-limits-data.js"),
            ..Config::default()
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    const BODY: &str = "\
01,001,Autauga County,AL,33860,832750,1066300,1288800,1601750
01,003,Baldwin County,AL,19300,832750,1066300,1288800,1601750
02,020,ANCHORAGE COUNTY,AK,11260,1249125,1599375,1933200,2402625
06,037,Los Angeles County,CA,31080,1209750,1548975,1872225,2326875
06,019,Fresno County,CA,23420,832750,1066300,1288800,1601750
19,141,O'Brien County,IA,,900000,1000000,1100000,1200000
99,001,Nowhere County,ZZ,,832750,1066300,1288800,1601750
06,999,,CA,,1209750,,,
06,998,Kern County,CA,,n/a,,,
";

    #[test]
    fn generates_file_and_summary() {
        init_test_logging();
        let dir = TempDir::new().unwrap();
        let input = write_csv(&dir, BODY);
        let cfg = config_for(&dir, &input);

        let outcome = run_at(&cfg, date()).unwrap();
        let text = fs::read_to_string(&cfg.output_path).unwrap();

        assert!(text.contains("    baseline: 832750,\n"));
        assert!(text.contains("                'Anchorage': 1249125,\n"));
        assert!(text.contains("                'Los Angeles': 1209750,\n"));
        assert!(text.contains("                'O\\'Brien': 900000,\n"));
        assert!(text.contains("        'ZZ': {\n            baseline: 832750,\n            counties: {}\n"));
        assert!(!text.contains("Fresno"));
        assert!(text.ends_with("    module.exports = LoanLimitsData;\n}\n"));

        let s = &outcome.summary;
        assert_eq!(s.baseline, 832750);
        assert_eq!(s.valid_records, 7);
        assert_eq!(s.dropped_rows, 2);
        assert_eq!(s.distinct_states, 5);
        assert_eq!(s.states_in_output, 5);
        assert_eq!(s.override_count, 3);
        assert_eq!(s.top[0].county, "Anchorage County");
        assert_eq!(s.top[0].state, "AK");
    }

    #[test]
    fn output_round_trips_and_preserves_county_sets() {
        let dir = TempDir::new().unwrap();
        let input = write_csv(&dir, BODY);
        let cfg = config_for(&dir, &input);

        let outcome = run_at(&cfg, date()).unwrap();
        let parsed = parse_document(&fs::read_to_string(&cfg.output_path).unwrap()).unwrap();
        assert_eq!(parsed, outcome.document);

        // implied baseline counties plus listed overrides cover every input county
        let sheet = ingest::load_records(&input).unwrap();
        let (records, _) = process::normalize_all(&sheet.records);
        let mut by_state: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for r in &records {
            by_state
                .entry(crate::states::display_name(&r.state).to_string())
                .or_default()
                .insert(process::county_key(&r.county));
        }
        for (state, entry) in &parsed.states {
            assert!(entry.counties.values().all(|&v| v != entry.baseline));
            let all = &by_state[state];
            let implied: BTreeSet<String> = records
                .iter()
                .filter(|r| crate::states::display_name(&r.state) == state.as_str())
                .filter(|r| r.one_unit == parsed.baseline)
                .map(|r| process::county_key(&r.county))
                .collect();
            let listed: BTreeSet<String> = entry.counties.keys().cloned().collect();
            let union: BTreeSet<String> = implied.union(&listed).cloned().collect();
            assert_eq!(&union, all);
        }
    }

    #[test]
    fn deterministic_across_runs() {
        let dir = TempDir::new().unwrap();
        let input = write_csv(&dir, BODY);
        let cfg = config_for(&dir, &input);

        run_at(&cfg, date()).unwrap();
        let first = fs::read_to_string(&cfg.output_path).unwrap();
        run_at(&cfg, date()).unwrap();
        let second = fs::read_to_string(&cfg.output_path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn no_valid_records_aborts_without_writing() {
        let dir = TempDir::new().unwrap();
        let input = write_csv(&dir, "06,999,,CA,,1209750,,,\n06,998,Kern,CA,,n/a,,,\n");
        let cfg = config_for(&dir, &input);

        let err = run_at(&cfg, date()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LimitsError>(),
            Some(LimitsError::NoValidRecords)
        ));
        assert!(!cfg.output_path.exists());
    }

    #[test]
    fn generates_from_workbook() {
        init_test_logging();
        let dir = TempDir::new().unwrap();
        let mut rows = crate::ingest::xlsx::sheet_header();
        rows.push(vec!["02", "020", "ANCHORAGE COUNTY", "AK", "11260", "1249125", "1599375", "1933200", "2402625"]);
        rows.push(vec!["01", "001", "Autauga County", "AL", "33860", "832750", "1066300", "1288800", "1601750"]);
        rows.push(vec!["01", "003", "Baldwin County", "AL", "19300", "832750", "1066300", "1288800", "1601750"]);
        rows.push(vec!["19", "141", "O'Brien County", "IA", "", "900000", "1000000", "1100000", "1200000"]);
        let workbook = crate::ingest::xlsx::write_test_workbook(&rows).unwrap();
        let cfg = config_for(&dir, workbook.path());

        let outcome = run_at(&cfg, date()).unwrap();
        assert_eq!(outcome.document.baseline, 832750);
        assert_eq!(outcome.summary.valid_records, 4);
        assert_eq!(outcome.document.states["Alaska"].counties["Anchorage"], 1249125);
        assert!(outcome.document.states["Alabama"].counties.is_empty());

        let text = fs::read_to_string(&cfg.output_path).unwrap();
        assert!(text.contains("                'O\\'Brien': 900000,\n"));
        assert_eq!(parse_document(&text).unwrap(), outcome.document);
    }

    #[test]
    fn missing_input_aborts() {
        let dir = TempDir::new().unwrap();
        let cfg = config_for(&dir, &dir.path().join("absent.csv"));
        assert!(run_at(&cfg, date()).is_err());
        assert!(!cfg.output_path.exists());
    }
}
