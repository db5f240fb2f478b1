// src/bin/verify_output.rs
//
// Re-reads a generated data file and checks it still holds the output rules.

use anyhow::{Context, Result};
use std::fs;
use tracing_subscriber::{fmt, EnvFilter};

use loanlimits::{reader, report::format_usd, Config};

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::default();
    let path = &config.output_path;
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    let doc = reader::parse_document(&text)
        .with_context(|| format!("Failed to parse '{}'", path.display()))?;
    tracing::info!(states = doc.states.len(), "parsed data file");

    let mut problems = Vec::new();
    for (name, entry) in &doc.states {
        if entry.baseline != doc.baseline {
            problems.push(format!(
                "{}: state baseline {} differs from national {}",
                name, entry.baseline, doc.baseline
            ));
        }
        for (county, limit) in &entry.counties {
            if *limit == entry.baseline {
                problems.push(format!("{}/{}: listed at baseline", name, county));
            }
        }
    }

    println!("\n{: <30} {:>15}", "Field", "Value");
    println!("{:-<46}", "");
    println!("{: <30} {:>15}", "year", doc.year);
    println!("{: <30} {:>15}", "baseline", format_usd(doc.baseline));
    println!("{: <30} {:>15}", "states", doc.states.len());
    println!("{: <30} {:>15}", "county overrides", doc.override_count());

    if let Some((state, county, limit)) = doc
        .states
        .iter()
        .flat_map(|(s, e)| e.counties.iter().map(move |(c, l)| (s, c, *l)))
        .max_by_key(|(_, _, l)| *l)
    {
        println!("{: <30} {:>15}", "highest", format_usd(limit));
        println!("{: <30} {:>15}", "", format!("{}, {}", county, state));
    }

    if !problems.is_empty() {
        for p in &problems {
            tracing::error!("{}", p);
        }
        return Err(anyhow::anyhow!(
            "{} problem(s) found in '{}'",
            problems.len(),
            path.display()
        ));
    }

    println!("\n✔ {} is consistent", path.display());
    Ok(())
}
