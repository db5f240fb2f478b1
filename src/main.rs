use anyhow::Result;
use loanlimits::{pipeline, Config};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr) // stdout carries the report
        .init();
    info!("startup");

    // ─── 2) fixed paths ──────────────────────────────────────────────
    let config = Config::default();
    info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        year = config.year,
        "configured"
    );

    // ─── 3) transform + write ────────────────────────────────────────
    let outcome = pipeline::run(&config)?;

    // ─── 4) report ───────────────────────────────────────────────────
    print!("{}", outcome.summary);

    info!("all done");
    Ok(())
}
