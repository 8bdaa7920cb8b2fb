use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use roster_balance::config::Settings;
use roster_balance::matrix::PlayerMatrix;
use roster_balance::report;
use roster_balance::roster_fetch::fetch_roster;
use roster_balance::search::compute_assignments;

fn main() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("roster_balance=info,warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let settings = Settings::from_env_and_args()?;
    let roster = fetch_roster(&settings.source)?;
    let matrix = PlayerMatrix::from_roster(&roster).context("building player matrix")?;
    let ranked = compute_assignments(&matrix, &settings.search).map_err(|err| {
        let stage = err.stage().label();
        anyhow::Error::new(err).context(format!("assignment search failed in {stage} stage"))
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if settings.json {
        let json = report::render_json(&roster, &ranked, settings.suggestions)
            .context("serialize report")?;
        writeln!(out, "{json}")?;
    } else {
        report::print_best_assignments(&mut out, &roster, &ranked, settings.suggestions)?;
    }
    out.flush()?;
    Ok(())
}
