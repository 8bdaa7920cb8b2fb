use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use roster_balance::buckets::partition;
use roster_balance::roster::{Sex, parse_roster_csv};

/// Validates a local sign-up CSV and shows the per-team slot counts it would produce.
fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/roster.csv"));
    let no_teams = args
        .iter()
        .find_map(|a| a.strip_prefix("--teams="))
        .map(|raw| raw.trim().parse::<usize>())
        .transpose()
        .context("--teams must be an integer")?
        .unwrap_or(4);

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let roster = parse_roster_csv(&raw).context("roster is malformed")?;
    let males = roster.count(Sex::Male);
    let females = roster.count(Sex::Female);

    println!("Roster: {}", path.display());
    println!("Players: {} ({} M / {} F)", roster.len(), males, females);
    if let Some(captain) = roster.captain() {
        println!("Captain: {} ({})", captain.display_name(), captain.sex.code());
    }

    let buckets = partition(males, females, no_teams)?;
    println!();
    println!("Team | M | F");
    for team in 0..no_teams {
        println!(
            "{:<4} | {} | {}",
            team + 1,
            buckets.team_count(Sex::Male, team),
            buckets.team_count(Sex::Female, team)
        );
    }
    Ok(())
}
