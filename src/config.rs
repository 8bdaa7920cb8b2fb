use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::report::DEFAULT_SUGGESTIONS;
use crate::roster_fetch::{DEFAULT_SERVICE_ACCOUNT_FILE, DEFAULT_WORKSHEET, RosterSource};
use crate::search::{DEFAULT_MAX_TRIES, DEFAULT_PARALLELISM, SearchConfig};

const MAX_PARALLELISM: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source: RosterSource,
    pub search: SearchConfig,
    pub suggestions: usize,
    pub json: bool,
}

impl Settings {
    pub fn from_env_and_args() -> Result<Self> {
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::resolve(&args, |key| std::env::var(key).ok())
    }

    /// Command-line values win over environment values.
    pub fn resolve(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |flag: &str, key: &str| {
            arg_value(args, flag).or_else(|| env(key).filter(|v| !v.trim().is_empty()))
        };

        let source = if let Some(url) = lookup("--url", "ROSTER_URL") {
            RosterSource::CsvUrl(url.trim().to_string())
        } else if let Some(document_id) = lookup("--sheet-id", "ROSTER_SHEET_ID") {
            RosterSource::Spreadsheet {
                document_id: document_id.trim().to_string(),
                worksheet: lookup("--worksheet", "ROSTER_WORKSHEET")
                    .unwrap_or_else(|| DEFAULT_WORKSHEET.to_string()),
                service_account: PathBuf::from(
                    lookup("--service-account", "SERVICE_ACCOUNT_FILE")
                        .unwrap_or_else(|| DEFAULT_SERVICE_ACCOUNT_FILE.to_string()),
                ),
            }
        } else {
            return Err(anyhow!(
                "no roster source: pass --url or --sheet-id (or set ROSTER_URL / ROSTER_SHEET_ID)"
            ));
        };

        let no_teams = lookup("--teams", "TEAM_COUNT")
            .context("team count missing: pass --teams or set TEAM_COUNT")
            .and_then(|raw| parse_count("team count", &raw))?;
        let max_tries = lookup("--tries", "MAX_TRIES")
            .map(|raw| parse_count("max tries", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_TRIES);
        let parallelism = lookup("--jobs", "SEARCH_PARALLELISM")
            .map(|raw| parse_count("parallelism", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_PARALLELISM)
            .clamp(1, MAX_PARALLELISM);
        let suggestions = lookup("--suggestions", "SUGGESTIONS")
            .map(|raw| parse_count("suggestions", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_SUGGESTIONS);

        Ok(Self {
            source,
            search: SearchConfig {
                max_tries,
                parallelism,
                ..SearchConfig::new(no_teams)
            },
            suggestions,
            json: args.iter().any(|a| a == "--json"),
        })
    }
}

/// Supports both `--flag=value` and `--flag value`.
fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn parse_count(what: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .with_context(|| format!("{what} must be a non-negative integer, got {raw:?}"))
}
