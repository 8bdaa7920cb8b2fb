use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::http_client::fetch_text;
use crate::roster::{Roster, parse_roster_csv, roster_from_rows};
use crate::sheets::{ServiceAccountKey, read_worksheet};

pub const DEFAULT_WORKSHEET: &str = "Formularantworten 1";
pub const DEFAULT_SERVICE_ACCOUNT_FILE: &str = "service_account.json";

/// Where the sign-up table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    /// Plain CSV download, header row first.
    CsvUrl(String),
    /// Worksheet read through the Sheets API with a service-account key file.
    Spreadsheet {
        document_id: String,
        worksheet: String,
        service_account: PathBuf,
    },
}

pub fn fetch_roster(source: &RosterSource) -> Result<Roster> {
    let roster = match source {
        RosterSource::CsvUrl(url) => {
            info!(%url, "fetching roster csv");
            let body = fetch_text(url, None).context("roster download failed")?;
            parse_roster_csv(&body).context("roster is malformed")?
        }
        RosterSource::Spreadsheet {
            document_id,
            worksheet,
            service_account,
        } => {
            info!(
                document_id = %document_id,
                worksheet = %worksheet,
                key_file = %service_account.display(),
                "reading roster worksheet"
            );
            let key = ServiceAccountKey::load(service_account)?;
            let rows = read_worksheet(document_id, worksheet, &key)?;
            rows_to_roster(&rows)?
        }
    };
    info!(players = roster.len(), "roster loaded");
    Ok(roster)
}

/// Drops the worksheet's header row and normalizes the rest.
pub fn rows_to_roster(rows: &[Vec<String>]) -> Result<Roster> {
    let data = rows.get(1..).unwrap_or_default();
    roster_from_rows(data).context("roster is malformed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use crate::roster::PlayerId;

    fn row(line: &str) -> Vec<String> {
        line.split(',').map(String::from).collect()
    }

    #[test]
    fn worksheet_header_is_skipped() {
        let rows = vec![
            row("Zeitstempel,Vorname,Nachname,Spitzname,Matching"),
            row("01.04.2024 10:15:00,Jonas,K,,Male matching,,Köln,3,4,5"),
            row("01.04.2024 11:15:00,Anna,B,,Female matching,,,2,2,2,anna@x"),
        ];
        let roster = rows_to_roster(&rows).expect("roster");
        assert_eq!(roster.len(), 2);
        let captain = roster.captain().expect("captain");
        assert_eq!(captain.first_name, "Jonas");
        assert_eq!(captain.id, PlayerId(0));
        assert_eq!(roster.players()[1].email, "anna@x");
    }

    #[test]
    fn header_only_worksheet_is_empty() {
        let err = rows_to_roster(&[row("Zeitstempel,Vorname")]).unwrap_err();
        assert_eq!(err.downcast_ref::<RosterError>(), Some(&RosterError::Empty));
        let err = rows_to_roster(&[]).unwrap_err();
        assert_eq!(err.downcast_ref::<RosterError>(), Some(&RosterError::Empty));
    }

    #[test]
    fn missing_key_file_names_the_path() {
        let source = RosterSource::Spreadsheet {
            document_id: "doc".into(),
            worksheet: DEFAULT_WORKSHEET.into(),
            service_account: PathBuf::from("/nonexistent/roster-key.json"),
        };
        let err = fetch_roster(&source).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/roster-key.json"));
    }
}
