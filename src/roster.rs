use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::RosterError;

/// Raw sign-up sheet column order. Only the positions matter, header text is ignored.
pub const RAW_COLUMNS: [&str; 12] = [
    "date",
    "first name",
    "last name",
    "nickname",
    "S",
    "email_unused",
    "from",
    "F",
    "T",
    "E",
    "email",
    "unnamed",
];

const COL_DATE: usize = 0;
const COL_FIRST_NAME: usize = 1;
const COL_LAST_NAME: usize = 2;
const COL_NICKNAME: usize = 3;
const COL_SEX: usize = 4;
const COL_FROM: usize = 6;
const COL_FITNESS: usize = 7;
const COL_THROWING: usize = 8;
const COL_EXPERIENCE: usize = 9;
const COL_EMAIL: usize = 10;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%d.%m.%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn code(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }

    /// Accepts the sign-up form's matching preference ("Male matching") as well as
    /// already normalized codes.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim().to_lowercase();
        let s = s.strip_suffix(" matching").unwrap_or(&s);
        match s {
            "m" | "male" => Some(Sex::Male),
            "f" | "female" => Some(Sex::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub sex: Sex,
    pub experience: u8,
    pub throwing: u8,
    pub fitness: u8,
    pub registered: String,
    pub registered_at: Option<NaiveDateTime>,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub from: String,
    pub email: String,
}

impl PlayerRecord {
    /// Skills in (experience, throwing, fitness) order.
    pub fn skills(&self) -> [u8; 3] {
        [self.experience, self.throwing, self.fitness]
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        full.trim().to_string()
    }
}

/// Typed player table. Players are kept captain first, then the remaining males,
/// then the females, each block ordered by registration time.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<PlayerRecord>,
}

impl Roster {
    /// Builds the table from records in row order and reassigns ids 0..n in that
    /// order. Within each sex, players are ordered by `registered_at` (earliest first,
    /// unparsable timestamps last, ties in row order). The earliest-registered male,
    /// or the earliest female if there are no males, becomes captain.
    pub fn from_records(records: Vec<PlayerRecord>) -> Result<Self, RosterError> {
        if records.is_empty() {
            return Err(RosterError::Empty);
        }
        let mut players = records
            .into_iter()
            .enumerate()
            .map(|(idx, mut record)| {
                record.id = PlayerId(idx as u32);
                record
            })
            .collect::<Vec<_>>();
        // Stable: row order survives among equal timestamps.
        players.sort_by_key(|p| {
            let sex_rank = match p.sex {
                Sex::Male => 0u8,
                Sex::Female => 1u8,
            };
            (sex_rank, p.registered_at.is_none(), p.registered_at)
        });
        Ok(Self { players })
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn captain(&self) -> Option<&PlayerRecord> {
        self.players.first()
    }

    pub fn count(&self, sex: Sex) -> usize {
        self.players.iter().filter(|p| p.sex == sex).count()
    }
}

/// Parses sign-up CSV text (header row first) into a roster.
pub fn parse_roster_csv(raw: &str) -> Result<Roster, RosterError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row_no = idx + 1;
        let row = row.map_err(|err| RosterError::Malformed {
            row: row_no,
            reason: err.to_string(),
        })?;
        let fields = row.iter().collect::<Vec<_>>();
        if let Some(record) = parse_row(row_no, &fields)? {
            records.push(record);
        }
    }
    Roster::from_records(records)
}

/// Same normalization as [`parse_roster_csv`] for rows that arrive already split,
/// e.g. a worksheet read through the Sheets API. `rows` excludes the header row.
pub fn roster_from_rows<R: AsRef<[String]>>(rows: &[R]) -> Result<Roster, RosterError> {
    let mut records = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let fields = row.as_ref().iter().map(String::as_str).collect::<Vec<_>>();
        if let Some(record) = parse_row(idx + 1, &fields)? {
            records.push(record);
        }
    }
    Roster::from_records(records)
}

/// Converts one positional row. Rows without a first name are skipped (`Ok(None)`).
pub fn parse_row(row: usize, fields: &[&str]) -> Result<Option<PlayerRecord>, RosterError> {
    let first_name = fields.get(COL_FIRST_NAME).map(|s| s.trim()).unwrap_or("");
    if first_name.is_empty() {
        return Ok(None);
    }

    let field = |col: usize| column(fields, row, col);

    let sex_raw = field(COL_SEX)?;
    let sex = Sex::parse(sex_raw).ok_or_else(|| RosterError::UnknownSex {
        row,
        value: sex_raw.to_string(),
    })?;
    let registered = field(COL_DATE)?.to_string();

    Ok(Some(PlayerRecord {
        id: PlayerId(0),
        sex,
        experience: parse_skill(row, COL_EXPERIENCE, field(COL_EXPERIENCE)?)?,
        throwing: parse_skill(row, COL_THROWING, field(COL_THROWING)?)?,
        fitness: parse_skill(row, COL_FITNESS, field(COL_FITNESS)?)?,
        registered_at: parse_timestamp(&registered),
        registered,
        first_name: first_name.to_string(),
        last_name: field(COL_LAST_NAME)?.to_string(),
        nickname: fields.get(COL_NICKNAME).map(|s| s.trim().to_string()).unwrap_or_default(),
        from: fields.get(COL_FROM).map(|s| s.trim().to_string()).unwrap_or_default(),
        email: fields.get(COL_EMAIL).map(|s| s.trim().to_string()).unwrap_or_default(),
    }))
}

fn column<'a>(fields: &[&'a str], row: usize, col: usize) -> Result<&'a str, RosterError> {
    fields
        .get(col)
        .copied()
        .map(str::trim)
        .ok_or(RosterError::MissingColumn {
            row,
            column: RAW_COLUMNS[col],
        })
}

fn parse_skill(row: usize, col: usize, raw: &str) -> Result<u8, RosterError> {
    let invalid = || RosterError::InvalidSkill {
        row,
        column: RAW_COLUMNS[col],
        value: raw.to_string(),
    };
    if let Ok(v) = raw.parse::<u8>() {
        return Ok(v);
    }
    // Spreadsheet exports sometimes render integers as "3.0".
    let v = raw.parse::<f64>().map_err(|_| invalid())?;
    if v.fract() == 0.0 && (0.0..=255.0).contains(&v) {
        Ok(v as u8)
    } else {
        Err(invalid())
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
