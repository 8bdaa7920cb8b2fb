use std::collections::HashSet;

use crate::error::RosterError;
use crate::roster::{PlayerId, Roster, Sex};

/// One player as seen by the search: identity, sex and (E, T, F) skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRow {
    pub id: PlayerId,
    pub sex: Sex,
    pub skills: [u8; 3],
}

/// Read-only numeric projection of the roster used for one search.
///
/// Rows are captain first, then the other males, then the females. Assignments
/// are joined to rows by `PlayerId`, never by position, so the ordering only
/// decides which ids receive which shuffled bucket slots.
#[derive(Debug, Clone)]
pub struct PlayerMatrix {
    rows: Vec<PlayerRow>,
    captain: PlayerId,
    males: Vec<PlayerId>,
    females: Vec<PlayerId>,
    id_bound: usize,
}

impl PlayerMatrix {
    pub fn from_roster(roster: &Roster) -> Result<Self, RosterError> {
        let rows = roster
            .players()
            .iter()
            .map(|p| PlayerRow {
                id: p.id,
                sex: p.sex,
                skills: p.skills(),
            })
            .collect();
        Self::from_rows(rows)
    }

    /// Builds a matrix from rows whose first element is the captain. The remaining
    /// rows keep their relative order within each sex.
    pub fn from_rows(rows: Vec<PlayerRow>) -> Result<Self, RosterError> {
        let Some(captain) = rows.first().copied() else {
            return Err(RosterError::Empty);
        };

        let mut seen = HashSet::with_capacity(rows.len());
        if let Some(dup) = rows.iter().find(|r| !seen.insert(r.id)) {
            return Err(RosterError::DuplicateId(dup.id.0));
        }

        let mut ordered = Vec::with_capacity(rows.len());
        ordered.push(captain);
        let rest = &rows[1..];
        ordered.extend(rest.iter().filter(|r| r.sex == Sex::Male).copied());
        ordered.extend(rest.iter().filter(|r| r.sex == Sex::Female).copied());

        let ids_of = |sex: Sex| {
            rest.iter()
                .filter(|r| r.sex == sex)
                .map(|r| r.id)
                .collect::<Vec<_>>()
        };
        let males = ids_of(Sex::Male);
        let females = ids_of(Sex::Female);
        let id_bound = ordered.iter().map(|r| r.id.index() + 1).max().unwrap_or(0);

        Ok(Self {
            rows: ordered,
            captain: captain.id,
            males,
            females,
            id_bound,
        })
    }

    pub fn rows(&self) -> &[PlayerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn captain(&self) -> PlayerId {
        self.captain
    }

    pub fn captain_sex(&self) -> Sex {
        self.rows[0].sex
    }

    /// Non-captain player ids of one sex, in row order.
    pub fn others(&self, sex: Sex) -> &[PlayerId] {
        match sex {
            Sex::Male => &self.males,
            Sex::Female => &self.females,
        }
    }

    /// Total players of one sex, captain included.
    pub fn count(&self, sex: Sex) -> usize {
        let captain = usize::from(self.captain_sex() == sex);
        self.others(sex).len() + captain
    }

    /// Exclusive upper bound of the player ids present.
    pub fn id_bound(&self) -> usize {
        self.id_bound
    }
}
