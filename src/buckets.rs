use crate::error::{BalanceError, BalanceResult};
use crate::roster::Sex;

/// Team-index slots per sex. `males[k]` is the team of the k-th male slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSizes {
    pub no_teams: usize,
    pub males: Vec<usize>,
    pub females: Vec<usize>,
}

impl BucketSizes {
    pub fn slots(&self, sex: Sex) -> &[usize] {
        match sex {
            Sex::Male => &self.males,
            Sex::Female => &self.females,
        }
    }

    /// Number of slots of `sex` on `team`.
    pub fn team_count(&self, sex: Sex, team: usize) -> usize {
        self.slots(sex).iter().filter(|t| **t == team).count()
    }
}

/// Splits `males` and `females` into per-team slot sequences.
///
/// Surplus males go to the lowest team indices, surplus females to the highest.
/// The asymmetry is kept for compatibility with existing rosters' team sizes.
pub fn partition(males: usize, females: usize, no_teams: usize) -> BalanceResult<BucketSizes> {
    if no_teams == 0 {
        return Err(BalanceError::config("team count must be at least 1"));
    }

    let min_males = males / no_teams;
    let overhead_males = males - min_males * no_teams;
    let min_females = females / no_teams;
    let overhead_females = females - min_females * no_teams;

    let male_lengths = (0..no_teams).map(|team| {
        if team < overhead_males {
            min_males + 1
        } else {
            min_males
        }
    });
    let female_lengths = (0..no_teams).map(|team| {
        if team < no_teams - overhead_females {
            min_females
        } else {
            min_females + 1
        }
    });

    Ok(BucketSizes {
        no_teams,
        males: expand(male_lengths),
        females: expand(female_lengths),
    })
}

fn expand(lengths: impl Iterator<Item = usize>) -> Vec<usize> {
    lengths
        .enumerate()
        .flat_map(|(team, len)| std::iter::repeat_n(team, len))
        .collect()
}
