use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::buckets::BucketSizes;
use crate::error::{BalanceError, BalanceResult};
use crate::matrix::PlayerMatrix;
use crate::roster::{PlayerId, Sex};

pub const CAPTAIN_TEAM: usize = 0;

/// Team of every player, addressed by `PlayerId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    teams: Vec<Option<usize>>,
}

impl Assignment {
    fn with_capacity(id_bound: usize) -> Self {
        Self {
            teams: vec![None; id_bound],
        }
    }

    fn place(&mut self, id: PlayerId, team: usize) {
        self.teams[id.index()] = Some(team);
    }

    /// Builds an assignment from explicit placements, e.g. a hand-made lineup.
    pub fn from_placements(placements: impl IntoIterator<Item = (PlayerId, usize)>) -> Self {
        let placements = placements.into_iter().collect::<Vec<_>>();
        let bound = placements.iter().map(|(id, _)| id.index() + 1).max().unwrap_or(0);
        let mut out = Self::with_capacity(bound);
        for (id, team) in placements {
            out.place(id, team);
        }
        out
    }

    pub fn team_of(&self, id: PlayerId) -> Option<usize> {
        self.teams.get(id.index()).copied().flatten()
    }

    /// (player, team) pairs in id order.
    pub fn placements(&self) -> impl Iterator<Item = (PlayerId, usize)> + '_ {
        self.teams
            .iter()
            .enumerate()
            .filter_map(|(idx, team)| team.map(|t| (PlayerId(idx as u32), t)))
    }
}

/// Draws one assignment for `seed`. The captain is fixed to team 0; all other
/// slots are shuffled per sex (males first) with one RNG seeded from `seed`.
pub fn sample_assignment(
    matrix: &PlayerMatrix,
    buckets: &BucketSizes,
    seed: u64,
) -> BalanceResult<Assignment> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let captain_sex = matrix.captain_sex();

    let mut assignment = Assignment::with_capacity(matrix.id_bound());
    assignment.place(matrix.captain(), CAPTAIN_TEAM);

    for sex in [Sex::Male, Sex::Female] {
        let mut slots = buckets.slots(sex);
        if sex == captain_sex {
            match slots.split_first() {
                Some((&CAPTAIN_TEAM, rest)) => slots = rest,
                Some((&team, _)) => {
                    return Err(BalanceError::Sampling {
                        seed,
                        reason: format!("captain slot is on team {team}, expected {CAPTAIN_TEAM}"),
                    });
                }
                None => {
                    return Err(BalanceError::Sampling {
                        seed,
                        reason: format!("no {} slot reserved for the captain", sex.code()),
                    });
                }
            }
        }

        let players = matrix.others(sex);
        if players.len() != slots.len() {
            return Err(BalanceError::Sampling {
                seed,
                reason: format!(
                    "{} {} players but {} slots",
                    players.len(),
                    sex.code(),
                    slots.len()
                ),
            });
        }

        let mut shuffled = slots.to_vec();
        shuffled.shuffle(&mut rng);
        for (id, team) in players.iter().zip(shuffled) {
            assignment.place(*id, team);
        }
    }

    Ok(assignment)
}
