use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::buckets::{BucketSizes, partition};
use crate::error::{BalanceError, BalanceResult};
use crate::evaluate::{EvaluationResult, evaluate_assignment};
use crate::matrix::PlayerMatrix;
use crate::roster::Sex;
use crate::sampler::{Assignment, sample_assignment};
use crate::score::ScoreWeights;

pub const DEFAULT_MAX_TRIES: usize = 10_000;
pub const DEFAULT_PARALLELISM: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub no_teams: usize,
    pub max_tries: usize,
    pub parallelism: usize,
    pub weights: ScoreWeights,
}

impl SearchConfig {
    pub fn new(no_teams: usize) -> Self {
        Self {
            no_teams,
            max_tries: DEFAULT_MAX_TRIES,
            parallelism: DEFAULT_PARALLELISM,
            weights: ScoreWeights::default(),
        }
    }

    pub fn validate(&self, players: usize) -> BalanceResult<()> {
        if self.no_teams == 0 {
            return Err(BalanceError::config("team count must be at least 1"));
        }
        if self.max_tries == 0 {
            return Err(BalanceError::config("max tries must be at least 1"));
        }
        if self.parallelism == 0 {
            return Err(BalanceError::config("parallelism must be at least 1"));
        }
        if players < self.no_teams {
            return Err(BalanceError::config(format!(
                "{} teams requested for {players} players",
                self.no_teams
            )));
        }
        Ok(())
    }
}

/// One finished trial. `seed` is the trial index it was drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAssignment {
    pub seed: u64,
    pub assignment: Assignment,
    pub score: f64,
    pub evaluation: EvaluationResult,
}

/// Sample, evaluate and score the assignment for one seed.
pub fn run_trial(
    matrix: &PlayerMatrix,
    buckets: &BucketSizes,
    weights: &ScoreWeights,
    seed: u64,
) -> BalanceResult<ScoredAssignment> {
    let assignment = sample_assignment(matrix, buckets, seed)?;
    let evaluation = evaluate_assignment(&assignment, matrix, buckets.no_teams)?;
    Ok(ScoredAssignment {
        seed,
        score: weights.score(&evaluation),
        assignment,
        evaluation,
    })
}

/// Runs exactly `max_tries` independent trials (trial `i` uses seed `i`) on a
/// dedicated pool and returns all of them, best score first. Ties keep seed order,
/// so the ranking does not depend on scheduling.
pub fn compute_assignments(
    matrix: &PlayerMatrix,
    config: &SearchConfig,
) -> BalanceResult<Vec<ScoredAssignment>> {
    config.validate(matrix.len())?;
    let buckets = partition(
        matrix.count(Sex::Male),
        matrix.count(Sex::Female),
        config.no_teams,
    )?;
    debug!(males = ?buckets.males, females = ?buckets.females, "bucket slots");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.parallelism)
        .build()
        .map_err(|err| BalanceError::WorkerPool(err.to_string()))?;

    info!(
        players = matrix.len(),
        no_teams = config.no_teams,
        max_tries = config.max_tries,
        parallelism = config.parallelism,
        "starting assignment search"
    );
    let started = Instant::now();

    let weights = config.weights;
    let mut results = pool.install(|| {
        (0..config.max_tries as u64)
            .into_par_iter()
            .map(|seed| run_trial(matrix, &buckets, &weights, seed))
            .collect::<BalanceResult<Vec<_>>>()
    })?;

    results.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.seed.cmp(&b.seed)));

    if let Some(best) = results.first() {
        info!(
            trials = results.len(),
            best_score = best.score,
            best_seed = best.seed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "assignment search finished"
        );
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::PlayerRow;
    use crate::roster::PlayerId;

    fn matrix() -> PlayerMatrix {
        let rows = (0..10u32)
            .map(|i| PlayerRow {
                id: PlayerId(i),
                sex: if i < 6 { Sex::Male } else { Sex::Female },
                skills: [(i * 3 % 7) as u8, (i % 4) as u8, (10 - i) as u8],
            })
            .collect();
        PlayerMatrix::from_rows(rows).expect("matrix")
    }

    #[test]
    fn returns_every_trial_sorted() {
        let cfg = SearchConfig {
            max_tries: 64,
            parallelism: 2,
            ..SearchConfig::new(2)
        };
        let out = compute_assignments(&matrix(), &cfg).expect("search");
        assert_eq!(out.len(), 64);
        assert!(out.windows(2).all(|w| w[0].score <= w[1].score));
        let mut seeds = out.iter().map(|r| r.seed).collect::<Vec<_>>();
        seeds.sort_unstable();
        assert_eq!(seeds, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn parallelism_does_not_change_ranking() {
        let m = matrix();
        let one = compute_assignments(
            &m,
            &SearchConfig {
                max_tries: 50,
                parallelism: 1,
                ..SearchConfig::new(3)
            },
        )
        .expect("search");
        let four = compute_assignments(
            &m,
            &SearchConfig {
                max_tries: 50,
                parallelism: 4,
                ..SearchConfig::new(3)
            },
        )
        .expect("search");
        assert_eq!(one, four);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let m = matrix();
        for cfg in [
            SearchConfig::new(0),
            SearchConfig::new(11),
            SearchConfig {
                max_tries: 0,
                ..SearchConfig::new(2)
            },
            SearchConfig {
                parallelism: 0,
                ..SearchConfig::new(2)
            },
        ] {
            let err = compute_assignments(&m, &cfg).unwrap_err();
            assert_eq!(err.stage(), crate::error::Stage::Config);
        }
    }

    #[test]
    fn trial_matches_direct_run() {
        let m = matrix();
        let cfg = SearchConfig {
            max_tries: 10,
            parallelism: 2,
            ..SearchConfig::new(2)
        };
        let out = compute_assignments(&m, &cfg).expect("search");
        let buckets = partition(6, 4, 2).expect("buckets");
        for r in &out {
            let direct = run_trial(&m, &buckets, &cfg.weights, r.seed).expect("trial");
            assert_eq!(&direct, r);
        }
    }
}
