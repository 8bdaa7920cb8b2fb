use crate::error::{BalanceError, BalanceResult};
use crate::matrix::PlayerMatrix;
use crate::sampler::Assignment;

pub const SKILLS: usize = 3;
pub const SKILL_LABELS: [&str; SKILLS] = ["E", "T", "F"];

/// Balance statistics of one assignment. All variances are population variances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationResult {
    /// Variance across teams of each team's summed skill means.
    pub overall_outer_var: f64,
    /// Sum over skills of the variance across teams of that skill's team mean.
    pub outer_var: f64,
    pub min_team_var: f64,
    pub max_team_var: f64,
}

impl EvaluationResult {
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (
            self.overall_outer_var,
            self.outer_var,
            self.min_team_var,
            self.max_team_var,
        )
    }
}

/// Integer accumulators for one team. Sums are exact, so the derived statistics do
/// not depend on the order in which members are added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamStats {
    pub size: u64,
    sum: [u64; SKILLS],
    sum_sq: [u64; SKILLS],
}

impl TeamStats {
    pub fn add(&mut self, skills: [u8; SKILLS]) {
        self.size += 1;
        for (k, v) in skills.iter().enumerate() {
            let v = u64::from(*v);
            self.sum[k] += v;
            self.sum_sq[k] += v * v;
        }
    }

    pub fn means(&self) -> [f64; SKILLS] {
        let n = self.size as f64;
        self.sum.map(|s| s as f64 / n)
    }

    /// Population variance per skill.
    pub fn variances(&self) -> [f64; SKILLS] {
        let n = self.size;
        let mut out = [0.0; SKILLS];
        for k in 0..SKILLS {
            let num = n * self.sum_sq[k] - self.sum[k] * self.sum[k];
            out[k] = num as f64 / (n * n) as f64;
        }
        out
    }

    /// Sample variance per skill (n - 1 denominator); `None` for single-player teams.
    pub fn sample_variances(&self) -> Option<[f64; SKILLS]> {
        if self.size < 2 {
            return None;
        }
        let n = self.size;
        let mut out = [0.0; SKILLS];
        for k in 0..SKILLS {
            let num = n * self.sum_sq[k] - self.sum[k] * self.sum[k];
            out[k] = num as f64 / (n * (n - 1)) as f64;
        }
        Some(out)
    }

    /// Mean of the per-skill population variances.
    pub fn internal_variance(&self) -> f64 {
        self.variances().iter().sum::<f64>() / SKILLS as f64
    }
}

/// Accumulates per-team statistics, indexed by team.
pub fn team_stats(
    assignment: &Assignment,
    matrix: &PlayerMatrix,
    no_teams: usize,
) -> BalanceResult<Vec<TeamStats>> {
    let mut teams = vec![TeamStats::default(); no_teams];
    for row in matrix.rows() {
        let Some(team) = assignment.team_of(row.id) else {
            return Err(BalanceError::Evaluation(format!(
                "player {} has no team",
                row.id
            )));
        };
        let Some(stats) = teams.get_mut(team) else {
            return Err(BalanceError::Evaluation(format!(
                "player {} is on team {team}, only {no_teams} teams exist",
                row.id
            )));
        };
        stats.add(row.skills);
    }
    if let Some(empty) = teams.iter().position(|t| t.size == 0) {
        return Err(BalanceError::Evaluation(format!("team {empty} has no players")));
    }
    Ok(teams)
}

pub fn evaluate_assignment(
    assignment: &Assignment,
    matrix: &PlayerMatrix,
    no_teams: usize,
) -> BalanceResult<EvaluationResult> {
    let teams = team_stats(assignment, matrix, no_teams)?;
    Ok(evaluate_team_stats(&teams))
}

pub fn evaluate_team_stats(teams: &[TeamStats]) -> EvaluationResult {
    let means = teams.iter().map(TeamStats::means).collect::<Vec<_>>();

    let outer_var = (0..SKILLS)
        .map(|k| population_variance(means.iter().map(|m| m[k])))
        .sum::<f64>();
    let overall_outer_var = population_variance(means.iter().map(|m| m.iter().sum::<f64>()));

    let internal = teams.iter().map(TeamStats::internal_variance);
    let (min_team_var, max_team_var) = internal.fold((f64::INFINITY, f64::NEG_INFINITY), |acc, v| {
        (acc.0.min(v), acc.1.max(v))
    });

    EvaluationResult {
        overall_outer_var,
        outer_var,
        min_team_var,
        max_team_var,
    }
}

fn population_variance(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let n = values.clone().count();
    if n == 0 {
        return 0.0;
    }
    let mean = values.clone().sum::<f64>() / n as f64;
    values.map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64
}
