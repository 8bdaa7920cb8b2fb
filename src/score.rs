use crate::evaluate::EvaluationResult;

/// Weights of the ranking score. Lower scores are better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub overall_outer_var: f64,
    pub outer_var: f64,
    pub max_team_var: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            overall_outer_var: 2.0,
            outer_var: 1.0,
            max_team_var: 0.005,
        }
    }
}

impl ScoreWeights {
    // min_team_var is diagnostic only.
    pub fn score(&self, ev: &EvaluationResult) -> f64 {
        self.overall_outer_var * ev.overall_outer_var
            + self.outer_var * ev.outer_var
            + self.max_team_var * ev.max_team_var
    }
}

pub fn score(ev: &EvaluationResult) -> f64 {
    ScoreWeights::default().score(ev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_match_formula() {
        let ev = EvaluationResult {
            overall_outer_var: 1.5,
            outer_var: 0.25,
            min_team_var: 1000.0,
            max_team_var: 40.0,
        };
        assert!((score(&ev) - (3.0 + 0.25 + 0.2)).abs() < 1e-12);
        assert_eq!(score(&ev), score(&ev));
    }

    #[test]
    fn min_team_var_is_ignored() {
        let mut ev = EvaluationResult {
            overall_outer_var: 0.5,
            outer_var: 0.5,
            min_team_var: 0.0,
            max_team_var: 2.0,
        };
        let before = score(&ev);
        ev.min_team_var = 99.0;
        assert_eq!(score(&ev), before);
    }
}
