use std::io::{self, Write};

use serde::Serialize;

use crate::evaluate::{SKILLS, TeamStats};
use crate::roster::{PlayerId, PlayerRecord, Roster, Sex};
use crate::search::ScoredAssignment;

pub const DEFAULT_SUGGESTIONS: usize = 5;
const RULE: &str = "---------------------------------";

/// One team of a suggestion, resolved against the roster.
#[derive(Debug, Clone)]
pub struct TeamView<'a> {
    /// 1-based for display.
    pub team: usize,
    pub means: [f64; SKILLS],
    /// Sample variances (n - 1), absent for single-player teams.
    pub variances: Option<[f64; SKILLS]>,
    pub players: Vec<&'a PlayerRecord>,
}

pub fn team_views<'a>(roster: &'a Roster, scored: &ScoredAssignment) -> Vec<TeamView<'a>> {
    let no_teams = scored
        .assignment
        .placements()
        .map(|(_, team)| team + 1)
        .max()
        .unwrap_or(0);
    let mut stats = vec![TeamStats::default(); no_teams];
    let mut players: Vec<Vec<&PlayerRecord>> = vec![Vec::new(); no_teams];
    for player in roster.players() {
        let Some(team) = scored.assignment.team_of(player.id) else {
            continue;
        };
        stats[team].add(player.skills());
        players[team].push(player);
    }

    stats
        .into_iter()
        .zip(players)
        .enumerate()
        .filter(|(_, (s, _))| s.size > 0)
        .map(|(idx, (s, players))| TeamView {
            team: idx + 1,
            means: s.means(),
            variances: s.sample_variances(),
            players,
        })
        .collect()
}

/// Prints the best `suggestions` candidates as a plain-text report.
pub fn print_best_assignments<W: Write>(
    out: &mut W,
    roster: &Roster,
    ranked: &[ScoredAssignment],
    suggestions: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "\nVar(TotalSkill) | Sum_Skill( Var(Skill) ) | Min/Max Var(Skill) within each team"
    )?;
    writeln!(out, "\nE = Experience\nT = Throwing\nF = Fitness\n\n")?;

    for (rank, scored) in ranked.iter().take(suggestions).enumerate() {
        let ev = &scored.evaluation;
        writeln!(out, "Suggestion {} (score = {:.4}, seed = {})", rank, scored.score, scored.seed)?;
        writeln!(out, "{RULE}")?;
        writeln!(
            out,
            "{:.4} | {:.4} | {:.4} | {:.4}",
            ev.overall_outer_var, ev.outer_var, ev.min_team_var, ev.max_team_var
        )?;
        writeln!(out, "{RULE}\n")?;

        let teams = team_views(roster, scored);
        writeln!(out, "Team  | E           | T           | F")?;
        for team in &teams {
            let cells = (0..SKILLS)
                .map(|k| format_cell(team.means[k], team.variances.map(|v| v[k])))
                .collect::<Vec<_>>();
            writeln!(out, "{:<5} | {}", team.team, cells.join(" | "))?;
        }
        let ranges = mean_ranges(&teams);
        writeln!(
            out,
            "Range | {:<11.1} | {:<11.1} | {:.1}",
            ranges[0], ranges[1], ranges[2]
        )?;
        writeln!(out, "{RULE}")?;

        for team in &teams {
            writeln!(out, "Team {}\n------", team.team)?;
            writeln!(
                out,
                "Mean E: {:.1}, T: {:.1}, F: {:.1}\n------",
                team.means[0], team.means[1], team.means[2]
            )?;
            writeln!(
                out,
                "{:<3} {:<16} {:<16} {:<2} {:<14} {:>3} {:>3} {:>3}",
                "", "first name", "last name", "S", "from", "E", "T", "F"
            )?;
            for (idx, p) in team.players.iter().enumerate() {
                writeln!(
                    out,
                    "{:<3} {:<16} {:<16} {:<2} {:<14} {:>3} {:>3} {:>3}",
                    idx,
                    p.first_name,
                    p.last_name,
                    p.sex.code(),
                    p.from,
                    p.experience,
                    p.throwing,
                    p.fitness
                )?;
            }
            writeln!(out, "\n")?;
        }
    }
    Ok(())
}

/// Max minus min of the team means, per skill.
pub fn mean_ranges(teams: &[TeamView<'_>]) -> [f64; SKILLS] {
    let mut out = [0.0; SKILLS];
    for (k, slot) in out.iter_mut().enumerate() {
        let (lo, hi) = teams.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, t| {
            (acc.0.min(t.means[k]), acc.1.max(t.means[k]))
        });
        *slot = if teams.is_empty() { 0.0 } else { hi - lo };
    }
    out
}

fn format_cell(mean: f64, variance: Option<f64>) -> String {
    let cell = match variance {
        Some(v) => format!("{mean:.1} ({v:.0})"),
        None => format!("{mean:.1} (-)"),
    };
    format!("{cell:<11}")
}

#[derive(Debug, Serialize)]
struct JsonSuggestion {
    rank: usize,
    seed: u64,
    score: f64,
    overall_outer_var: f64,
    outer_var: f64,
    min_team_var: f64,
    max_team_var: f64,
    teams: Vec<JsonTeam>,
}

#[derive(Debug, Serialize)]
struct JsonTeam {
    team: usize,
    means: [f64; SKILLS],
    variances: Option<[f64; SKILLS]>,
    players: Vec<JsonPlayer>,
}

#[derive(Debug, Serialize)]
struct JsonPlayer {
    id: PlayerId,
    name: String,
    sex: Sex,
    from: String,
    experience: u8,
    throwing: u8,
    fitness: u8,
}

/// JSON rendering of the same top candidates as [`print_best_assignments`].
pub fn render_json(
    roster: &Roster,
    ranked: &[ScoredAssignment],
    suggestions: usize,
) -> serde_json::Result<String> {
    let rows = ranked
        .iter()
        .take(suggestions)
        .enumerate()
        .map(|(rank, scored)| JsonSuggestion {
            rank,
            seed: scored.seed,
            score: scored.score,
            overall_outer_var: scored.evaluation.overall_outer_var,
            outer_var: scored.evaluation.outer_var,
            min_team_var: scored.evaluation.min_team_var,
            max_team_var: scored.evaluation.max_team_var,
            teams: team_views(roster, scored)
                .into_iter()
                .map(|t| JsonTeam {
                    team: t.team,
                    means: t.means,
                    variances: t.variances,
                    players: t
                        .players
                        .iter()
                        .map(|p| JsonPlayer {
                            id: p.id,
                            name: p.display_name(),
                            sex: p.sex,
                            from: p.from.clone(),
                            experience: p.experience,
                            throwing: p.throwing,
                            fitness: p.fitness,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect::<Vec<_>>();
    serde_json::to_string_pretty(&rows)
}
