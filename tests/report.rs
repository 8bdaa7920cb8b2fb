use std::fs;
use std::path::PathBuf;

use roster_balance::matrix::PlayerMatrix;
use roster_balance::report::{mean_ranges, print_best_assignments, render_json, team_views};
use roster_balance::roster::{PlayerId, Sex, parse_roster_csv};
use roster_balance::search::{SearchConfig, compute_assignments};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn fixture_roster_is_captain_then_males_then_females() {
    let roster = parse_roster_csv(&read_fixture("roster.csv")).expect("fixture should parse");
    assert_eq!(roster.len(), 20);
    let captain = roster.captain().expect("captain");
    assert_eq!(captain.first_name, "Jonas");
    assert_eq!(captain.id, PlayerId(0));
    let sexes = roster.players().iter().map(|p| p.sex).collect::<Vec<_>>();
    let first_female = sexes.iter().position(|s| *s == Sex::Female).expect("females");
    assert_eq!(first_female, 12);
    assert!(sexes[first_female..].iter().all(|s| *s == Sex::Female));
}

#[test]
fn text_report_lists_every_team_and_player() {
    let roster = parse_roster_csv(&read_fixture("roster.csv")).expect("fixture should parse");
    let matrix = PlayerMatrix::from_roster(&roster).expect("matrix");
    let ranked = compute_assignments(
        &matrix,
        &SearchConfig {
            max_tries: 30,
            parallelism: 2,
            ..SearchConfig::new(4)
        },
    )
    .expect("search");

    let mut buf = Vec::new();
    print_best_assignments(&mut buf, &roster, &ranked, 2).expect("report");
    let text = String::from_utf8(buf).expect("utf8");

    assert!(text.contains("Suggestion 0 (score = "));
    assert!(text.contains("Suggestion 1 (score = "));
    assert!(!text.contains("Suggestion 2 "));
    assert!(text.contains("Range | "));
    for team in 1..=4 {
        assert!(text.contains(&format!("Team {team}\n------")));
    }
    for player in roster.players() {
        assert!(text.contains(&player.first_name));
    }
}

#[test]
fn team_views_match_assignment() {
    let roster = parse_roster_csv(&read_fixture("roster.csv")).expect("fixture should parse");
    let matrix = PlayerMatrix::from_roster(&roster).expect("matrix");
    let ranked = compute_assignments(
        &matrix,
        &SearchConfig {
            max_tries: 10,
            parallelism: 1,
            ..SearchConfig::new(4)
        },
    )
    .expect("search");

    let views = team_views(&roster, &ranked[0]);
    assert_eq!(views.len(), 4);
    assert!(views.iter().all(|v| v.players.len() == 5));
    assert!(views[0].players.iter().any(|p| p.first_name == "Jonas"));
    let ranges = mean_ranges(&views);
    assert!(ranges.iter().all(|r| *r >= 0.0));
}

#[test]
fn json_report_is_valid() {
    let roster = parse_roster_csv(&read_fixture("roster.csv")).expect("fixture should parse");
    let matrix = PlayerMatrix::from_roster(&roster).expect("matrix");
    let ranked = compute_assignments(
        &matrix,
        &SearchConfig {
            max_tries: 10,
            parallelism: 2,
            ..SearchConfig::new(2)
        },
    )
    .expect("search");

    let raw = render_json(&roster, &ranked, 3).expect("json");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("parse back");
    let rows = value.as_array().expect("array");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["rank"], 0);
    assert_eq!(rows[0]["teams"].as_array().map(|t| t.len()), Some(2));
    assert_eq!(rows[0]["teams"][0]["players"][0]["sex"], "M");
}
