use std::fs;
use std::path::PathBuf;

use exsoviet_ranking::club_coefficient::ClubRating;
use exsoviet_ranking::dataset::{parse_clubs_csv, parse_nations_csv};
use exsoviet_ranking::nation_coefficient::{NationRating, RankingWeights};
use exsoviet_ranking::rankings::{compute_snapshot, rank_clubs, rank_nations};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn snapshot_ranks_descending_and_dense() {
    let nations = parse_nations_csv(&read_fixture("nations.csv")).expect("fixture should parse");
    let clubs = parse_clubs_csv(&read_fixture("clubs.csv")).expect("fixture should parse");
    let snapshot = compute_snapshot(&nations, &clubs, RankingWeights::default());

    let ranks: Vec<u32> = snapshot.nations.iter().map(|n| n.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    for pair in snapshot.nations.windows(2) {
        assert!(pair[0].coefficient >= pair[1].coefficient);
    }
    assert_eq!(snapshot.nations[0].country_code, "BET");
    assert_eq!(snapshot.nations[1].country_code, "GAM");
    assert_eq!(snapshot.nations[2].country_code, "ALA");

    assert_eq!(snapshot.clubs[0].team, "Worked FC");
    assert_eq!(snapshot.clubs[0].rank, 1);
    assert_eq!(snapshot.clubs[1].team, "Late FC");
    assert_eq!(snapshot.clubs[1].rank, 2);

    assert_eq!(snapshot.window_years, vec![2020, 2021, 2022, 2023, 2024]);
}

#[test]
fn nation_ties_break_by_code() {
    let tied = |code: &str| NationRating {
        country: format!("Nation {code}"),
        country_code: code.to_string(),
        uefa_total: 5.0,
        afc_total: 0.0,
        fifa_total: 0.0,
        coefficient: 1.5,
    };
    let ranked = rank_nations(vec![tied("BBB"), tied("AAA")]);
    assert_eq!(ranked[0].country_code, "AAA");
    assert_eq!(ranked[0].rank, 1);
    assert_eq!(ranked[1].country_code, "BBB");
    assert_eq!(ranked[1].rank, 2);
}

#[test]
fn club_ties_break_by_team_name() {
    let tied = |team: &str| ClubRating {
        team: team.to_string(),
        team_code: team.to_string(),
        country_code: "UKR".to_string(),
        season_values: Vec::new(),
        coefficient: 0.5,
    };
    let ranked = rank_clubs(vec![tied("Zorya"), tied("Dnipro")]);
    assert_eq!(ranked[0].team, "Dnipro");
    assert_eq!(ranked[1].team, "Zorya");
}

#[test]
fn snapshot_is_deterministic() {
    let nations = parse_nations_csv(&read_fixture("nations.csv")).expect("fixture should parse");
    let clubs = parse_clubs_csv(&read_fixture("clubs.csv")).expect("fixture should parse");

    let first = compute_snapshot(&nations, &clubs, RankingWeights::default());
    let second = compute_snapshot(&nations, &clubs, RankingWeights::default());

    let first_json = serde_json::to_string(&first).expect("snapshot should serialize");
    let second_json = serde_json::to_string(&second).expect("snapshot should serialize");
    assert_eq!(first_json, second_json);
}
