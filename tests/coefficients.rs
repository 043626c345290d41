use std::fs;
use std::path::PathBuf;

use exsoviet_ranking::club_coefficient::{
    compute_club_ratings, season_coefficient, tier_weight, trailing_window_years,
};
use exsoviet_ranking::dataset::{parse_clubs_csv, parse_nations_csv};
use exsoviet_ranking::nation_coefficient::{compute_nation_ratings, trailing_sum, RankingWeights};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() < tol,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn tier_weight_decays_with_depth() {
    assert_eq!(tier_weight(1), 1.0);
    assert_close(tier_weight(2), 0.51763, 1e-3);
    assert_close(tier_weight(3), 0.35216, 1e-3);
}

#[test]
fn season_coefficient_averages_league_and_group() {
    let rows = parse_clubs_csv(&read_fixture("clubs.csv")).expect("fixture should parse");
    // 60 pts over 30 games in tier 1, plus 15 pts over 10 championship
    // group games: (2.0 + 1.5) / 2.
    assert_close(season_coefficient(&rows[0]), 1.75, 1e-9);
}

#[test]
fn zero_games_season_scores_zero() {
    let rows = parse_clubs_csv(&read_fixture("clubs.csv")).expect("fixture should parse");
    assert_eq!(season_coefficient(&rows[4]), 0.0);
}

#[test]
fn relegation_group_is_discounted() {
    let rows = parse_clubs_csv(&read_fixture("clubs.csv")).expect("fixture should parse");
    assert_close(season_coefficient(&rows[3]), (2.0 + 1.5 * 0.913) / 2.0, 1e-9);
}

#[test]
fn group_round_with_no_games_contributes_nothing() {
    let rows = parse_clubs_csv(&read_fixture("clubs.csv")).expect("fixture should parse");
    // Championship round recorded but never played: only the league half
    // counts.
    assert_close(season_coefficient(&rows[6]), 0.75, 1e-9);
}

#[test]
fn club_window_covers_recent_distinct_years() {
    let rows = parse_clubs_csv(&read_fixture("clubs.csv")).expect("fixture should parse");
    assert_eq!(trailing_window_years(&rows), vec![2020, 2021, 2022, 2023, 2024]);
}

#[test]
fn club_coefficients_average_over_window() {
    let rows = parse_clubs_csv(&read_fixture("clubs.csv")).expect("fixture should parse");
    let ratings = compute_club_ratings(&rows);
    assert_eq!(ratings.len(), 2);

    // Late FC only played 2023 (tier 2) and 2024; the other three window
    // years count as zero against the same five-year denominator.
    assert_eq!(ratings[0].team, "Late FC");
    assert_close(
        ratings[0].coefficient,
        (2.0 * 2f64.powf(-0.95) / 2.0 + 0.75) / 5.0,
        1e-9,
    );

    assert_eq!(ratings[1].team, "Worked FC");
    assert_close(
        ratings[1].coefficient,
        (1.75 + 0.75 + 0.5 + (2.0 + 1.5 * 0.913) / 2.0 + 0.0) / 5.0,
        1e-9,
    );
    let years: Vec<i32> = ratings[1].season_values.iter().map(|(y, _)| *y).collect();
    assert_eq!(years, vec![2020, 2021, 2022, 2023, 2024]);
    assert_eq!(ratings[1].season_values[0].1, 0.0);
}

#[test]
fn sixth_year_falls_out_of_window() {
    let raw = "team,year,league_tier,league_games,league_points\n\
               Dnipro,2019,1,30,300\n\
               Dnipro,2020,1,30,60\n\
               Dnipro,2021,1,30,60\n\
               Dnipro,2022,1,30,60\n\
               Dnipro,2023,1,30,60\n\
               Dnipro,2024,1,30,60";
    let rows = parse_clubs_csv(raw).expect("rows should parse");
    let ratings = compute_club_ratings(&rows);
    // The outsized 2019 season is older than the five-year window.
    assert_close(ratings[0].coefficient, 1.0, 1e-9);
}

#[test]
fn short_history_divides_by_distinct_years() {
    let raw = "team,year,league_tier,league_games,league_points\n\
               Dnipro,2023,1,30,30\n\
               Dnipro,2024,1,30,60";
    let rows = parse_clubs_csv(raw).expect("rows should parse");
    assert_eq!(trailing_window_years(&rows), vec![2023, 2024]);
    let ratings = compute_club_ratings(&rows);
    assert_close(ratings[0].coefficient, (0.5 + 1.0) / 2.0, 1e-9);
}

#[test]
fn nation_coefficient_weights_components() {
    let rows = parse_nations_csv(&read_fixture("nations.csv")).expect("fixture should parse");
    let ratings = compute_nation_ratings(&rows, RankingWeights::default());

    // Alaland: UEFA 1+2+3+4+0, nothing else.
    assert_eq!(ratings[0].country_code, "ALA");
    assert_eq!(ratings[0].uefa_total, 10.0);
    assert_close(ratings[0].coefficient, 3.0, 1e-9);

    // Betaria carries a FIFA series; the stale `uefa_total` column plays
    // no part.
    assert_eq!(ratings[1].country_code, "BET");
    assert_eq!(ratings[1].fifa_total, 3030.0);
    assert_close(ratings[1].coefficient, 10.0 * 0.3 + 3030.0 * 0.6, 1e-9);

    // GAM has four AFC periods; short series sum as-is, unpadded.
    assert_eq!(ratings[2].country_code, "GAM");
    assert_eq!(ratings[2].afc_total, 11.0);
    assert_close(ratings[2].coefficient, 11.0 * 0.1 + 2715.0 * 0.6, 1e-9);
}

#[test]
fn trailing_sum_takes_most_recent_periods() {
    let rows = parse_nations_csv(&read_fixture("nations.csv")).expect("fixture should parse");
    assert_eq!(trailing_sum(&rows[0].uefa, 5), 10.0);
    assert_eq!(trailing_sum(&rows[2].afc, 5), 11.0);
    // Mixed bare-year and season keys still order chronologically.
    assert_eq!(trailing_sum(&rows[2].afc, 2), 7.0);
}

#[test]
fn custom_weights_scale_components() {
    let rows = parse_nations_csv(&read_fixture("nations.csv")).expect("fixture should parse");
    let flat = RankingWeights {
        uefa: 1.0,
        afc: 1.0,
        fifa: 1.0,
    };
    let ratings = compute_nation_ratings(&rows, flat);
    assert_close(ratings[2].coefficient, 11.0 + 2715.0, 1e-9);
}

#[test]
fn default_weights_match_published_split() {
    let weights = RankingWeights::default();
    assert_eq!(weights.uefa, 0.3);
    assert_eq!(weights.afc, 0.1);
    assert_eq!(weights.fifa, 0.6);
}
