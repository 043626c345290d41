use std::fs;
use std::path::PathBuf;

use exsoviet_ranking::dataset::{
    parse_clubs_csv, parse_nations_csv, GroupRound, InvalidRecordError, LoadError,
    MalformedInputError, PeriodKey,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_nations_fixture() {
    let raw = read_fixture("nations.csv");
    let rows = parse_nations_csv(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 3);

    let ala = &rows[0];
    assert_eq!(ala.country, "Alaland");
    assert_eq!(ala.country_code, "ALA");
    // Five season columns; the `uefa_total` column carries no period and
    // is ignored, the empty 2022/23 cell reads as zero.
    assert_eq!(ala.uefa.len(), 5);
    let values: Vec<f64> = ala.uefa.iter().map(|pv| pv.value).collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 0.0]);
    assert!(ala.afc.iter().all(|pv| pv.value == 0.0));

    let gam = &rows[2];
    assert_eq!(gam.country, "GAM");
    let afc_periods: Vec<PeriodKey> = gam.afc.iter().map(|pv| pv.period).collect();
    assert_eq!(
        afc_periods,
        vec![
            PeriodKey::Year(2018),
            PeriodKey::Year(2019),
            PeriodKey::Year(2021),
            PeriodKey::Season { start: 2022 },
        ]
    );
    let afc_values: Vec<f64> = gam.afc.iter().map(|pv| pv.value).collect();
    assert_eq!(afc_values, vec![1.5, 2.5, 3.0, 4.0]);
    assert_eq!(gam.fifa.len(), 3);
    assert_eq!(gam.fifa[0].value, 900.0);
}

#[test]
fn known_code_gets_country_name() {
    let raw = "country,country_code,uefa_2018_19\n,UKR,1.0";
    let rows = parse_nations_csv(raw).expect("row should parse");
    assert_eq!(rows[0].country, "Ukraine");
}

#[test]
fn decorated_numbers_are_cleaned() {
    let raw = "country,country_code,fifa_2020_12_10\nBetaria,BET,\"1,234\"";
    let rows = parse_nations_csv(raw).expect("row should parse");
    assert_eq!(rows[0].fifa[0].value, 1234.0);
}

#[test]
fn parses_clubs_fixture() {
    let raw = read_fixture("clubs.csv");
    let rows = parse_clubs_csv(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 7);

    assert_eq!(rows[0].team, "Worked FC");
    assert_eq!(rows[0].team_code, "WRK");
    assert_eq!(rows[0].season, "2024/25");
    assert_eq!(rows[0].year, 2024);
    assert_eq!(rows[0].league_tier, 1);
    assert_eq!(rows[0].league_games, 30.0);
    assert_eq!(rows[0].league_points, 60.0);
    assert_eq!(rows[0].group, GroupRound::Championship);

    assert_eq!(rows[1].group, GroupRound::None);
    assert_eq!(rows[2].group, GroupRound::None);
    assert_eq!(rows[3].group, GroupRound::Relegation);
    assert_eq!(rows[5].league_tier, 2);
}

#[test]
fn club_defaults_fill_missing_columns() {
    let raw = "country_code,team,year,league_tier,league_games,league_points,group,group_games,group_points\nUKR,Dnipro,2024,1,10,20,none,,";
    let rows = parse_clubs_csv(raw).expect("row should parse");
    assert_eq!(rows[0].team_code, "Dnipro");
    assert_eq!(rows[0].season, "2024/25");
}

#[test]
fn non_numeric_observation_reads_as_zero() {
    let raw = "team,year,league_tier,league_games,league_points\nDnipro,2024,1,10,n/a";
    let rows = parse_clubs_csv(raw).expect("row should parse");
    assert_eq!(rows[0].league_points, 0.0);
}

#[test]
fn rejects_missing_nation_code_column() {
    let raw = "country,uefa_2018_19\nAlaland,1.0";
    let err = parse_nations_csv(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Malformed(MalformedInputError::MissingColumn("country_code"))
    ));
}

#[test]
fn rejects_empty_nation_code() {
    let raw = "country,country_code\nAlaland,";
    let err = parse_nations_csv(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Malformed(MalformedInputError::EmptyIdentifier {
            row: 2,
            column: "country_code",
        })
    ));
}

#[test]
fn rejects_duplicate_nation() {
    let raw = "country,country_code,uefa_2018_19\nAlaland,ALA,1.0\nAlastan,ALA,2.0";
    let err = parse_nations_csv(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Malformed(MalformedInputError::DuplicateNation(ref code)) if code == "ALA"
    ));
}

#[test]
fn rejects_missing_team_column() {
    let raw = "country_code,year\nUKR,2024";
    let err = parse_clubs_csv(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Malformed(MalformedInputError::MissingColumn("team"))
    ));
}

#[test]
fn rejects_unparsable_year() {
    let raw = "team,year\nDnipro,20x4";
    let err = parse_clubs_csv(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Malformed(MalformedInputError::BadYear { row: 2, .. })
    ));
}

#[test]
fn rejects_duplicate_club_season() {
    let raw = "team,year,league_tier\nDnipro,2024,1\nDnipro,2024,1";
    let err = parse_clubs_csv(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Malformed(MalformedInputError::DuplicateClubSeason { year: 2024, .. })
    ));
}

#[test]
fn rejects_missing_tier() {
    let raw = "team,year,league_tier\nDnipro,2024,";
    let err = parse_clubs_csv(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid(InvalidRecordError::NonPositiveTier { tier: 0, .. })
    ));
}

#[test]
fn rejects_negative_counts() {
    let raw = "team,year,league_tier,league_points\nDnipro,2024,1,-5";
    let err = parse_clubs_csv(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid(InvalidRecordError::NegativeCount {
            column: "league_points",
            ..
        })
    ));
}

#[test]
fn rejects_unknown_group_label() {
    let raw = "team,year,league_tier,group\nDnipro,2024,1,champinship";
    let err = parse_clubs_csv(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid(InvalidRecordError::UnknownGroup { ref raw, .. }) if raw == "champinship"
    ));
}
