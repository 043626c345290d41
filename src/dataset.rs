use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use thiserror::Error;

pub const NATIONS_CSV_ENV: &str = "RANKING_NATIONS_CSV";
pub const CLUBS_CSV_ENV: &str = "RANKING_CLUBS_CSV";

const DEFAULT_NATIONS_PATH: &str = "data/nations.csv";
const DEFAULT_CLUBS_PATH: &str = "data/clubs.csv";

pub const SAMPLE_NATIONS_CSV: &str = include_str!("../data/nations.csv");
pub const SAMPLE_CLUBS_CSV: &str = include_str!("../data/clubs.csv");

/// Time key of one observation column. Sources mix all three forms: UEFA
/// uses season pairs, AFC started with bare years and switched to season
/// pairs, FIFA publishes dated releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKey {
    Year(i32),
    Season { start: i32 },
    Date(NaiveDate),
}

impl PeriodKey {
    /// Chronological ordinal (yyyymmdd). Bare years anchor at Jan 1,
    /// season pairs at Jul 1 of the start year, so a mixed series still
    /// orders sensibly.
    pub fn sort_key(self) -> i64 {
        match self {
            PeriodKey::Year(year) => i64::from(year) * 10_000 + 101,
            PeriodKey::Season { start } => i64::from(start) * 10_000 + 701,
            PeriodKey::Date(date) => {
                i64::from(date.year()) * 10_000
                    + i64::from(date.month()) * 100
                    + i64::from(date.day())
            }
        }
    }

    pub fn label(self) -> String {
        match self {
            PeriodKey::Year(year) => year.to_string(),
            PeriodKey::Season { start } => season_label(start),
            PeriodKey::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PeriodValue {
    pub period: PeriodKey,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct NationRecord {
    pub country: String,
    pub country_code: String,
    pub uefa: Vec<PeriodValue>,
    pub afc: Vec<PeriodValue>,
    pub fifa: Vec<PeriodValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRound {
    None,
    Championship,
    Relegation,
}

#[derive(Debug, Clone)]
pub struct ClubRecord {
    pub country_code: String,
    pub team: String,
    pub team_code: String,
    pub season: String,
    pub year: i32,
    pub league_tier: u32,
    pub league_games: f64,
    pub league_points: f64,
    pub group: GroupRound,
    pub group_games: f64,
    pub group_points: f64,
}

#[derive(Debug, Error)]
pub enum MalformedInputError {
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("row {row}: empty `{column}`")]
    EmptyIdentifier { row: usize, column: &'static str },
    #[error("row {row}: year `{raw}` is not an integer")]
    BadYear { row: usize, raw: String },
    #[error("duplicate country_code `{0}`")]
    DuplicateNation(String),
    #[error("duplicate club season `{team}` / {year}")]
    DuplicateClubSeason { team: String, year: i32 },
}

#[derive(Debug, Error)]
pub enum InvalidRecordError {
    #[error("club `{team}` year {year}: league_tier {tier} must be >= 1")]
    NonPositiveTier { team: String, year: i32, tier: i64 },
    #[error("club `{team}` year {year}: negative {column} ({value})")]
    NegativeCount {
        team: String,
        year: i32,
        column: &'static str,
        value: f64,
    },
    #[error("club `{team}` year {year}: unknown group label `{raw}`")]
    UnknownGroup { team: String, year: i32, raw: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Malformed(#[from] MalformedInputError),
    #[error(transparent)]
    Invalid(#[from] InvalidRecordError),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub nations: Vec<NationRecord>,
    pub clubs: Vec<ClubRecord>,
    pub nations_source: String,
    pub clubs_source: String,
}

/// Load both tables, resolving each input as: explicit path, then the
/// `RANKING_*_CSV` env var, then `data/*.csv` if present, then the
/// embedded sample.
pub fn load_tables(
    nations_path: Option<&Path>,
    clubs_path: Option<&Path>,
) -> Result<LoadedTables, LoadError> {
    let (nations, nations_source) = match resolve_input(
        nations_path,
        NATIONS_CSV_ENV,
        DEFAULT_NATIONS_PATH,
    ) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            (parse_nations_csv(&raw)?, path.display().to_string())
        }
        None => (parse_nations_csv(SAMPLE_NATIONS_CSV)?, "embedded sample".to_string()),
    };
    let (clubs, clubs_source) = match resolve_input(clubs_path, CLUBS_CSV_ENV, DEFAULT_CLUBS_PATH) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            (parse_clubs_csv(&raw)?, path.display().to_string())
        }
        None => (parse_clubs_csv(SAMPLE_CLUBS_CSV)?, "embedded sample".to_string()),
    };
    Ok(LoadedTables {
        nations,
        clubs,
        nations_source,
        clubs_source,
    })
}

fn resolve_input(explicit: Option<&Path>, env_key: &str, default_path: &str) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(raw) = std::env::var(env_key) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    let default = Path::new(default_path);
    default.exists().then(|| default.to_path_buf())
}

#[derive(Debug, Clone, Copy)]
enum Source {
    Uefa,
    Afc,
    Fifa,
}

/// Parse the nation table. Observation columns are grouped per source by
/// their `uefa_`/`afc_`/`fifa_` prefix; a tagged column whose suffix is
/// not a recognizable period (e.g. `uefa_total`) is ignored, as is any
/// untagged non-identifier column.
pub fn parse_nations_csv(raw: &str) -> Result<Vec<NationRecord>, LoadError> {
    let raw = raw.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(raw.as_bytes());
    let headers = reader.headers()?.clone();

    let mut country_col = None;
    let mut code_col = None;
    let mut series_cols: Vec<(usize, Source, PeriodKey)> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        let name = header.trim();
        if name.eq_ignore_ascii_case("country") {
            country_col = Some(idx);
        } else if name.eq_ignore_ascii_case("country_code") {
            code_col = Some(idx);
        } else if let Some((source, period)) = parse_series_header(name) {
            series_cols.push((idx, source, period));
        }
    }
    let code_col = code_col.ok_or(MalformedInputError::MissingColumn("country_code"))?;

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = row_idx + 2;

        let code = cell(&record, Some(code_col));
        if code.is_empty() {
            return Err(MalformedInputError::EmptyIdentifier {
                row,
                column: "country_code",
            }
            .into());
        }
        if !seen.insert(code.to_string()) {
            return Err(MalformedInputError::DuplicateNation(code.to_string()).into());
        }

        let country_cell = cell(&record, country_col);
        let country = if country_cell.is_empty() {
            fallback_country_name(code)
        } else {
            country_cell.to_string()
        };

        let mut uefa = Vec::new();
        let mut afc = Vec::new();
        let mut fifa = Vec::new();
        for (idx, source, period) in &series_cols {
            let value = coerce_number(cell(&record, Some(*idx)));
            let pv = PeriodValue {
                period: *period,
                value,
            };
            match source {
                Source::Uefa => uefa.push(pv),
                Source::Afc => afc.push(pv),
                Source::Fifa => fifa.push(pv),
            }
        }
        uefa.sort_by_key(|pv| pv.period.sort_key());
        afc.sort_by_key(|pv| pv.period.sort_key());
        fifa.sort_by_key(|pv| pv.period.sort_key());

        out.push(NationRecord {
            country,
            country_code: code.to_string(),
            uefa,
            afc,
            fifa,
        });
    }
    Ok(out)
}

/// Parse the club table. `team` and `year` are required; every other
/// column falls back to a default when absent. Domain checks (positive
/// tier, non-negative counts, known group labels) reject the whole pass.
pub fn parse_clubs_csv(raw: &str) -> Result<Vec<ClubRecord>, LoadError> {
    let raw = raw.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(raw.as_bytes());
    let headers = reader.headers()?.clone();

    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let team_col = col("team").ok_or(MalformedInputError::MissingColumn("team"))?;
    let year_col = col("year").ok_or(MalformedInputError::MissingColumn("year"))?;
    let country_col = col("country_code");
    let team_code_col = col("team_code");
    let season_col = col("season");
    let tier_col = col("league_tier");
    let league_games_col = col("league_games");
    let league_points_col = col("league_points");
    let group_col = col("group");
    let group_games_col = col("group_games");
    let group_points_col = col("group_points");

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = row_idx + 2;

        let team = cell(&record, Some(team_col));
        if team.is_empty() {
            return Err(MalformedInputError::EmptyIdentifier {
                row,
                column: "team",
            }
            .into());
        }
        let year_raw = cell(&record, Some(year_col));
        let Ok(year) = year_raw.parse::<i32>() else {
            return Err(MalformedInputError::BadYear {
                row,
                raw: year_raw.to_string(),
            }
            .into());
        };
        if !seen.insert((team.to_string(), year)) {
            return Err(MalformedInputError::DuplicateClubSeason {
                team: team.to_string(),
                year,
            }
            .into());
        }

        // Tier is structure, not an observation: an empty or unparsable
        // cell coerces to 0 and then fails the domain check.
        let tier = parse_int_cell(cell(&record, tier_col)).unwrap_or(0);
        if tier < 1 {
            return Err(InvalidRecordError::NonPositiveTier {
                team: team.to_string(),
                year,
                tier,
            }
            .into());
        }

        let league_games = coerce_number(cell(&record, league_games_col));
        let league_points = coerce_number(cell(&record, league_points_col));
        let group_games = coerce_number(cell(&record, group_games_col));
        let group_points = coerce_number(cell(&record, group_points_col));
        for (column, value) in [
            ("league_games", league_games),
            ("league_points", league_points),
            ("group_games", group_games),
            ("group_points", group_points),
        ] {
            if value < 0.0 {
                return Err(InvalidRecordError::NegativeCount {
                    team: team.to_string(),
                    year,
                    column,
                    value,
                }
                .into());
            }
        }

        let group_raw = cell(&record, group_col);
        let Some(group) = parse_group_round(group_raw) else {
            return Err(InvalidRecordError::UnknownGroup {
                team: team.to_string(),
                year,
                raw: group_raw.to_string(),
            }
            .into());
        };

        let team_code_cell = cell(&record, team_code_col);
        let team_code = if team_code_cell.is_empty() {
            team.to_string()
        } else {
            team_code_cell.to_string()
        };
        let season_cell = cell(&record, season_col);
        let season = if season_cell.is_empty() {
            season_label(year)
        } else {
            season_cell.to_string()
        };

        out.push(ClubRecord {
            country_code: cell(&record, country_col).to_string(),
            team: team.to_string(),
            team_code,
            season,
            year,
            league_tier: tier as u32,
            league_games,
            league_points,
            group,
            group_games,
            group_points,
        });
    }
    Ok(out)
}

pub fn season_label(start: i32) -> String {
    format!("{}/{:02}", start, (start + 1).rem_euclid(100))
}

fn cell<'a>(record: &'a csv::StringRecord, idx: Option<usize>) -> &'a str {
    idx.and_then(|i| record.get(i)).unwrap_or("").trim()
}

fn parse_series_header(name: &str) -> Option<(Source, PeriodKey)> {
    let lower = name.to_ascii_lowercase();
    let (source, suffix) = if let Some(rest) = lower.strip_prefix("uefa_") {
        (Source::Uefa, rest)
    } else if let Some(rest) = lower.strip_prefix("afc_") {
        (Source::Afc, rest)
    } else if let Some(rest) = lower.strip_prefix("fifa_") {
        (Source::Fifa, rest)
    } else {
        return None;
    };
    parse_period_key(suffix).map(|period| (source, period))
}

fn parse_period_key(raw: &str) -> Option<PeriodKey> {
    let normalized = raw.trim().replace(['-', '/'], "_");
    let parts: Vec<&str> = normalized.split('_').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [year] => {
            let year = parse_year(year)?;
            Some(PeriodKey::Year(year))
        }
        [start, end] => {
            let start = parse_year(start)?;
            let end_num = end.parse::<i32>().ok()?;
            let matches_next = if end.len() == 2 {
                end_num == (start + 1).rem_euclid(100)
            } else {
                end_num == start + 1
            };
            matches_next.then_some(PeriodKey::Season { start })
        }
        [year, month, day] => {
            let year = parse_year(year)?;
            let month = month.parse::<u32>().ok()?;
            let day = day.parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(year, month, day).map(PeriodKey::Date)
        }
        _ => None,
    }
}

fn parse_year(raw: &str) -> Option<i32> {
    if raw.len() != 4 {
        return None;
    }
    raw.parse::<i32>().ok()
}

fn parse_group_round(raw: &str) -> Option<GroupRound> {
    let label = raw.trim().to_ascii_lowercase().replace('_', " ");
    match label.trim() {
        "" | "none" => Some(GroupRound::None),
        "championship" | "championship group" => Some(GroupRound::Championship),
        "relegation" | "relegation group" => Some(GroupRound::Relegation),
        _ => None,
    }
}

// Missing or non-numeric observation cells count as 0, mirroring how the
// source workbook is summed.
fn coerce_number(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}

fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == ',')
        .collect();
    let cleaned = cleaned.replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn parse_int_cell(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>().ok()
}

static COUNTRY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("UKR", "Ukraine"),
        ("RUS", "Russia"),
        ("AZE", "Azerbaijan"),
        ("UZB", "Uzbekistan"),
        ("ARM", "Armenia"),
        ("MDA", "Moldova"),
        ("LVA", "Latvia"),
        ("KAZ", "Kazakhstan"),
        ("GEO", "Georgia"),
        ("KGZ", "Kyrgyzstan"),
        ("EST", "Estonia"),
        ("LTU", "Lithuania"),
        ("BLR", "Belarus"),
        ("TKM", "Turkmenistan"),
        ("TJK", "Tajikistan"),
    ])
});

fn fallback_country_name(code: &str) -> String {
    COUNTRY_NAMES
        .get(code.to_ascii_uppercase().as_str())
        .map(|name| (*name).to_string())
        .unwrap_or_else(|| code.to_string())
}
