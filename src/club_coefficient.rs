use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::{ClubRecord, GroupRound};

// Lower divisions earn less per point; tier 1 has weight 1.0.
const TIER_EXPONENT: f64 = -0.95;
// Relegation-round points are slightly discounted against the
// championship round of the same split season.
const CHAMPIONSHIP_GROUP_FACTOR: f64 = 1.0;
const RELEGATION_GROUP_FACTOR: f64 = 0.913;

const WINDOW_YEARS: usize = 5;

#[derive(Debug, Clone)]
pub struct ClubRating {
    pub team: String,
    pub team_code: String,
    pub country_code: String,
    /// One value per window year, ascending; years without a record are 0.
    pub season_values: Vec<(i32, f64)>,
    pub coefficient: f64,
}

pub fn tier_weight(tier: u32) -> f64 {
    f64::from(tier).powf(TIER_EXPONENT)
}

/// Single-season coefficient: mean of the league part and the group part,
/// each a points-per-game ratio scaled by the tier weight. A part with no
/// games (or no group round) contributes 0.
pub fn season_coefficient(rec: &ClubRecord) -> f64 {
    let weight = tier_weight(rec.league_tier);
    let league_part = if rec.league_games > 0.0 {
        rec.league_points / rec.league_games * weight
    } else {
        0.0
    };
    let group_part = match rec.group {
        GroupRound::None => 0.0,
        GroupRound::Championship | GroupRound::Relegation if rec.group_games <= 0.0 => 0.0,
        GroupRound::Championship => {
            rec.group_points / rec.group_games * weight * CHAMPIONSHIP_GROUP_FACTOR
        }
        GroupRound::Relegation => {
            rec.group_points / rec.group_games * weight * RELEGATION_GROUP_FACTOR
        }
    };
    (league_part + group_part) / 2.0
}

/// The most recent distinct years present anywhere in the club table,
/// ascending, capped at the window size. This is the dataset's notion of
/// "the last five seasons": a club missing one of them averages a 0 for it.
pub fn trailing_window_years(records: &[ClubRecord]) -> Vec<i32> {
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    let mut window: Vec<i32> = years.into_iter().rev().take(WINDOW_YEARS).collect();
    window.reverse();
    window
}

pub fn compute_club_ratings(records: &[ClubRecord]) -> Vec<ClubRating> {
    let window = trailing_window_years(records);

    let mut by_club: BTreeMap<&str, Vec<&ClubRecord>> = BTreeMap::new();
    for rec in records {
        by_club.entry(rec.team.as_str()).or_default().push(rec);
    }

    let mut out = Vec::with_capacity(by_club.len());
    for (team, recs) in by_club {
        let Some(latest) = recs.iter().max_by_key(|r| r.year) else {
            continue;
        };

        let mut season_values = Vec::with_capacity(window.len());
        let mut sum = 0.0;
        for year in &window {
            let value = recs
                .iter()
                .find(|r| r.year == *year)
                .map(|r| season_coefficient(r))
                .unwrap_or(0.0);
            sum += value;
            season_values.push((*year, value));
        }

        out.push(ClubRating {
            team: team.to_string(),
            team_code: latest.team_code.clone(),
            country_code: latest.country_code.clone(),
            season_values,
            coefficient: sum / window.len() as f64,
        });
    }
    out
}
