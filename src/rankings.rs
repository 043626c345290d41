use std::cmp::Ordering;

use serde::Serialize;

use crate::club_coefficient::{self, ClubRating};
use crate::dataset::{ClubRecord, NationRecord};
use crate::nation_coefficient::{self, NationRating, RankingWeights};

#[derive(Debug, Clone, Serialize)]
pub struct RankedNation {
    pub rank: u32,
    pub country: String,
    pub country_code: String,
    pub uefa_total: f64,
    pub afc_total: f64,
    pub fifa_total: f64,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedClub {
    pub rank: u32,
    pub team: String,
    pub team_code: String,
    pub country_code: String,
    pub season_values: Vec<(i32, f64)>,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RankingSnapshot {
    pub weights: RankingWeights,
    pub window_years: Vec<i32>,
    pub nations: Vec<RankedNation>,
    pub clubs: Vec<RankedClub>,
}

/// Rank positions are dense and 1-based; ties sort by identifier so the
/// output order is total and stable across runs.
pub fn rank_nations(mut ratings: Vec<NationRating>) -> Vec<RankedNation> {
    ratings.sort_by(|a, b| {
        b.coefficient
            .partial_cmp(&a.coefficient)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.country_code.cmp(&b.country_code))
    });
    ratings
        .into_iter()
        .enumerate()
        .map(|(idx, rating)| RankedNation {
            rank: idx as u32 + 1,
            country: rating.country,
            country_code: rating.country_code,
            uefa_total: rating.uefa_total,
            afc_total: rating.afc_total,
            fifa_total: rating.fifa_total,
            coefficient: rating.coefficient,
        })
        .collect()
}

pub fn rank_clubs(mut ratings: Vec<ClubRating>) -> Vec<RankedClub> {
    ratings.sort_by(|a, b| {
        b.coefficient
            .partial_cmp(&a.coefficient)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.team.cmp(&b.team))
    });
    ratings
        .into_iter()
        .enumerate()
        .map(|(idx, rating)| RankedClub {
            rank: idx as u32 + 1,
            team: rating.team,
            team_code: rating.team_code,
            country_code: rating.country_code,
            season_values: rating.season_values,
            coefficient: rating.coefficient,
        })
        .collect()
}

/// One full computation pass over immutable inputs. Re-running on the same
/// tables yields an identical snapshot, so callers refresh freely.
pub fn compute_snapshot(
    nations: &[NationRecord],
    clubs: &[ClubRecord],
    weights: RankingWeights,
) -> RankingSnapshot {
    RankingSnapshot {
        weights,
        window_years: club_coefficient::trailing_window_years(clubs),
        nations: rank_nations(nation_coefficient::compute_nation_ratings(nations, weights)),
        clubs: rank_clubs(club_coefficient::compute_club_ratings(clubs)),
    }
}
