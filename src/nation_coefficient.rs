use serde::Serialize;

use crate::dataset::{NationRecord, PeriodValue};

// Fixed policy: continental coefficients matter less than the global
// ranking, and AFC campaigns least of all.
const UEFA_WEIGHT: f64 = 0.3;
const AFC_WEIGHT: f64 = 0.1;
const FIFA_WEIGHT: f64 = 0.6;

const TRAILING_PERIODS: usize = 5;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RankingWeights {
    pub uefa: f64,
    pub afc: f64,
    pub fifa: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            uefa: UEFA_WEIGHT,
            afc: AFC_WEIGHT,
            fifa: FIFA_WEIGHT,
        }
    }
}

impl RankingWeights {
    /// Defaults with per-source overrides from `RANKING_WEIGHT_UEFA`,
    /// `RANKING_WEIGHT_AFC` and `RANKING_WEIGHT_FIFA`.
    pub fn from_env() -> Self {
        let mut weights = Self::default();
        if let Some(value) = env_weight("RANKING_WEIGHT_UEFA") {
            weights.uefa = value;
        }
        if let Some(value) = env_weight("RANKING_WEIGHT_AFC") {
            weights.afc = value;
        }
        if let Some(value) = env_weight("RANKING_WEIGHT_FIFA") {
            weights.fifa = value;
        }
        weights
    }
}

fn env_weight(key: &str) -> Option<f64> {
    let raw = std::env::var(key).ok()?;
    let value = raw.trim().parse::<f64>().ok()?;
    (value >= 0.0).then_some(value)
}

#[derive(Debug, Clone)]
pub struct NationRating {
    pub country: String,
    pub country_code: String,
    pub uefa_total: f64,
    pub afc_total: f64,
    pub fifa_total: f64,
    pub coefficient: f64,
}

/// Sum of the most recent `periods` observations of one source. A shorter
/// series sums what exists; missing periods are never padded here, unlike
/// the club window.
pub fn trailing_sum(series: &[PeriodValue], periods: usize) -> f64 {
    let mut ordered: Vec<PeriodValue> = series.to_vec();
    ordered.sort_by_key(|pv| std::cmp::Reverse(pv.period.sort_key()));
    ordered.iter().take(periods).map(|pv| pv.value).sum()
}

pub fn compute_nation_ratings(
    records: &[NationRecord],
    weights: RankingWeights,
) -> Vec<NationRating> {
    records
        .iter()
        .map(|rec| {
            let uefa_total = trailing_sum(&rec.uefa, TRAILING_PERIODS);
            let afc_total = trailing_sum(&rec.afc, TRAILING_PERIODS);
            let fifa_total = trailing_sum(&rec.fifa, TRAILING_PERIODS);
            NationRating {
                country: rec.country.clone(),
                country_code: rec.country_code.clone(),
                uefa_total,
                afc_total,
                fifa_total,
                coefficient: uefa_total * weights.uefa
                    + afc_total * weights.afc
                    + fifa_total * weights.fifa,
            }
        })
        .collect()
}
