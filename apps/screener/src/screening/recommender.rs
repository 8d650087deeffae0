//! Recommender stage: weighted final score, stable ranking, top-K shortlist.
//!
//! `final = 0.2 * recruiter + 0.5 * match + 0.3 * hr`, rounded to two decimals.
//! Soft skills and red flags already shape `hr_score`, so they are not
//! counted a second time here.

use serde::{Deserialize, Serialize};

use crate::models::record::{HrRecord, Recommendation};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingWeights {
    pub recruiter: f64,
    pub analyst: f64,
    pub hr: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            recruiter: 0.2,
            analyst: 0.5,
            hr: 0.3,
        }
    }
}

pub fn compute_final_score(
    recruiter_score: u8,
    match_score: f64,
    hr_score: u8,
    weights: &RankingWeights,
) -> f64 {
    let raw = weights.recruiter * recruiter_score as f64
        + weights.analyst * match_score
        + weights.hr * hr_score as f64;
    ((raw * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

pub fn generate_recommendation(score: f64) -> String {
    if score >= 80.0 {
        "Highly recommended for interview."
    } else if score >= 60.0 {
        "Recommended, meets most expectations."
    } else if score >= 40.0 {
        "May be considered with reservations."
    } else {
        "Not recommended for this role."
    }
    .to_string()
}

pub fn recommend(record: HrRecord, weights: &RankingWeights) -> Recommendation {
    let score = compute_final_score(
        record.recruiter().recruiter_score,
        record.analyst.match_score,
        record.hr_score,
        weights,
    );
    Recommendation {
        hr: record,
        recommendation_score: score,
        recommendation_feedback: Some(generate_recommendation(score)),
    }
}

/// Scores every record and sorts descending by final score. The sort is stable,
/// so equal scores keep their input order.
pub fn rank(records: Vec<HrRecord>, weights: &RankingWeights) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = records
        .into_iter()
        .map(|r| recommend(r, weights))
        .collect();
    ranked.sort_by(|a, b| b.recommendation_score.total_cmp(&a.recommendation_score));
    ranked
}

/// The first `k` entries of an already ranked list.
pub fn shortlist(ranked: &[Recommendation], k: usize) -> Vec<Recommendation> {
    ranked.iter().take(k).cloned().collect()
}
