use anyhow::{Result, anyhow};
use serde::Serialize;

use crate::tally::{OutcomeCounts, PairKey, PairTally, TeamTally};

pub const DEFAULT_MARGINAL_PRIOR: f64 = 1.0;
pub const DEFAULT_HEAD_TO_HEAD_PRIOR: f64 = 3.0;

// Both priors are finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    marginal_prior: f64,
    head_to_head_prior: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            marginal_prior: DEFAULT_MARGINAL_PRIOR,
            head_to_head_prior: DEFAULT_HEAD_TO_HEAD_PRIOR,
        }
    }
}

impl SmoothingParams {
    pub fn new(marginal_prior: f64, head_to_head_prior: f64) -> Result<Self> {
        if !(marginal_prior.is_finite() && marginal_prior > 0.0) {
            return Err(anyhow!(
                "marginal prior must be positive, got {marginal_prior}"
            ));
        }
        if !(head_to_head_prior.is_finite() && head_to_head_prior > 0.0) {
            return Err(anyhow!(
                "head-to-head prior must be positive, got {head_to_head_prior}"
            ));
        }
        Ok(Self {
            marginal_prior,
            head_to_head_prior,
        })
    }

    pub fn marginal_prior(&self) -> f64 {
        self.marginal_prior
    }

    pub fn head_to_head_prior(&self) -> f64 {
        self.head_to_head_prior
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Win,
    Lose,
}

impl Label {
    pub fn as_char(self) -> char {
        match self {
            Label::Win => 'w',
            Label::Lose => 'l',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Label,
    pub ratio: f64,
}

pub fn not_lose_probability(counts: &OutcomeCounts, params: &SmoothingParams) -> f64 {
    let not_lose = counts.not_lose() as f64;
    let total = counts.total() as f64;
    (not_lose + params.marginal_prior) / (total + 2.0 * params.marginal_prior)
}

pub fn predict(
    team_a: &str,
    team_b: &str,
    pair_tally: &PairTally,
    team_tally: &TeamTally,
) -> Option<Prediction> {
    predict_with(
        team_a,
        team_b,
        pair_tally,
        team_tally,
        &SmoothingParams::default(),
    )
}

pub fn predict_with(
    team_a: &str,
    team_b: &str,
    pair_tally: &PairTally,
    team_tally: &TeamTally,
    params: &SmoothingParams,
) -> Option<Prediction> {
    let counts_a = team_tally.get(team_a)?;
    let counts_b = team_tally.get(team_b)?;

    let p_a = not_lose_probability(counts_a, params);
    let p_b = not_lose_probability(counts_b, params);

    let key = PairKey::new(team_a, team_b);
    let ratio = match pair_tally.get(&key) {
        Some(pair) => {
            // Pair counts are stored from the key's first side.
            let (ref_nl, other_nl) = (
                (pair.win + pair.draw) as f64 + params.head_to_head_prior,
                (pair.lose + pair.draw) as f64 + params.head_to_head_prior,
            );
            let (a_nl, b_nl) = if key.is_reference(team_a) {
                (ref_nl, other_nl)
            } else {
                (other_nl, ref_nl)
            };
            (a_nl * p_b) / (b_nl * p_a)
        }
        // No head-to-head history: marginals stand in for the pairwise likelihood.
        None => p_a / p_b,
    };

    let label = if ratio <= 1.0 { Label::Lose } else { Label::Win };
    Some(Prediction { label, ratio })
}
