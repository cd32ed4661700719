use serde::Serialize;

use crate::matches::{ExclusionRule, MatchRecord, Outcome};
use crate::predict::{Label, SmoothingParams, predict_with};
use crate::tally::aggregate_with;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawPolicy {
    #[default]
    Miss,
    Exclude,
}

#[derive(Debug, Clone, Serialize)]
pub struct Miss {
    pub team_a: String,
    pub team_b: String,
    pub score_a: i32,
    pub score_b: i32,
    pub predicted: Label,
    pub actual: Outcome,
    pub ratio: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BacktestReport {
    pub holdout: usize,
    pub training_rows: usize,
    pub training_excluded: usize,
    pub evaluated: usize,
    pub correct: usize,
    pub unknown: usize,
    pub draws_excluded: usize,
    pub misses: Vec<Miss>,
}

impl BacktestReport {
    pub fn accuracy(&self) -> Option<f64> {
        if self.evaluated == 0 {
            return None;
        }
        Some(self.correct as f64 / self.evaluated as f64)
    }
}

// Holdout matches are called from their first-listed side.
pub fn evaluate_holdout(
    matches: &[MatchRecord],
    holdout: usize,
    rule: &ExclusionRule,
    params: &SmoothingParams,
    draws: DrawPolicy,
) -> BacktestReport {
    let tallies = aggregate_with(matches, holdout, rule);
    let start = matches.len().saturating_sub(holdout);

    let mut report = BacktestReport {
        holdout: matches.len() - start,
        training_rows: tallies.processed,
        training_excluded: tallies.excluded,
        ..BacktestReport::default()
    };

    for m in &matches[start..] {
        let Some(pred) = predict_with(
            &m.competitor_a,
            &m.competitor_b,
            &tallies.pairs,
            &tallies.teams,
            params,
        ) else {
            report.unknown += 1;
            continue;
        };

        let actual = m.outcome();
        if actual == Outcome::Draw && draws == DrawPolicy::Exclude {
            report.draws_excluded += 1;
            continue;
        }

        report.evaluated += 1;
        if label_matches(pred.label, actual) {
            report.correct += 1;
        } else {
            report.misses.push(Miss {
                team_a: m.competitor_a.clone(),
                team_b: m.competitor_b.clone(),
                score_a: m.score_a,
                score_b: m.score_b,
                predicted: pred.label,
                actual,
                ratio: pred.ratio,
            });
        }
    }

    report
}

fn label_matches(label: Label, actual: Outcome) -> bool {
    matches!(
        (label, actual),
        (Label::Win, Outcome::Win) | (Label::Lose, Outcome::Lose)
    )
}
