//! Win/lose estimation from historical head-to-head results.

pub mod backtest;
pub mod config;
pub mod dataset;
pub mod matches;
pub mod predict;
pub mod tally;

pub use matches::{ExclusionRule, MatchRecord, Outcome};
pub use predict::{Label, Prediction, SmoothingParams, predict, predict_with};
pub use tally::{OutcomeCounts, PairKey, PairTally, Tallies, TeamTally, aggregate, aggregate_with};
