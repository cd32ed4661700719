use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use fifa_h2h::config::{self, AppConfig};
use fifa_h2h::tally::OutcomeCounts;
use fifa_h2h::{Prediction, aggregate_with, dataset, predict_with};

const VALUE_FLAGS: &[&str] = &["--csv", "--holdout", "--columns"];

#[derive(Debug, Serialize)]
struct PredictOutput<'a> {
    team_a: &'a str,
    team_b: &'a str,
    prediction: Prediction,
    head_to_head: Option<OutcomeCounts>,
}

fn main() -> Result<()> {
    let mut cfg = AppConfig::load()?;
    let args = config::cli_args();
    let names = config::positional_args(&args, VALUE_FLAGS);
    let [team_a, team_b] = names[..] else {
        return Err(anyhow!(
            "usage: predict_match [--csv PATH] [--json] TEAM_A TEAM_B"
        ));
    };
    // Predicting a future fixture uses the whole history unless a holdout is asked for.
    if config::arg_value(&args, "--holdout").is_none() {
        cfg.holdout = 0;
    }

    let rows = dataset::load_matches(&cfg.matches_csv, &cfg.layout)?;
    let tallies = aggregate_with(&rows, cfg.holdout, &cfg.exclusion);
    eprintln!(
        "[INFO] {} teams, {} pairings from {} rows ({} excluded)",
        tallies.teams.len(),
        tallies.pairs.len(),
        tallies.processed,
        tallies.excluded
    );

    let Some(prediction) = predict_with(
        team_a,
        team_b,
        &tallies.pairs,
        &tallies.teams,
        &cfg.smoothing,
    ) else {
        for name in [team_a, team_b] {
            if !tallies.teams.contains(name) {
                eprintln!("[WARN] unknown team: {name}");
            }
        }
        return Err(anyhow!("cannot predict {team_a} vs {team_b}"));
    };

    if config::has_flag(&args, "--json") {
        let out = PredictOutput {
            team_a,
            team_b,
            prediction,
            head_to_head: tallies.pairs.between(team_a, team_b),
        };
        let json = serde_json::to_string_pretty(&out).context("serialize prediction")?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", prediction.label.as_char());
    println!("Ratio: {:.4}", prediction.ratio);
    Ok(())
}
