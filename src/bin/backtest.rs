use anyhow::{Context, Result, anyhow};

use fifa_h2h::backtest::{self, BacktestReport, DrawPolicy};
use fifa_h2h::config::{self, AppConfig};
use fifa_h2h::dataset;

fn main() -> Result<()> {
    let cfg = AppConfig::load()?;
    let args = config::cli_args();
    let draws = if config::has_flag(&args, "--exclude-draws") {
        DrawPolicy::Exclude
    } else {
        DrawPolicy::Miss
    };

    let rows = dataset::load_matches(&cfg.matches_csv, &cfg.layout)?;
    if rows.is_empty() {
        return Err(anyhow!(
            "no match rows found in {}",
            cfg.matches_csv.display()
        ));
    }
    eprintln!(
        "[INFO] loaded {} rows from {}",
        rows.len(),
        cfg.matches_csv.display()
    );

    let report = backtest::evaluate_holdout(
        &rows,
        cfg.holdout,
        &cfg.exclusion,
        &cfg.smoothing,
        draws,
    );
    if report.training_excluded > 0 {
        eprintln!(
            "[INFO] excluded {} regional rows from training",
            report.training_excluded
        );
    }
    if report.unknown > 0 {
        eprintln!(
            "[WARN] {} holdout rows skipped: team has no training history",
            report.unknown
        );
    }

    if config::has_flag(&args, "--json") {
        let json = serde_json::to_string_pretty(&report).context("serialize backtest report")?;
        println!("{json}");
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &BacktestReport) {
    for miss in &report.misses {
        println!(
            "Prediction: {}, Actual: {}, Ratio: {:.4}, Team 1: {}, Team 2: {}, Goals: {}:{}.",
            miss.predicted.as_char(),
            miss.actual.as_char(),
            miss.ratio,
            miss.team_a,
            miss.team_b,
            miss.score_a,
            miss.score_b
        );
    }
    println!(
        "Holdout: {} (evaluated {}, unknown {}, draws excluded {})",
        report.holdout, report.evaluated, report.unknown, report.draws_excluded
    );
    match report.accuracy() {
        Some(acc) => println!("Accuracy: {acc:.4}"),
        None => println!("Accuracy: n/a"),
    }
}
