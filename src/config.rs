use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::dataset::ColumnLayout;
use crate::matches::ExclusionRule;
use crate::predict::{DEFAULT_HEAD_TO_HEAD_PRIOR, DEFAULT_MARGINAL_PRIOR, SmoothingParams};

pub const DEFAULT_MATCHES_CSV: &str = "raw_matches.csv";
pub const DEFAULT_HOLDOUT_MATCHES: usize = 10;
const MAX_HOLDOUT_MATCHES: usize = 100_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub matches_csv: PathBuf,
    pub holdout: usize,
    pub layout: ColumnLayout,
    pub exclusion: ExclusionRule,
    pub smoothing: SmoothingParams,
}

impl AppConfig {
    // Environment first (`.env.local`, then `.env`), then CLI flags on top.
    pub fn load() -> Result<Self> {
        load_dotenv();
        let mut cfg = Self::from_env()?;
        cfg.apply_args(&cli_args())?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        let matches_csv = env_string("MATCHES_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MATCHES_CSV));
        let holdout = env_parse::<usize>("HOLDOUT_MATCHES")?
            .unwrap_or(DEFAULT_HOLDOUT_MATCHES)
            .min(MAX_HOLDOUT_MATCHES);
        let layout = match env_string("MATCH_COLUMNS") {
            Some(raw) => ColumnLayout::parse(&raw).context("MATCH_COLUMNS")?,
            None => ColumnLayout::default(),
        };
        // Set-but-empty disables the regional filter.
        let exclusion = match std::env::var("EXCLUDE_MARKERS") {
            Ok(raw) => parse_markers(&raw),
            Err(_) => ExclusionRule::default(),
        };
        let smoothing = SmoothingParams::new(
            env_parse::<f64>("MARGINAL_PRIOR")?.unwrap_or(DEFAULT_MARGINAL_PRIOR),
            env_parse::<f64>("HEAD_TO_HEAD_PRIOR")?.unwrap_or(DEFAULT_HEAD_TO_HEAD_PRIOR),
        )
        .context("smoothing config")?;

        Ok(Self {
            matches_csv,
            holdout,
            layout,
            exclusion,
            smoothing,
        })
    }

    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        if let Some(path) = arg_value(args, "--csv") {
            self.matches_csv = PathBuf::from(path);
        }
        if let Some(raw) = arg_value(args, "--holdout") {
            self.holdout = raw
                .parse::<usize>()
                .with_context(|| format!("--holdout {raw:?}"))?
                .min(MAX_HOLDOUT_MATCHES);
        }
        if let Some(raw) = arg_value(args, "--columns") {
            self.layout = ColumnLayout::parse(raw).context("--columns")?;
        }
        Ok(())
    }
}

pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

pub fn cli_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

/// Value of `--name=value` or `--name value`.
pub fn arg_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim());
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

pub fn positional_args<'a>(args: &'a [String], value_flags: &[&str]) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with("--") {
            skip_next = value_flags.contains(&arg.as_str());
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

fn parse_markers(raw: &str) -> ExclusionRule {
    ExclusionRule::new(
        raw.split([',', ';'])
            .map(str::trim)
            .filter(|part| !part.is_empty()),
    )
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

// Unset or blank is `None`; set but unparseable is an error, same as the CLI flags.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(raw) = env_string(key) else {
        return Ok(None);
    };
    raw.parse::<T>()
        .map(Some)
        .with_context(|| format!("{key}={raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn arg_value_supports_both_forms() {
        let a = args(&["--csv=data.csv", "--holdout", "25"]);
        assert_eq!(arg_value(&a, "--csv"), Some("data.csv"));
        assert_eq!(arg_value(&a, "--holdout"), Some("25"));
        assert_eq!(arg_value(&a, "--columns"), None);
        assert!(!has_flag(&a, "--json"));
    }

    #[test]
    fn positional_args_skip_flag_values() {
        let a = args(&["--csv", "x.csv", "Brazil", "--json", "Germany"]);
        assert_eq!(positional_args(&a, &["--csv"]), vec!["Brazil", "Germany"]);
    }

    #[test]
    fn apply_args_overrides_fields() {
        let mut cfg = AppConfig {
            matches_csv: PathBuf::from(DEFAULT_MATCHES_CSV),
            holdout: DEFAULT_HOLDOUT_MATCHES,
            layout: ColumnLayout::default(),
            exclusion: ExclusionRule::default(),
            smoothing: SmoothingParams::default(),
        };
        let overrides = args(&["--csv", "other.csv", "--holdout=3", "--columns=0,1,2,3"]);
        cfg.apply_args(&overrides).unwrap();
        assert_eq!(cfg.matches_csv, PathBuf::from("other.csv"));
        assert_eq!(cfg.holdout, 3);
        assert_eq!(cfg.layout.competitor_b, 3);
        assert!(cfg.apply_args(&args(&["--holdout", "many"])).is_err());
    }

    #[test]
    fn env_parse_rejects_set_but_malformed_values() {
        // Keys are unique to this test so parallel tests never see them.
        let key = "FIFA_H2H_TEST_ENV_PARSE_BAD";
        unsafe { std::env::set_var(key, "many") };
        let err = env_parse::<usize>(key).unwrap_err();
        assert!(format!("{err:#}").contains("FIFA_H2H_TEST_ENV_PARSE_BAD"));

        unsafe { std::env::set_var(key, " 12 ") };
        assert_eq!(env_parse::<usize>(key).unwrap(), Some(12));

        unsafe { std::env::set_var(key, "  ") };
        assert_eq!(env_parse::<f64>(key).unwrap(), None);
        unsafe { std::env::remove_var(key) };

        assert_eq!(
            env_parse::<f64>("FIFA_H2H_TEST_ENV_PARSE_UNSET").unwrap(),
            None
        );
    }

    #[test]
    fn markers_split_on_separators() {
        let rule = parse_markers("West; East ,North");
        assert_eq!(rule.markers().len(), 3);
        assert!(parse_markers("").markers().is_empty());
    }
}
