use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use csv::{Position, StringRecord};

use crate::matches::MatchRecord;

/// Zero-based column positions of the fields a match row is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub competitor_a: usize,
    pub score_a: usize,
    pub score_b: usize,
    pub competitor_b: usize,
}

impl Default for ColumnLayout {
    // date, stage, home name, home goals, away goals, away name, ...
    fn default() -> Self {
        Self {
            competitor_a: 2,
            score_a: 3,
            score_b: 4,
            competitor_b: 5,
        }
    }
}

impl ColumnLayout {
    // `a,score_a,score_b,b`
    pub fn parse(raw: &str) -> Result<Self> {
        let cols = raw
            .split([',', ';', ' '])
            .filter(|part| !part.trim().is_empty())
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .with_context(|| format!("bad column index {part:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        let [competitor_a, score_a, score_b, competitor_b] = cols[..] else {
            return Err(anyhow!(
                "expected 4 column indices (a,score_a,score_b,b), got {}",
                cols.len()
            ));
        };
        Ok(Self {
            competitor_a,
            score_a,
            score_b,
            competitor_b,
        })
    }
}

pub fn load_matches(path: &Path, layout: &ColumnLayout) -> Result<Vec<MatchRecord>> {
    let file = File::open(path).with_context(|| format!("open match file {}", path.display()))?;
    parse_matches(file, layout).with_context(|| format!("read match file {}", path.display()))
}

pub fn parse_matches<R: Read>(mut reader: R, layout: &ColumnLayout) -> Result<Vec<MatchRecord>> {
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .context("read match rows")?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw.as_slice());

    let mut out = Vec::new();
    for row in rdr.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                let line = line_of(&raw, err.position());
                return Err(err).with_context(|| format!("line {line}: malformed csv row"));
            }
        };
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let record = parse_row(&row, layout)
            .with_context(|| format!("line {}", line_of(&raw, row.position())))?;
        out.push(record);
    }
    Ok(out)
}

// csv positions point at the end of the previous record, before any empty lines the
// reader skipped, so step over line terminators to reach the row itself.
fn line_of(raw: &[u8], pos: Option<&Position>) -> u64 {
    let Some(pos) = pos else {
        return 0;
    };
    let start = usize::try_from(pos.byte()).unwrap_or(usize::MAX).min(raw.len());
    let skipped = raw[start..]
        .iter()
        .take_while(|b| matches!(b, b'\r' | b'\n'))
        .count();
    let newlines = raw[..start + skipped].iter().filter(|b| **b == b'\n').count();
    newlines as u64 + 1
}

fn parse_row(row: &StringRecord, layout: &ColumnLayout) -> Result<MatchRecord> {
    Ok(MatchRecord {
        competitor_a: cell(row, layout.competitor_a)?.to_string(),
        score_a: parse_score(cell(row, layout.score_a)?)?,
        competitor_b: cell(row, layout.competitor_b)?.to_string(),
        score_b: parse_score(cell(row, layout.score_b)?)?,
    })
}

fn cell(row: &StringRecord, idx: usize) -> Result<&str> {
    row.get(idx)
        .map(str::trim)
        .ok_or_else(|| anyhow!("missing column {idx} (row has {})", row.len()))
}

fn parse_score(raw: &str) -> Result<i32> {
    raw.parse::<i32>()
        .with_context(|| format!("score {raw:?} is not an integer"))
}
