use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::matches::{ExclusionRule, MatchRecord, Outcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub win: u32,
    pub lose: u32,
    pub draw: u32,
}

impl OutcomeCounts {
    pub fn total(&self) -> u32 {
        self.win + self.lose + self.draw
    }

    pub fn not_lose(&self) -> u32 {
        self.win + self.draw
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.win += 1,
            Outcome::Lose => self.lose += 1,
            Outcome::Draw => self.draw += 1,
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            win: self.lose,
            lose: self.win,
            draw: self.draw,
        }
    }
}

// `first` sorts lower; pair counts are read from its side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn is_reference(&self, name: &str) -> bool {
        self.first == name
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.second)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamTally {
    counts: HashMap<String, OutcomeCounts>,
}

impl TeamTally {
    pub fn get(&self, name: &str) -> Option<&OutcomeCounts> {
        self.counts.get(name)
    }

    pub fn insert(&mut self, name: &str, counts: OutcomeCounts) {
        self.counts.insert(name.to_string(), counts);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutcomeCounts)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn record(&mut self, name: &str, outcome: Outcome) {
        match self.counts.get_mut(name) {
            Some(counts) => counts.record(outcome),
            None => {
                let mut counts = OutcomeCounts::default();
                counts.record(outcome);
                self.counts.insert(name.to_string(), counts);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairTally {
    counts: HashMap<PairKey, OutcomeCounts>,
}

impl PairTally {
    pub fn get(&self, key: &PairKey) -> Option<&OutcomeCounts> {
        self.counts.get(key)
    }

    /// `counts` are from `key.first()`'s side.
    pub fn insert(&mut self, key: PairKey, counts: OutcomeCounts) {
        self.counts.insert(key, counts);
    }

    /// Head-to-head counts from `team`'s side against `opponent`.
    pub fn between(&self, team: &str, opponent: &str) -> Option<OutcomeCounts> {
        let key = PairKey::new(team, opponent);
        let counts = self.counts.get(&key)?;
        if key.is_reference(team) {
            Some(*counts)
        } else {
            Some(counts.reversed())
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &OutcomeCounts)> {
        self.counts.iter()
    }

    fn record(&mut self, key: PairKey, outcome: Outcome) {
        self.counts.entry(key).or_default().record(outcome);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tallies {
    pub teams: TeamTally,
    pub pairs: PairTally,
    pub processed: usize,
    // Subset of `processed` dropped by the exclusion rule.
    pub excluded: usize,
}

pub fn aggregate(matches: &[MatchRecord], excluded_tail_count: usize) -> Tallies {
    aggregate_with(matches, excluded_tail_count, &ExclusionRule::default())
}

pub fn aggregate_with(
    matches: &[MatchRecord],
    excluded_tail_count: usize,
    rule: &ExclusionRule,
) -> Tallies {
    let end = matches.len().saturating_sub(excluded_tail_count);
    let mut out = Tallies::default();

    for m in &matches[..end] {
        out.processed += 1;
        if rule.excludes(m) {
            out.excluded += 1;
            continue;
        }

        let outcome_a = m.outcome();
        out.teams.record(&m.competitor_a, outcome_a);
        out.teams.record(&m.competitor_b, outcome_a.reversed());

        let key = PairKey::new(&m.competitor_a, &m.competitor_b);
        let pair_outcome = if key.is_reference(&m.competitor_a) {
            outcome_a
        } else {
            outcome_a.reversed()
        };
        out.pairs.record(key, pair_outcome);
    }

    out
}
