use serde::Serialize;

pub const DEFAULT_EXCLUDE_MARKERS: &[&str] = &["West", "East"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub competitor_a: String,
    pub score_a: i32,
    pub competitor_b: String,
    pub score_b: i32,
}

impl MatchRecord {
    pub fn new(competitor_a: &str, score_a: i32, competitor_b: &str, score_b: i32) -> Self {
        Self {
            competitor_a: competitor_a.to_string(),
            score_a,
            competitor_b: competitor_b.to_string(),
            score_b,
        }
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_scores(self.score_a, self.score_b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Outcome {
    pub fn from_scores(own: i32, other: i32) -> Self {
        if own > other {
            Outcome::Win
        } else if own < other {
            Outcome::Lose
        } else {
            Outcome::Draw
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Lose => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Outcome::Win => 'w',
            Outcome::Lose => 'l',
            Outcome::Draw => 'd',
        }
    }
}

// Regional/sub-federation name markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRule {
    markers: Vec<String>,
}

impl ExclusionRule {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(Into::into)
                .filter(|m: &String| !m.is_empty())
                .collect(),
        }
    }

    pub fn none() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn excludes_name(&self, name: &str) -> bool {
        self.markers.iter().any(|m| name.contains(m.as_str()))
    }

    pub fn excludes(&self, record: &MatchRecord) -> bool {
        self.excludes_name(&record.competitor_a) || self.excludes_name(&record.competitor_b)
    }
}

impl Default for ExclusionRule {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDE_MARKERS.iter().copied())
    }
}
