use crate::error::PrioritizerError;
use crate::types::feedback::FeedbackItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A normalized signal on the 0–100 scale.
pub type Score = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightKey {
    Votes,
    Importance,
    Alignment,
    Cost,
}

impl WeightKey {
    pub const ALL: [WeightKey; 4] = [Self::Votes, Self::Importance, Self::Alignment, Self::Cost];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Votes => "votes",
            Self::Importance => "importance",
            Self::Alignment => "alignment",
            Self::Cost => "cost",
        }
    }

    pub fn others(self) -> impl Iterator<Item = WeightKey> {
        Self::ALL.into_iter().filter(move |key| *key != self)
    }
}

impl fmt::Display for WeightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightKey {
    type Err = PrioritizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| PrioritizerError::unknown("weight key", s))
    }
}

/// Relative contribution of each signal to the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub votes: f64,
    pub importance: f64,
    pub alignment: f64,
    pub cost: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            votes: 0.30,
            importance: 0.25,
            alignment: 0.25,
            cost: 0.20,
        }
    }
}

impl ScoringWeights {
    pub fn new(votes: f64, importance: f64, alignment: f64, cost: f64) -> Self {
        Self {
            votes,
            importance,
            alignment,
            cost,
        }
    }

    pub fn get(&self, key: WeightKey) -> f64 {
        match key {
            WeightKey::Votes => self.votes,
            WeightKey::Importance => self.importance,
            WeightKey::Alignment => self.alignment,
            WeightKey::Cost => self.cost,
        }
    }

    pub fn set(&mut self, key: WeightKey, value: f64) {
        match key {
            WeightKey::Votes => self.votes = value,
            WeightKey::Importance => self.importance = value,
            WeightKey::Alignment => self.alignment = value,
            WeightKey::Cost => self.cost = value,
        }
    }

    pub fn sum(&self) -> f64 {
        WeightKey::ALL.into_iter().map(|key| self.get(key)).sum()
    }
}

/// The four normalized signals for one item or one averaged group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreCard {
    pub votes: Score,
    pub importance: Score,
    pub alignment: Score,
    pub cost: Score,
}

impl ScoreCard {
    pub fn new(votes: Score, importance: Score, alignment: Score, cost: Score) -> Self {
        Self {
            votes,
            importance,
            alignment,
            cost,
        }
    }

    pub fn get(&self, key: WeightKey) -> Score {
        match key {
            WeightKey::Votes => self.votes,
            WeightKey::Importance => self.importance,
            WeightKey::Alignment => self.alignment,
            WeightKey::Cost => self.cost,
        }
    }

    /// Weighted sum before rounding. Callers validate the weights.
    pub fn weighted_total(&self, weights: &ScoringWeights) -> f64 {
        WeightKey::ALL
            .into_iter()
            .map(|key| weights.get(key) * self.get(key))
            .sum()
    }

    pub fn contributions(&self, weights: &ScoringWeights) -> ScoreCard {
        ScoreCard::new(
            weights.votes * self.votes,
            weights.importance * self.importance,
            weights.alignment * self.alignment,
            weights.cost * self.cost,
        )
    }
}

/// One feedback item after scoring.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredItem {
    pub item: FeedbackItem,
    pub net_votes: i64,
    pub signals: ScoreCard,
    /// Weighted points each signal added to the composite.
    pub breakdown: ScoreCard,
    pub composite: u32,
    pub quick_win: bool,
}

/// Averaged signals for a feature cluster or an ad-hoc item set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedScore {
    pub composite: u32,
    pub votes: u32,
    pub importance: u32,
    pub alignment: u32,
    pub cost: u32,
    pub feedback_count: usize,
}
