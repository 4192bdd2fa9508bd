//! Maps raw item attributes onto the shared 0–100 scale.

use crate::types::feedback::{BusinessAlignment, CostEstimate, Importance};
use crate::types::scoring::Score;
use serde::Serialize;

pub const DEFAULT_FIXED_VOTE_WINDOW: u32 = 10;

pub fn importance_score(importance: Importance) -> Score {
    match importance {
        Importance::Critical => 100.0,
        Importance::High => 75.0,
        Importance::Medium => 50.0,
        Importance::Low => 25.0,
    }
}

/// Inverted: the cheaper the work, the higher the score.
pub fn cost_score(cost: CostEstimate) -> Score {
    match cost {
        CostEstimate::Low => 100.0,
        CostEstimate::Medium => 66.0,
        CostEstimate::High => 33.0,
        CostEstimate::VeryHigh => 0.0,
    }
}

pub fn alignment_score(alignment: BusinessAlignment) -> Score {
    f64::from(alignment.value()) * 100.0 / f64::from(BusinessAlignment::MAX)
}

/// How net votes are stretched onto 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "strategy")]
pub enum VoteNormalization {
    /// Net votes on `[-window, +window]`, clamped outside. Comparable across
    /// independent item sets.
    Fixed { window: u32 },
    /// Net votes on `[-max, +max]` where `max` is the largest absolute net in
    /// the set being ranked (at least 1).
    Dynamic,
}

impl VoteNormalization {
    pub fn fixed() -> Self {
        Self::Fixed {
            window: DEFAULT_FIXED_VOTE_WINDOW,
        }
    }

    pub fn resolve<I>(&self, net_votes: I) -> VoteScale
    where
        I: IntoIterator<Item = i64>,
    {
        match *self {
            Self::Fixed { window } => VoteScale::fixed(window),
            Self::Dynamic => VoteScale::dynamic(net_votes),
        }
    }
}

impl Default for VoteNormalization {
    fn default() -> Self {
        Self::fixed()
    }
}

/// A resolved symmetric window for vote normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteScale {
    half_range: u64,
}

impl VoteScale {
    pub fn fixed(window: u32) -> Self {
        Self {
            half_range: u64::from(window.max(1)),
        }
    }

    pub fn dynamic<I>(net_votes: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let max_abs = net_votes
            .into_iter()
            .map(i64::unsigned_abs)
            .max()
            .unwrap_or(0)
            .max(1);
        Self {
            half_range: max_abs,
        }
    }

    pub fn half_range(&self) -> u64 {
        self.half_range
    }

    pub fn score(&self, net_votes: i64) -> Score {
        self.score_mean(net_votes as f64)
    }

    /// Same mapping for a fractional net, such as a group's mean.
    pub fn score_mean(&self, net_votes: f64) -> Score {
        let range = self.half_range as f64;
        ((net_votes + range) / (2.0 * range) * 100.0).clamp(0.0, 100.0)
    }
}

impl Default for VoteScale {
    fn default() -> Self {
        Self::fixed(DEFAULT_FIXED_VOTE_WINDOW)
    }
}
