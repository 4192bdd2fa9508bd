use crate::analytics::{Overview, Patterns};
use crate::scoring::aggregate::RankedFeature;
use crate::scoring::normalize::VoteNormalization;
use crate::types::scoring::{ScoredItem, ScoringWeights};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub generator: String,
    pub generated_at: String,
    pub snapshot_digest: String,
}

impl ReportMeta {
    pub fn new(snapshot_digest: impl Into<String>) -> Self {
        Self {
            generator: format!("prioritizer {}", env!("CARGO_PKG_VERSION")),
            generated_at: Utc::now().to_rfc3339(),
            snapshot_digest: snapshot_digest.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub meta: ReportMeta,
    pub weights: ScoringWeights,
    pub vote_normalization: VoteNormalization,
    pub total_items: usize,
    pub ranked: Vec<ScoredItem>,
    pub quick_wins: Vec<ScoredItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickWinReport {
    pub meta: ReportMeta,
    pub weights: ScoringWeights,
    pub items: Vec<ScoredItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureReport {
    pub meta: ReportMeta,
    pub weights: ScoringWeights,
    pub features: Vec<RankedFeature>,
    pub unlinked_items: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub meta: ReportMeta,
    pub overview: Overview,
    pub patterns: Patterns,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    Ranking(RankingReport),
    QuickWins(QuickWinReport),
    Features(FeatureReport),
    Stats(StatsReport),
}
