//! Feature cluster scoring: averaged signals over the items linked to a feature.

use crate::error::Result;
use crate::scoring::composite::{composite, round_score};
use crate::scoring::normalize::{alignment_score, cost_score, importance_score, VoteScale};
use crate::scoring::rank::rank_by_composite;
use crate::types::feature::Feature;
use crate::types::feedback::FeedbackItem;
use crate::types::scoring::{AggregatedScore, ScoreCard, ScoringWeights};
use crate::types::votes::VoteTallies;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct RankedFeature {
    pub feature: Feature,
    pub score: AggregatedScore,
}

/// Linked items by feature id, each group in input order. Unlinked items are
/// left out.
pub fn group_by_feature(items: &[FeedbackItem]) -> BTreeMap<&str, Vec<&FeedbackItem>> {
    let mut groups: BTreeMap<&str, Vec<&FeedbackItem>> = BTreeMap::new();
    for item in items {
        if let Some(feature_id) = item.feature_id.as_deref() {
            groups.entry(feature_id).or_default().push(item);
        }
    }
    groups
}

pub fn unlinked(items: &[FeedbackItem]) -> Vec<&FeedbackItem> {
    items.iter().filter(|item| !item.is_linked()).collect()
}

/// Averages over the fixed vote window so scores compare across features.
pub fn aggregate(
    items: &[&FeedbackItem],
    tallies: &VoteTallies,
    weights: &ScoringWeights,
) -> Result<AggregatedScore> {
    aggregate_with_scale(items, tallies, weights, &VoteScale::default())
}

pub fn aggregate_with_scale(
    items: &[&FeedbackItem],
    tallies: &VoteTallies,
    weights: &ScoringWeights,
    scale: &VoteScale,
) -> Result<AggregatedScore> {
    if items.is_empty() {
        return Ok(AggregatedScore::default());
    }

    // Raw net votes are averaged, then mapped through the window once.
    let mut net_total = 0i64;
    let mut totals = ScoreCard::default();
    for item in items {
        net_total = net_total.saturating_add(tallies.get(&item.id).net());
        totals.importance += importance_score(item.importance);
        totals.alignment += alignment_score(item.business_alignment);
        totals.cost += cost_score(item.cost_estimate);
    }

    let count = items.len() as f64;
    let average = ScoreCard::new(
        scale.score_mean(net_total as f64 / count),
        totals.importance / count,
        totals.alignment / count,
        totals.cost / count,
    );

    Ok(AggregatedScore {
        composite: composite(&average, weights)?,
        votes: round_score(average.votes),
        importance: round_score(average.importance),
        alignment: round_score(average.alignment),
        cost: round_score(average.cost),
        feedback_count: items.len(),
    })
}

/// Scores every feature against its linked items and ranks them, highest
/// composite first. Features with nothing linked score zero.
pub fn rank_features(
    features: &[Feature],
    items: &[FeedbackItem],
    tallies: &VoteTallies,
    weights: &ScoringWeights,
    scale: &VoteScale,
) -> Result<Vec<RankedFeature>> {
    let groups = group_by_feature(items);
    let mut ranked = features
        .iter()
        .map(|feature| {
            let linked = groups
                .get(feature.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            Ok(RankedFeature {
                feature: feature.clone(),
                score: aggregate_with_scale(linked, tallies, weights, scale)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        features = ranked.len(),
        unlinked = unlinked(items).len(),
        "aggregated feature clusters"
    );
    rank_by_composite(&mut ranked, |entry| entry.score.composite);
    Ok(ranked)
}
