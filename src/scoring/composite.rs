use crate::error::Result;
use crate::scoring::normalize::{
    alignment_score, cost_score, importance_score, VoteNormalization, VoteScale,
};
use crate::scoring::rank::is_quick_win;
use crate::scoring::weights;
use crate::types::feedback::FeedbackItem;
use crate::types::scoring::{ScoreCard, ScoredItem, ScoringWeights};
use crate::types::votes::{VoteTallies, VoteTally};

pub fn signals(item: &FeedbackItem, tally: &VoteTally, scale: &VoteScale) -> ScoreCard {
    ScoreCard::new(
        scale.score(tally.net()),
        importance_score(item.importance),
        alignment_score(item.business_alignment),
        cost_score(item.cost_estimate),
    )
}

/// Weighted sum of a score card, rounded onto 0–100. Fails on invalid weights
/// rather than silently renormalizing; see `weights::repair` for that.
pub fn composite(card: &ScoreCard, weights: &ScoringWeights) -> Result<u32> {
    weights::validate(weights)?;
    Ok(round_score(card.weighted_total(weights)))
}

pub(crate) fn round_score(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}

/// Scores one item on its own, with the fixed vote window.
pub fn score_item(
    item: &FeedbackItem,
    tally: &VoteTally,
    weights: &ScoringWeights,
) -> Result<ScoredItem> {
    score_item_with_scale(item, tally, weights, &VoteScale::default())
}

pub fn score_item_with_scale(
    item: &FeedbackItem,
    tally: &VoteTally,
    weights: &ScoringWeights,
    scale: &VoteScale,
) -> Result<ScoredItem> {
    let card = signals(item, tally, scale);
    let composite = composite(&card, weights)?;
    Ok(ScoredItem {
        item: item.clone(),
        net_votes: tally.net(),
        signals: card,
        breakdown: card.contributions(weights),
        composite,
        quick_win: is_quick_win(item),
    })
}

/// Scores a batch in input order. The vote window is resolved once over the
/// whole batch so dynamic normalization sees every item.
pub fn score_items(
    items: &[FeedbackItem],
    tallies: &VoteTallies,
    weights: &ScoringWeights,
    normalization: VoteNormalization,
) -> Result<Vec<ScoredItem>> {
    weights::validate(weights)?;
    let untallied = items
        .iter()
        .filter(|item| !tallies.contains(&item.id))
        .count();
    if untallied > 0 {
        tracing::warn!(untallied, "feedback without a vote tally scored as zero net votes");
    }
    let scale = normalization.resolve(items.iter().map(|item| tallies.get(&item.id).net()));
    tracing::debug!(
        items = items.len(),
        half_range = scale.half_range(),
        ?normalization,
        "scoring feedback batch"
    );

    items
        .iter()
        .map(|item| score_item_with_scale(item, &tallies.get(&item.id), weights, &scale))
        .collect()
}
