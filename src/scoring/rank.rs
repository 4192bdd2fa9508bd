use crate::error::Result;
use crate::scoring::composite::score_items;
use crate::scoring::normalize::{alignment_score, cost_score, importance_score, VoteNormalization};
use crate::types::feedback::FeedbackItem;
use crate::types::scoring::{ScoredItem, ScoringWeights};
use crate::types::votes::VoteTallies;

pub const QUICK_WIN_MIN_COST_SCORE: f64 = 66.0;
pub const QUICK_WIN_MIN_IMPORTANCE_SCORE: f64 = 75.0;
pub const QUICK_WIN_MIN_ALIGNMENT_SCORE: f64 = 80.0;

/// Cheap to build and either important or well aligned. Independent of votes
/// and of the composite score.
pub fn is_quick_win(item: &FeedbackItem) -> bool {
    cost_score(item.cost_estimate) >= QUICK_WIN_MIN_COST_SCORE
        && (importance_score(item.importance) >= QUICK_WIN_MIN_IMPORTANCE_SCORE
            || alignment_score(item.business_alignment) >= QUICK_WIN_MIN_ALIGNMENT_SCORE)
}

/// Highest composite first. The sort is stable, so equal scores keep their
/// input order.
pub fn rank_by_composite<T, F>(entries: &mut [T], composite: F)
where
    F: Fn(&T) -> u32,
{
    entries.sort_by(|a, b| composite(b).cmp(&composite(a)));
}

pub fn rank_items(mut scored: Vec<ScoredItem>) -> Vec<ScoredItem> {
    rank_by_composite(&mut scored, |entry| entry.composite);
    scored
}

/// Scores and ranks a batch in one step.
pub fn prioritize(
    items: &[FeedbackItem],
    tallies: &VoteTallies,
    weights: &ScoringWeights,
    normalization: VoteNormalization,
) -> Result<Vec<ScoredItem>> {
    let scored = score_items(items, tallies, weights, normalization)?;
    Ok(rank_items(scored))
}

/// Quick wins in ranked order, at most `limit` of them.
pub fn quick_wins(ranked: &[ScoredItem], limit: usize) -> Vec<&ScoredItem> {
    ranked
        .iter()
        .filter(|entry| entry.quick_win)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::feedback::{BusinessAlignment, CostEstimate, Importance};
    use crate::types::votes::VoteTally;
    use chrono::{TimeZone, Utc};

    fn item(id: &str, importance: Importance, alignment: u8, cost: CostEstimate) -> FeedbackItem {
        let mut item = FeedbackItem::new(
            id,
            format!("feedback {id}"),
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        );
        item.importance = importance;
        item.business_alignment = BusinessAlignment::new(alignment).unwrap();
        item.cost_estimate = cost;
        item
    }

    #[test]
    fn cheap_and_important_is_a_quick_win() {
        assert!(is_quick_win(&item("a", Importance::High, 1, CostEstimate::Low)));
        assert!(is_quick_win(&item("b", Importance::Low, 4, CostEstimate::Medium)));
        assert!(!is_quick_win(&item("c", Importance::Medium, 3, CostEstimate::Low)));
        assert!(!is_quick_win(&item("d", Importance::Critical, 5, CostEstimate::High)));
    }

    #[test]
    fn very_high_cost_is_never_a_quick_win() {
        for importance in [
            Importance::Critical,
            Importance::High,
            Importance::Medium,
            Importance::Low,
        ] {
            for alignment in 1..=5 {
                assert!(!is_quick_win(&item(
                    "x",
                    importance,
                    alignment,
                    CostEstimate::VeryHigh
                )));
            }
        }
    }

    #[test]
    fn equal_composites_keep_input_order() {
        let mut entries = vec![("first", 40), ("second", 70), ("third", 40), ("fourth", 70)];
        rank_by_composite(&mut entries, |entry| entry.1);
        let order: Vec<_> = entries.iter().map(|entry| entry.0).collect();
        assert_eq!(order, vec!["second", "fourth", "first", "third"]);
    }

    #[test]
    fn identical_items_rank_in_input_order() {
        let items: Vec<_> = ["p", "q", "r"]
            .into_iter()
            .map(|id| item(id, Importance::Medium, 3, CostEstimate::Medium))
            .collect();
        let ranked = prioritize(
            &items,
            &VoteTallies::new(),
            &ScoringWeights::default(),
            VoteNormalization::Dynamic,
        )
        .expect("ranking should succeed");
        let ids: Vec<_> = ranked.iter().map(|entry| entry.item.id.as_str()).collect();
        assert_eq!(ids, vec!["p", "q", "r"]);
    }

    #[test]
    fn quick_wins_respect_rank_and_limit() {
        let items = vec![
            item("slow", Importance::Critical, 5, CostEstimate::VeryHigh),
            item("win-1", Importance::High, 2, CostEstimate::Low),
            item("win-2", Importance::Low, 5, CostEstimate::Medium),
            item("win-3", Importance::Critical, 1, CostEstimate::Low),
        ];
        let tallies: VoteTallies = [("win-2", VoteTally::new(9, 0))].into_iter().collect();
        let ranked = prioritize(
            &items,
            &tallies,
            &ScoringWeights::default(),
            VoteNormalization::Dynamic,
        )
        .expect("ranking should succeed");

        let wins = quick_wins(&ranked, 2);
        assert_eq!(wins.len(), 2);
        assert!(wins.iter().all(|entry| entry.quick_win));
        assert!(wins.iter().all(|entry| entry.item.id != "slow"));
        assert!(wins[0].composite >= wins[1].composite);
    }
}
