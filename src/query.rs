use crate::scoring::rank::is_quick_win;
use crate::types::feedback::{CostEstimate, FeedbackItem, Importance, Theme};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
    /// Critical first.
    Importance,
    /// Best aligned first.
    Alignment,
    /// Cheapest first.
    Cost,
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackFilter {
    pub theme: Option<Theme>,
    pub importance: Option<Importance>,
    pub cost: Option<CostEstimate>,
    pub quick_wins_only: bool,
    pub search: Option<String>,
}

impl FeedbackFilter {
    pub fn matches(&self, item: &FeedbackItem) -> bool {
        if self.quick_wins_only && !is_quick_win(item) {
            return false;
        }
        if self.theme.is_some_and(|theme| item.theme != theme) {
            return false;
        }
        if self
            .importance
            .is_some_and(|importance| item.importance != importance)
        {
            return false;
        }
        if self.cost.is_some_and(|cost| item.cost_estimate != cost) {
            return false;
        }
        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return item
                .content
                .to_lowercase()
                .contains(&needle.to_lowercase());
        }
        true
    }
}

/// Filtered items in the requested order. Sorting is stable.
pub fn select<'a>(
    items: &'a [FeedbackItem],
    filter: &FeedbackFilter,
    order: SortOrder,
) -> Vec<&'a FeedbackItem> {
    let mut selected: Vec<&FeedbackItem> = items.iter().filter(|item| filter.matches(item)).collect();
    match order {
        SortOrder::NewestFirst => selected.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::OldestFirst => selected.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Importance => selected.sort_by_key(|item| item.importance),
        SortOrder::Alignment => {
            selected.sort_by(|a, b| b.business_alignment.cmp(&a.business_alignment))
        }
        SortOrder::Cost => selected.sort_by_key(|item| item.cost_estimate),
    }
    selected
}
