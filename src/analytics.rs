use crate::scoring::rank::is_quick_win;
use crate::types::feedback::{FeedbackItem, Importance};
use serde::Serialize;
use std::collections::BTreeMap;

pub const THEME_LIMIT: usize = 6;
pub const PRODUCT_AREA_LIMIT: usize = 8;
pub const UNSPECIFIED: &str = "Unspecified";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total: usize,
    pub critical: usize,
    pub high_alignment: usize,
    pub quick_wins: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Patterns {
    pub themes: Vec<LabelCount>,
    pub personas: Vec<LabelCount>,
    pub product_areas: Vec<LabelCount>,
}

pub fn overview(items: &[FeedbackItem]) -> Overview {
    Overview {
        total: items.len(),
        critical: items
            .iter()
            .filter(|item| item.importance == Importance::Critical)
            .count(),
        high_alignment: items
            .iter()
            .filter(|item| item.business_alignment.value() >= 4)
            .count(),
        quick_wins: items.iter().filter(|item| is_quick_win(item)).count(),
    }
}

pub fn patterns(items: &[FeedbackItem]) -> Patterns {
    Patterns {
        themes: frequency(items.iter().map(|item| item.theme.label()), Some(THEME_LIMIT)),
        personas: frequency(
            items.iter().map(|item| {
                item.persona
                    .map(|persona| persona.label())
                    .unwrap_or(UNSPECIFIED)
            }),
            None,
        ),
        product_areas: frequency(
            items.iter().map(|item| {
                item.product_area
                    .map(|area| area.label())
                    .unwrap_or(UNSPECIFIED)
            }),
            Some(PRODUCT_AREA_LIMIT),
        ),
    }
}

/// Most frequent first; ties fall back to label order.
fn frequency<'a, I>(labels: I, limit: Option<usize>) -> Vec<LabelCount>
where
    I: Iterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut ranked: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}
