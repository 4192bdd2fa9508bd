use crate::error::{PrioritizerError, Result};
use crate::types::feedback::FeedbackItem;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeSet;

pub const DEFAULT_SOURCE: &str = "Browser Extension";

/// The minimal payload accepted from lightweight clients such as the browser
/// extension. Everything the scorer needs is defaulted.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub content: String,
    #[serde(default)]
    pub source: Option<String>,
}

impl Submission {
    pub fn new(content: impl Into<String>, source: Option<String>) -> Self {
        Self {
            content: content.into(),
            source,
        }
    }

    pub fn into_item(self, id: impl Into<String>, created_at: DateTime<Utc>) -> Result<FeedbackItem> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(PrioritizerError::EmptyContent);
        }

        let source = self
            .source
            .map(|source| source.trim().to_string())
            .filter(|source| !source.is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

        let mut item = FeedbackItem::new(id, content, created_at);
        item.source = Some(source);
        Ok(item)
    }
}

/// Next free `fb-N` id for a snapshot's items. Once the highest number is
/// `u64::MAX`, the lowest unused number is taken instead.
pub fn next_id(existing: &[FeedbackItem]) -> String {
    let used: BTreeSet<u64> = existing
        .iter()
        .filter_map(|item| item.id.strip_prefix("fb-"))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .collect();
    let next = match used.last() {
        None => 1,
        Some(highest) => highest.checked_add(1).unwrap_or_else(|| {
            let mut candidate = 1;
            while used.contains(&candidate) {
                candidate += 1;
            }
            candidate
        }),
    };
    format!("fb-{next}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::feedback::{CostEstimate, Importance, Theme};

    #[test]
    fn submission_defaults_scoring_attributes() {
        let item = Submission::new("  Love the new editor  ", None)
            .into_item("fb-1", Utc::now())
            .expect("submission should convert");
        assert_eq!(item.content, "Love the new editor");
        assert_eq!(item.source.as_deref(), Some(DEFAULT_SOURCE));
        assert_eq!(item.theme, Theme::Other);
        assert_eq!(item.importance, Importance::Medium);
        assert_eq!(item.business_alignment.value(), 3);
        assert_eq!(item.cost_estimate, CostEstimate::Medium);
    }

    #[test]
    fn submission_keeps_explicit_source() {
        let item = Submission::new("Bug in export", Some("Zendesk".to_string()))
            .into_item("fb-2", Utc::now())
            .expect("submission should convert");
        assert_eq!(item.source.as_deref(), Some("Zendesk"));
    }

    #[test]
    fn blank_content_is_rejected() {
        let err = Submission::new("   ", None)
            .into_item("fb-3", Utc::now())
            .expect_err("blank content should fail");
        assert!(matches!(err, PrioritizerError::EmptyContent));
    }

    #[test]
    fn payload_parses_with_only_content() {
        let submission: Submission =
            serde_json::from_str(r#"{"content": "hello"}"#).expect("payload should parse");
        assert!(submission.source.is_none());
    }

    #[test]
    fn next_id_skips_past_highest() {
        let at = Utc::now();
        let items = vec![
            FeedbackItem::new("fb-2", "a", at),
            FeedbackItem::new("custom", "b", at),
            FeedbackItem::new("fb-9", "c", at),
        ];
        assert_eq!(next_id(&items), "fb-10");
        assert_eq!(next_id(&[]), "fb-1");
    }

    #[test]
    fn next_id_reuses_a_gap_after_the_largest_number() {
        let at = Utc::now();
        let items = vec![
            FeedbackItem::new("fb-18446744073709551615", "a", at),
            FeedbackItem::new("fb-1", "b", at),
        ];
        assert_eq!(next_id(&items), "fb-2");
    }
}
