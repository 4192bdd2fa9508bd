use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureStatus {
    #[default]
    Exploring,
    Planned,
    InProgress,
    Shipped,
}

impl FeatureStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exploring => "exploring",
            Self::Planned => "planned",
            Self::InProgress => "in-progress",
            Self::Shipped => "shipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: FeatureStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_exploring() {
        let feature: Feature = serde_json::from_str(
            r#"{"id": "ft1", "title": "Dark mode", "created_at": "2024-05-01T00:00:00Z", "updated_at": "2024-05-01T00:00:00Z"}"#,
        )
        .expect("feature should parse");
        assert_eq!(feature.status, FeatureStatus::Exploring);
        assert!(feature.description.is_none());
    }

    #[test]
    fn in_progress_uses_kebab_case() {
        let status: FeatureStatus =
            serde_json::from_str("\"in-progress\"").expect("status should parse");
        assert_eq!(status, FeatureStatus::InProgress);
        assert_eq!(status.as_str(), "in-progress");
    }
}
