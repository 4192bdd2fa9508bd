//! An in-memory copy of what the feedback, vote and feature stores hold,
//! loaded from and saved to a JSON file.

use crate::error::{PrioritizerError, Result};
use crate::types::feature::Feature;
use crate::types::feedback::FeedbackItem;
use crate::types::votes::{Vote, VoteTallies, VoteTally};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub items: Vec<FeedbackItem>,
    #[serde(default)]
    pub votes: VoteTallies,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PrioritizerError::PathNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            items = snapshot.items.len(),
            features = snapshot.features.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Hex SHA-256 of the canonical JSON form, used to tie reports to inputs.
    pub fn digest(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        let hash = Sha256::digest(&json);
        Ok(hash.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    pub fn item(&self, id: &str) -> Option<&FeedbackItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.id == id)
    }

    pub fn add_item(&mut self, item: FeedbackItem) {
        self.items.push(item);
    }

    pub fn remove_item(&mut self, id: &str) -> Result<FeedbackItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| PrioritizerError::FeedbackNotFound(id.to_string()))?;
        self.votes.remove(id);
        Ok(self.items.remove(index))
    }

    /// Points an item at a feature, replacing any earlier link.
    pub fn link(&mut self, item_id: &str, feature_id: &str) -> Result<()> {
        if self.feature(feature_id).is_none() {
            return Err(PrioritizerError::FeatureNotFound(feature_id.to_string()));
        }
        let item = self.item_mut(item_id)?;
        item.feature_id = Some(feature_id.to_string());
        self.touch_feature(feature_id);
        Ok(())
    }

    /// Returns the feature the item was linked to, if any.
    pub fn unlink(&mut self, item_id: &str) -> Result<Option<String>> {
        let item = self.item_mut(item_id)?;
        let previous = item.feature_id.take();
        if let Some(feature_id) = previous.as_deref() {
            self.touch_feature(feature_id);
        }
        Ok(previous)
    }

    /// Deletes a feature and clears every link to it.
    pub fn remove_feature(&mut self, feature_id: &str) -> Result<Feature> {
        let index = self
            .features
            .iter()
            .position(|feature| feature.id == feature_id)
            .ok_or_else(|| PrioritizerError::FeatureNotFound(feature_id.to_string()))?;
        for item in &mut self.items {
            if item.feature_id.as_deref() == Some(feature_id) {
                item.feature_id = None;
            }
        }
        Ok(self.features.remove(index))
    }

    pub fn vote(&mut self, item_id: &str, vote: Vote) -> Result<VoteTally> {
        if self.item(item_id).is_none() {
            return Err(PrioritizerError::FeedbackNotFound(item_id.to_string()));
        }
        let next = self.votes.get(item_id).toggle(vote);
        self.votes.insert(item_id, next);
        Ok(next)
    }

    fn item_mut(&mut self, id: &str) -> Result<&mut FeedbackItem> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| PrioritizerError::FeedbackNotFound(id.to_string()))
    }

    fn touch_feature(&mut self, feature_id: &str) {
        if let Some(feature) = self
            .features
            .iter_mut()
            .find(|feature| feature.id == feature_id)
        {
            feature.updated_at = Utc::now();
        }
    }
}
