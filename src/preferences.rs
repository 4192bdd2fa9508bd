//! Per-user weight preferences.
//!
//! A user is either on the process-wide default weights or on weights they
//! saved. `save` moves them to `Persisted`, `reset` moves them back.

use crate::error::{PrioritizerError, Result};
use crate::scoring::weights;
use crate::types::scoring::ScoringWeights;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum WeightPreference {
    Default,
    Persisted {
        user_id: String,
        weights: ScoringWeights,
    },
}

impl WeightPreference {
    /// The weights to score with; `fallback` is the process-wide default.
    pub fn weights(&self, fallback: &ScoringWeights) -> ScoringWeights {
        match self {
            Self::Default => *fallback,
            Self::Persisted { weights, .. } => *weights,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted { .. })
    }
}

pub trait PreferenceStore {
    fn load(&self, user_id: &str) -> Result<WeightPreference>;
    fn save(&mut self, user_id: &str, weights: &ScoringWeights) -> Result<WeightPreference>;
    fn reset(&mut self, user_id: &str) -> Result<WeightPreference>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(default)]
    users: BTreeMap<String, ScoringWeights>,
}

/// Stores every user's weights in one TOML file under `[users.<id>]`.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<PreferencesFile> {
        if !self.path.exists() {
            return Ok(PreferencesFile::default());
        }
        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            PrioritizerError::ConfigParse(format!("{}: {}", self.path.display(), e))
        })
    }

    fn write(&self, file: &PreferencesFile) -> Result<()> {
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(file)?)?;
        Ok(())
    }
}

fn require_user(user_id: &str, action: &'static str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(PrioritizerError::UserRequired(action));
    }
    Ok(())
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self, user_id: &str) -> Result<WeightPreference> {
        let file = self.read()?;
        match file.users.get(user_id) {
            Some(saved) => {
                weights::validate(saved)?;
                Ok(WeightPreference::Persisted {
                    user_id: user_id.to_string(),
                    weights: *saved,
                })
            }
            None => Ok(WeightPreference::Default),
        }
    }

    fn save(&mut self, user_id: &str, weights: &ScoringWeights) -> Result<WeightPreference> {
        require_user(user_id, "save weights")?;
        weights::validate(weights)?;
        let mut file = self.read()?;
        file.users.insert(user_id.to_string(), *weights);
        self.write(&file)?;
        tracing::info!(user = user_id, path = %self.path.display(), "saved scoring weights");
        Ok(WeightPreference::Persisted {
            user_id: user_id.to_string(),
            weights: *weights,
        })
    }

    fn reset(&mut self, user_id: &str) -> Result<WeightPreference> {
        require_user(user_id, "reset weights")?;
        let mut file = self.read()?;
        if file.users.remove(user_id).is_some() {
            self.write(&file)?;
            tracing::info!(user = user_id, "reset scoring weights to defaults");
        }
        Ok(WeightPreference::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FilePreferenceStore {
        FilePreferenceStore::new(dir.path().join(".prioritizer/preferences.toml"))
    }

    #[test]
    fn unknown_user_is_on_defaults() {
        let dir = TempDir::new().expect("temp dir should be created");
        let pref = store(&dir).load("alice").expect("load should succeed");
        assert_eq!(pref, WeightPreference::Default);
        let fallback = ScoringWeights::default();
        assert_eq!(pref.weights(&fallback), fallback);
    }

    #[test]
    fn save_then_reset_walks_the_state_machine() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut prefs = store(&dir);
        let custom = ScoringWeights::new(0.4, 0.2, 0.2, 0.2);

        let saved = prefs.save("alice", &custom).expect("save should succeed");
        assert!(saved.is_persisted());
        assert_eq!(prefs.load("alice").expect("load should succeed"), saved);
        assert_eq!(
            prefs.load("bob").expect("load should succeed"),
            WeightPreference::Default
        );
        assert_eq!(saved.weights(&ScoringWeights::default()), custom);

        let reset = prefs.reset("alice").expect("reset should succeed");
        assert_eq!(reset, WeightPreference::Default);
        assert_eq!(
            prefs.load("alice").expect("load should succeed"),
            WeightPreference::Default
        );
    }

    #[test]
    fn save_rejects_invalid_weights_and_blank_user() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut prefs = store(&dir);
        let err = prefs
            .save("alice", &ScoringWeights::new(0.9, 0.9, 0.0, 0.0))
            .expect_err("invalid weights should not persist");
        assert!(matches!(err, PrioritizerError::InvalidWeights(_)));
        assert!(!prefs.path().exists());

        let err = prefs
            .save(" ", &ScoringWeights::default())
            .expect_err("blank user should fail");
        assert!(matches!(err, PrioritizerError::UserRequired(_)));
    }

    #[test]
    fn hand_edited_invalid_weights_fail_on_load() {
        let dir = TempDir::new().expect("temp dir should be created");
        let prefs = store(&dir);
        fs::create_dir_all(dir.path().join(".prioritizer")).expect("dir should create");
        fs::write(
            prefs.path(),
            r#"
[users.alice]
votes = 0.9
importance = 0.9
alignment = 0.0
cost = 0.0
"#,
        )
        .expect("preferences should write");
        assert!(prefs.load("alice").is_err());
    }
}
