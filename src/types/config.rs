use crate::error::PrioritizerError;
use crate::scoring::normalize::DEFAULT_FIXED_VOTE_WINDOW;
use crate::scoring::weights;
use crate::types::scoring::{ScoringWeights, WeightKey};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct PrioritizerConfig {
    pub project: ProjectConfig,
    pub weights: Option<HashMap<String, f64>>,
    pub scoring: Option<ScoringConfig>,
    pub report: Option<ReportConfig>,
    pub preferences: Option<PreferencesConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteNormalizationSetting {
    Fixed,
    Dynamic,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub vote_normalization: Option<VoteNormalizationSetting>,
    pub fixed_vote_window: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub top: Option<usize>,
    pub quick_win_limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesConfig {
    pub file: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLimits {
    pub top: usize,
    pub quick_win_limit: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            top: 10,
            quick_win_limit: 5,
        }
    }
}

pub const DEFAULT_PREFERENCES_FILE: &str = ".prioritizer/preferences.toml";

impl PrioritizerConfig {
    /// Configured weights, falling back per key to the defaults.
    pub fn weights(&self) -> ScoringWeights {
        let defaults = ScoringWeights::default();
        match &self.weights {
            Some(configured) => {
                let mut resolved = defaults;
                for key in WeightKey::ALL {
                    if let Some(value) = configured.get(key.as_str()) {
                        resolved.set(key, *value);
                    }
                }
                resolved
            }
            None => defaults,
        }
    }

    pub fn vote_normalization(&self) -> VoteNormalizationSetting {
        self.scoring
            .as_ref()
            .and_then(|scoring| scoring.vote_normalization)
            .unwrap_or(VoteNormalizationSetting::Dynamic)
    }

    pub fn fixed_vote_window(&self) -> u32 {
        self.scoring
            .as_ref()
            .and_then(|scoring| scoring.fixed_vote_window)
            .unwrap_or(DEFAULT_FIXED_VOTE_WINDOW)
    }

    pub fn report_limits(&self) -> ReportLimits {
        let defaults = ReportLimits::default();
        match &self.report {
            Some(report) => ReportLimits {
                top: report.top.unwrap_or(defaults.top),
                quick_win_limit: report.quick_win_limit.unwrap_or(defaults.quick_win_limit),
            },
            None => defaults,
        }
    }

    pub fn preferences_file(&self) -> &str {
        self.preferences
            .as_ref()
            .and_then(|preferences| preferences.file.as_deref())
            .unwrap_or(DEFAULT_PREFERENCES_FILE)
    }

    pub fn validate(&self) -> Result<(), PrioritizerError> {
        if self.project.name.trim().is_empty() {
            return Err(PrioritizerError::ConfigParse(
                "project.name must not be empty".to_string(),
            ));
        }

        if let Some(configured) = &self.weights {
            let mut unknown = configured
                .keys()
                .filter(|key| key.parse::<WeightKey>().is_err())
                .cloned()
                .collect::<Vec<_>>();
            if !unknown.is_empty() {
                unknown.sort();
                return Err(PrioritizerError::ConfigParse(format!(
                    "weights contains unknown key(s): {}",
                    unknown.join(", ")
                )));
            }
        }
        weights::validate(&self.weights())
            .map_err(|e| PrioritizerError::ConfigParse(format!("weights: {e}")))?;

        if let Some(scoring) = &self.scoring {
            if scoring.fixed_vote_window == Some(0) {
                return Err(PrioritizerError::ConfigParse(
                    "scoring.fixed_vote_window must be greater than 0".to_string(),
                ));
            }
        }

        if let Some(report) = &self.report {
            if report.top == Some(0) {
                return Err(PrioritizerError::ConfigParse(
                    "report.top must be greater than 0".to_string(),
                ));
            }
            if report.quick_win_limit == Some(0) {
                return Err(PrioritizerError::ConfigParse(
                    "report.quick_win_limit must be greater than 0".to_string(),
                ));
            }
        }

        if let Some(file) = self
            .preferences
            .as_ref()
            .and_then(|preferences| preferences.file.as_ref())
        {
            if file.trim().is_empty() {
                return Err(PrioritizerError::ConfigParse(
                    "preferences.file must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml_str = r#"
[project]
name = "acme"
"#;
        let cfg: PrioritizerConfig = toml::from_str(toml_str).expect("minimal config should parse");
        assert_eq!(cfg.project.name, "acme");
        assert_eq!(cfg.weights(), ScoringWeights::default());
        assert_eq!(cfg.vote_normalization(), VoteNormalizationSetting::Dynamic);
        assert_eq!(cfg.fixed_vote_window(), 10);
        assert_eq!(cfg.report_limits(), ReportLimits::default());
        assert_eq!(cfg.preferences_file(), DEFAULT_PREFERENCES_FILE);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[project]
name = "acme"

[weights]
votes = 0.40
importance = 0.20
alignment = 0.20
cost = 0.20

[scoring]
vote_normalization = "fixed"
fixed_vote_window = 20

[report]
top = 3
quick_win_limit = 2

[preferences]
file = "prefs.toml"
"#;
        let cfg: PrioritizerConfig = toml::from_str(toml_str).expect("full config should parse");
        assert_eq!(cfg.weights(), ScoringWeights::new(0.40, 0.20, 0.20, 0.20));
        assert_eq!(cfg.vote_normalization(), VoteNormalizationSetting::Fixed);
        assert_eq!(cfg.fixed_vote_window(), 20);
        assert_eq!(
            cfg.report_limits(),
            ReportLimits {
                top: 3,
                quick_win_limit: 2
            }
        );
        assert_eq!(cfg.preferences_file(), "prefs.toml");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_weights_fall_back_per_key() {
        let toml_str = r#"
[project]
name = "acme"

[weights]
votes = 0.35
cost = 0.15
"#;
        let cfg: PrioritizerConfig = toml::from_str(toml_str).expect("config should parse");
        assert_eq!(cfg.weights(), ScoringWeights::new(0.35, 0.25, 0.25, 0.15));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_invalid_weight_sum() {
        let toml_str = r#"
[project]
name = "acme"

[weights]
votes = 0.9
importance = 0.9
alignment = 0.1
cost = 0.1
"#;
        let cfg: PrioritizerConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("must sum to 1.0"));
    }

    #[test]
    fn validate_rejects_unknown_weight_keys() {
        let toml_str = r#"
[project]
name = "acme"

[weights]
votes = 0.30
importance = 0.25
alignment = 0.25
cost = 0.20
popularity = 0.01
"#;
        let cfg: PrioritizerConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("unknown key"));
        assert!(err.to_string().contains("popularity"));
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let toml_str = r#"
[project]
name = "acme"

[report]
top = 0
"#;
        let cfg: PrioritizerConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("report.top must be greater than 0"));

        let toml_str = r#"
[project]
name = "acme"

[scoring]
fixed_vote_window = 0
"#;
        let cfg: PrioritizerConfig = toml::from_str(toml_str).expect("config should parse");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_normalization() {
        let toml_str = r#"
[project]
name = "acme"

[scoring]
vote_normalization = "logarithmic"
"#;
        assert!(toml::from_str::<PrioritizerConfig>(toml_str).is_err());
    }
}
