use crate::error::{PrioritizerError, Result};
use crate::types::config::PrioritizerConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

pub const DEFAULT_CONFIG_FILE: &str = "prioritizer.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".prioritizer/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/prioritizer/config.toml";

pub fn load_config(root: &Path) -> Result<Option<PrioritizerConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

/// A config file's place in the override order, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigLayer {
    Global,
    Repo,
    Local,
}

impl ConfigLayer {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Repo => "repo",
            Self::Local => "local",
        }
    }
}

/// Merged config tables, plus the layer that last set each leaf key.
#[derive(Debug, Default)]
struct LayeredToml {
    merged: Table,
    origins: BTreeMap<String, ConfigLayer>,
}

impl LayeredToml {
    fn apply(&mut self, layer: ConfigLayer, overlay: Table) {
        merge_table(&mut self.merged, overlay, "", layer, &mut self.origins);
    }

    fn origin(&self, key: &str) -> Option<ConfigLayer> {
        self.origins.get(key).copied()
    }

    /// Layers behind the keys a validation message names. Falls back to the
    /// whole section when the message only names the table.
    fn blame(&self, message: &str) -> Vec<ConfigLayer> {
        let exact: Vec<ConfigLayer> = self
            .origins
            .iter()
            .filter(|(key, _)| message.contains(key.as_str()))
            .map(|(_, layer)| *layer)
            .collect();
        let mut layers = if exact.is_empty() {
            self.origins
                .iter()
                .filter(|(key, _)| {
                    key.split('.')
                        .next()
                        .is_some_and(|section| message.starts_with(section))
                })
                .map(|(_, layer)| *layer)
                .collect()
        } else {
            exact
        };
        layers.sort();
        layers.dedup();
        layers
    }
}

/// Global, then repo, then local override. Without a repo file there is no
/// config and callers fall back to defaults.
pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<PrioritizerConfig>> {
    let Some(mut layers) = read_layers(root, global_path)? else {
        return Ok(None);
    };

    let cfg: PrioritizerConfig = Value::Table(std::mem::take(&mut layers.merged))
        .try_into()
        .map_err(|e: toml::de::Error| PrioritizerError::ConfigParse(e.to_string()))?;
    cfg.validate().map_err(|e| match e {
        PrioritizerError::ConfigParse(message) => {
            let blamed = layers.blame(&message);
            if blamed.is_empty() {
                PrioritizerError::ConfigParse(message)
            } else {
                let names: Vec<&str> = blamed.into_iter().map(ConfigLayer::as_str).collect();
                PrioritizerError::ConfigParse(format!(
                    "{message} (set in {} config)",
                    names.join(", ")
                ))
            }
        }
        other => other,
    })?;
    Ok(Some(cfg))
}

fn read_layers(root: &Path, global_path: Option<&Path>) -> Result<Option<LayeredToml>> {
    let repo_path = root.join(DEFAULT_CONFIG_FILE);
    if !repo_path.exists() {
        tracing::debug!(path = %repo_path.display(), "no repo config; using defaults");
        return Ok(None);
    }

    let mut layers = LayeredToml::default();
    let sources = [
        (ConfigLayer::Global, global_path.map(Path::to_path_buf)),
        (ConfigLayer::Repo, Some(repo_path)),
        (ConfigLayer::Local, Some(root.join(DEFAULT_LOCAL_FILE))),
    ];
    for (layer, path) in sources {
        let Some(path) = path.filter(|path| path.exists()) else {
            continue;
        };
        tracing::debug!(layer = layer.as_str(), path = %path.display(), "merging config layer");
        layers.apply(layer, read_toml_table(&path)?);
    }
    Ok(Some(layers))
}

fn read_toml_table(path: &Path) -> Result<Table> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| PrioritizerError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_table(
    base: &mut Table,
    overlay: Table,
    prefix: &str,
    layer: ConfigLayer,
    origins: &mut BTreeMap<String, ConfigLayer>,
) {
    for (key, value) in overlay {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Table(table) => {
                if let Some(Value::Table(existing)) = base.get_mut(&key) {
                    merge_table(existing, table, &path, layer, origins);
                    continue;
                }
                forget_below(origins, &path);
                let mut fresh = Table::new();
                merge_table(&mut fresh, table, &path, layer, origins);
                base.insert(key, Value::Table(fresh));
            }
            value => {
                forget_below(origins, &path);
                tracing::debug!(layer = layer.as_str(), key = %path, "config key set");
                origins.insert(path, layer);
                base.insert(key, value);
            }
        }
    }
}

/// Drops provenance for a key and anything nested under it before the key
/// is replaced wholesale.
fn forget_below(origins: &mut BTreeMap<String, ConfigLayer>, path: &str) {
    let nested = format!("{path}.");
    origins.retain(|key, _| key != path && !key.starts_with(&nested));
}
