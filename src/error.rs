use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrioritizerError {
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    #[error("unknown {kind}: {value}")]
    UnknownCategory { kind: &'static str, value: String },

    #[error("feedback item not found: {0}")]
    FeedbackNotFound(String),

    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    #[error("feedback content is required")]
    EmptyContent,

    #[error("a user id is required to {0}")]
    UserRequired(&'static str),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("toml write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PrioritizerError {
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownCategory {
            kind,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PrioritizerError>;
