//! Scores, ranks and clusters product feedback.
//!
//! Feedback items carry qualitative attributes (importance, cost, business
//! alignment) and a vote tally. The [`scoring`] module turns those into a
//! weighted 0-100 composite, ranks items, picks quick wins and aggregates
//! feature clusters. Everything around it loads snapshots, config and saved
//! weight preferences and renders reports.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod preferences;
pub mod query;
pub mod report;
pub mod scoring;
pub mod snapshot;
pub mod submission;
pub mod types;

pub use error::{PrioritizerError, Result};
pub use snapshot::Snapshot;
pub use types::feedback::FeedbackItem;
pub use types::scoring::{ScoredItem, ScoringWeights};
