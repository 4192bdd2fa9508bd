use crate::query::SortOrder;
use crate::scoring::normalize::VoteNormalization;
use crate::types::feedback::{CostEstimate, Importance};
use crate::types::scoring::{ScoringWeights, WeightKey};
use crate::types::votes::Vote;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "prioritizer",
    version,
    about = "Score, rank and cluster product feedback"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank feedback by composite priority score
    Rank(RankCommand),
    /// List quick wins in priority order
    QuickWins(QuickWinsCommand),
    /// Rank feature clusters by their linked feedback
    Features(FeaturesCommand),
    /// Summary counts and recurring patterns
    Stats(StatsCommand),
    /// Filter and sort feedback without scoring it
    List(ListCommand),
    /// Add feedback with default scoring attributes
    Submit(SubmitCommand),
    /// Link feedback to a feature
    Link(LinkCommand),
    /// Remove a feedback item's feature link
    Unlink(UnlinkCommand),
    /// Cast or withdraw a vote on feedback
    Vote(VoteCommand),
    /// Inspect, adjust and persist scoring weights
    Weights(WeightsCommand),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum NormalizationArg {
    Fixed,
    Dynamic,
}

impl NormalizationArg {
    pub fn resolve(self, fixed_window: u32) -> VoteNormalization {
        match self {
            Self::Fixed => VoteNormalization::Fixed {
                window: fixed_window,
            },
            Self::Dynamic => VoteNormalization::Dynamic,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum WeightKeyArg {
    Votes,
    Importance,
    Alignment,
    Cost,
}

impl From<WeightKeyArg> for WeightKey {
    fn from(value: WeightKeyArg) -> Self {
        match value {
            WeightKeyArg::Votes => WeightKey::Votes,
            WeightKeyArg::Importance => WeightKey::Importance,
            WeightKeyArg::Alignment => WeightKey::Alignment,
            WeightKeyArg::Cost => WeightKey::Cost,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum VoteArg {
    Up,
    Down,
}

impl From<VoteArg> for Vote {
    fn from(value: VoteArg) -> Self {
        match value {
            VoteArg::Up => Vote::Up,
            VoteArg::Down => Vote::Down,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortArg {
    DateDesc,
    DateAsc,
    Importance,
    Alignment,
    Cost,
}

impl From<SortArg> for SortOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::DateDesc => SortOrder::NewestFirst,
            SortArg::DateAsc => SortOrder::OldestFirst,
            SortArg::Importance => SortOrder::Importance,
            SortArg::Alignment => SortOrder::Alignment,
            SortArg::Cost => SortOrder::Cost,
        }
    }
}

/// Where config and saved preferences live, and whose weights to use.
#[derive(Args)]
pub struct ScoringContextArgs {
    /// Directory holding prioritizer.toml
    #[arg(long, default_value = ".", global = true)]
    pub root: PathBuf,
    /// Score with this user's saved weights when present
    #[arg(long, global = true)]
    pub user: Option<String>,
}

#[derive(Args)]
pub struct RankCommand {
    pub snapshot: PathBuf,
    #[command(flatten)]
    pub context: ScoringContextArgs,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Overrides scoring.vote_normalization
    #[arg(long, value_enum)]
    pub vote_normalization: Option<NormalizationArg>,
    /// Overrides report.top
    #[arg(long, value_parser = parse_positive)]
    pub top: Option<usize>,
}

#[derive(Args)]
pub struct QuickWinsCommand {
    pub snapshot: PathBuf,
    #[command(flatten)]
    pub context: ScoringContextArgs,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Overrides report.quick_win_limit
    #[arg(long, value_parser = parse_positive)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct FeaturesCommand {
    pub snapshot: PathBuf,
    #[command(flatten)]
    pub context: ScoringContextArgs,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct StatsCommand {
    pub snapshot: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct ListCommand {
    pub snapshot: PathBuf,
    /// Theme label, e.g. "UX/UI"
    #[arg(long)]
    pub theme: Option<String>,
    #[arg(long, value_parser = parse_importance)]
    pub importance: Option<Importance>,
    #[arg(long, value_parser = parse_cost)]
    pub cost: Option<CostEstimate>,
    #[arg(long)]
    pub quick_wins: bool,
    /// Case-insensitive text match on content
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, value_enum, default_value = "date-desc")]
    pub sort: SortArg,
}

#[derive(Args)]
pub struct SubmitCommand {
    pub snapshot: PathBuf,
    #[arg(long)]
    pub content: String,
    #[arg(long)]
    pub source: Option<String>,
}

#[derive(Args)]
pub struct LinkCommand {
    pub snapshot: PathBuf,
    pub item: String,
    pub feature: String,
}

#[derive(Args)]
pub struct UnlinkCommand {
    pub snapshot: PathBuf,
    pub item: String,
}

#[derive(Args)]
pub struct VoteCommand {
    pub snapshot: PathBuf,
    pub item: String,
    #[arg(value_enum)]
    pub direction: VoteArg,
}

#[derive(Args)]
pub struct WeightsCommand {
    #[command(flatten)]
    pub context: ScoringContextArgs,
    #[command(subcommand)]
    pub action: WeightsAction,
}

/// Four explicit weights, in votes/importance/alignment/cost order.
#[derive(Args, Clone, Copy)]
pub struct WeightValues {
    #[arg(long, allow_negative_numbers = true)]
    pub votes: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub importance: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub alignment: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub cost: f64,
}

impl From<WeightValues> for ScoringWeights {
    fn from(value: WeightValues) -> Self {
        ScoringWeights::new(value.votes, value.importance, value.alignment, value.cost)
    }
}

#[derive(Subcommand)]
pub enum WeightsAction {
    /// Print the weights in effect
    Show,
    /// Check a weight vector without saving it
    Validate(WeightValues),
    /// Move one weight and rebalance the rest
    Adjust {
        #[arg(value_enum)]
        key: WeightKeyArg,
        #[arg(allow_negative_numbers = true)]
        value: f64,
        /// Persist the result for --user
        #[arg(long)]
        save: bool,
    },
    /// Renormalize a weight vector by its sum
    Repair(WeightValues),
    /// Persist weights for --user
    Save(WeightValues),
    /// Drop --user's saved weights
    Reset,
}

fn parse_importance(value: &str) -> Result<Importance, String> {
    value.parse().map_err(|e: crate::error::PrioritizerError| e.to_string())
}

fn parse_cost(value: &str) -> Result<CostEstimate, String> {
    value.parse().map_err(|e: crate::error::PrioritizerError| e.to_string())
}

fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_values_accept_negative_components() {
        let cli = Cli::try_parse_from([
            "prioritizer",
            "weights",
            "repair",
            "--votes",
            "-1",
            "--importance",
            "1",
            "--alignment",
            "1",
            "--cost",
            "0",
        ])
        .expect("negative weights should parse");
        let Commands::Weights(cmd) = cli.command else {
            panic!("expected weights command");
        };
        let WeightsAction::Repair(values) = cmd.action else {
            panic!("expected repair action");
        };
        assert_eq!(values.votes, -1.0);
    }

    #[test]
    fn limits_reject_zero() {
        assert_eq!(parse_positive("3"), Ok(3));
        assert!(parse_positive("0").is_err());
        assert!(parse_positive("-2").is_err());
        let zero_limit =
            Cli::try_parse_from(["prioritizer", "quick-wins", "s.json", "--limit", "0"]);
        assert!(zero_limit.is_err());
    }
}
