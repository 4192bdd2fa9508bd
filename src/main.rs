use chrono::Utc;
use clap::Parser;
use prioritizer::analytics;
use prioritizer::cli::{self, Cli, Commands, ReportFormat, ScoringContextArgs, WeightsAction};
use prioritizer::config;
use prioritizer::error::{PrioritizerError, Result};
use prioritizer::preferences::{FilePreferenceStore, PreferenceStore, WeightPreference};
use prioritizer::query::{self, FeedbackFilter};
use prioritizer::report::{self, OutputFormat};
use prioritizer::scoring::normalize::DEFAULT_FIXED_VOTE_WINDOW;
use prioritizer::scoring::{self, aggregate, weights, VoteNormalization, VoteScale};
use prioritizer::snapshot::Snapshot;
use prioritizer::submission::{self, Submission};
use prioritizer::types::config::{
    PrioritizerConfig, ReportLimits, VoteNormalizationSetting, DEFAULT_PREFERENCES_FILE,
};
use prioritizer::types::feedback::Theme;
use prioritizer::types::report::{
    FeatureReport, QuickWinReport, RankingReport, Report, ReportMeta, StatsReport,
};
use prioritizer::types::scoring::{ScoringWeights, WeightKey};
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const BLOCKING: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

/// Config, saved preference and the weights they resolve to for one run.
struct ScoringContext {
    config: Option<PrioritizerConfig>,
    preference: WeightPreference,
    weights: ScoringWeights,
    store: FilePreferenceStore,
}

impl ScoringContext {
    fn load(args: &ScoringContextArgs) -> Result<Self> {
        if !args.root.exists() {
            return Err(PrioritizerError::PathNotFound(
                args.root.display().to_string(),
            ));
        }

        let config = config::load_config(&args.root)?;
        let fallback = config
            .as_ref()
            .map(PrioritizerConfig::weights)
            .unwrap_or_default();
        let preferences_file = config
            .as_ref()
            .map(PrioritizerConfig::preferences_file)
            .unwrap_or(DEFAULT_PREFERENCES_FILE);
        let store = FilePreferenceStore::new(args.root.join(preferences_file));
        let preference = match args.user.as_deref() {
            Some(user) => store.load(user)?,
            None => WeightPreference::Default,
        };
        let weights = preference.weights(&fallback);
        tracing::info!(
            root = %args.root.display(),
            persisted = preference.is_persisted(),
            "resolved scoring weights"
        );

        Ok(Self {
            config,
            preference,
            weights,
            store,
        })
    }

    fn limits(&self) -> ReportLimits {
        self.config
            .as_ref()
            .map(PrioritizerConfig::report_limits)
            .unwrap_or_default()
    }

    fn fixed_vote_window(&self) -> u32 {
        self.config
            .as_ref()
            .map(PrioritizerConfig::fixed_vote_window)
            .unwrap_or(DEFAULT_FIXED_VOTE_WINDOW)
    }

    fn normalization(&self) -> VoteNormalization {
        let setting = self
            .config
            .as_ref()
            .map(PrioritizerConfig::vote_normalization)
            .unwrap_or(VoteNormalizationSetting::Dynamic);
        match setting {
            VoteNormalizationSetting::Fixed => VoteNormalization::Fixed {
                window: self.fixed_vote_window(),
            },
            VoteNormalizationSetting::Dynamic => VoteNormalization::Dynamic,
        }
    }

    fn weights_source(&self) -> &'static str {
        if self.preference.is_persisted() {
            return "saved preference";
        }
        match &self.config {
            Some(config) if config.weights.is_some() => "config",
            _ => "defaults",
        }
    }

    /// Missing config is a warning, not a failure.
    fn exit_status(&self, root: &Path) -> i32 {
        if self.config.is_none() {
            eprintln!("warning: no prioritizer.toml found in {}", root.display());
            exit_code::WARNINGS
        } else {
            exit_code::SUCCESS
        }
    }
}

fn output_format(format: ReportFormat) -> OutputFormat {
    match format {
        ReportFormat::Json => OutputFormat::Json,
        ReportFormat::Md => OutputFormat::Md,
    }
}

fn require_user<'a>(args: &'a ScoringContextArgs, action: &'static str) -> Result<&'a str> {
    args.user
        .as_deref()
        .filter(|user| !user.trim().is_empty())
        .ok_or(PrioritizerError::UserRequired(action))
}

fn print_weights(label: &str, weights: &ScoringWeights) {
    println!("{label}:");
    for key in WeightKey::ALL {
        println!("  {:<10} {:.2}", key.as_str(), weights.get(key));
    }
    println!("  {:<10} {:.2}", "sum", weights.sum());
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Rank(cmd) => {
            let snapshot = Snapshot::load(&cmd.snapshot)?;
            let ctx = ScoringContext::load(&cmd.context)?;
            let limits = ctx.limits();
            let normalization = match cmd.vote_normalization {
                Some(choice) => choice.resolve(ctx.fixed_vote_window()),
                None => ctx.normalization(),
            };

            let ranked =
                scoring::prioritize(&snapshot.items, &snapshot.votes, &ctx.weights, normalization)?;
            let quick_wins: Vec<_> = scoring::quick_wins(&ranked, limits.quick_win_limit)
                .into_iter()
                .cloned()
                .collect();
            let total_items = ranked.len();
            let report = Report::Ranking(RankingReport {
                meta: ReportMeta::new(snapshot.digest()?),
                weights: ctx.weights,
                vote_normalization: normalization,
                total_items,
                ranked: ranked.into_iter().take(cmd.top.unwrap_or(limits.top)).collect(),
                quick_wins,
            });
            println!("{}", report::render(&report, output_format(cmd.format))?);
            Ok(ctx.exit_status(&cmd.context.root))
        }
        Commands::QuickWins(cmd) => {
            let snapshot = Snapshot::load(&cmd.snapshot)?;
            let ctx = ScoringContext::load(&cmd.context)?;
            let limit = cmd.limit.unwrap_or(ctx.limits().quick_win_limit);

            let ranked = scoring::prioritize(
                &snapshot.items,
                &snapshot.votes,
                &ctx.weights,
                ctx.normalization(),
            )?;
            let report = Report::QuickWins(QuickWinReport {
                meta: ReportMeta::new(snapshot.digest()?),
                weights: ctx.weights,
                items: scoring::quick_wins(&ranked, limit).into_iter().cloned().collect(),
            });
            println!("{}", report::render(&report, output_format(cmd.format))?);
            Ok(ctx.exit_status(&cmd.context.root))
        }
        Commands::Features(cmd) => {
            let snapshot = Snapshot::load(&cmd.snapshot)?;
            let ctx = ScoringContext::load(&cmd.context)?;

            let features = scoring::rank_features(
                &snapshot.features,
                &snapshot.items,
                &snapshot.votes,
                &ctx.weights,
                &VoteScale::fixed(ctx.fixed_vote_window()),
            )?;
            let report = Report::Features(FeatureReport {
                meta: ReportMeta::new(snapshot.digest()?),
                weights: ctx.weights,
                features,
                unlinked_items: aggregate::unlinked(&snapshot.items).len(),
            });
            println!("{}", report::render(&report, output_format(cmd.format))?);
            Ok(ctx.exit_status(&cmd.context.root))
        }
        Commands::Stats(cmd) => {
            let snapshot = Snapshot::load(&cmd.snapshot)?;
            let report = Report::Stats(StatsReport {
                meta: ReportMeta::new(snapshot.digest()?),
                overview: analytics::overview(&snapshot.items),
                patterns: analytics::patterns(&snapshot.items),
            });
            println!("{}", report::render(&report, output_format(cmd.format))?);
            Ok(exit_code::SUCCESS)
        }
        Commands::List(cmd) => {
            let snapshot = Snapshot::load(&cmd.snapshot)?;
            let theme = cmd
                .theme
                .map(|label| {
                    Theme::from_label(&label)
                        .ok_or_else(|| PrioritizerError::unknown("theme", label))
                })
                .transpose()?;
            let filter = FeedbackFilter {
                theme,
                importance: cmd.importance,
                cost: cmd.cost,
                quick_wins_only: cmd.quick_wins,
                search: cmd.search,
            };

            let selected = query::select(&snapshot.items, &filter, cmd.sort.into());
            if selected.is_empty() {
                println!("list: no matching feedback");
                return Ok(exit_code::SUCCESS);
            }
            for item in selected {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    item.id,
                    item.importance.as_str(),
                    item.cost_estimate.as_str(),
                    item.business_alignment.value(),
                    item.content
                );
            }
            Ok(exit_code::SUCCESS)
        }
        Commands::Submit(cmd) => {
            let mut snapshot = if cmd.snapshot.exists() {
                Snapshot::load(&cmd.snapshot)?
            } else {
                Snapshot::default()
            };
            let id = submission::next_id(&snapshot.items);
            let item = Submission::new(cmd.content, cmd.source).into_item(id.as_str(), Utc::now())?;
            snapshot.add_item(item);
            snapshot.save(&cmd.snapshot)?;
            println!("submitted {id}");
            Ok(exit_code::SUCCESS)
        }
        Commands::Link(cmd) => {
            let mut snapshot = Snapshot::load(&cmd.snapshot)?;
            snapshot.link(&cmd.item, &cmd.feature)?;
            snapshot.save(&cmd.snapshot)?;
            println!("linked {} to {}", cmd.item, cmd.feature);
            Ok(exit_code::SUCCESS)
        }
        Commands::Unlink(cmd) => {
            let mut snapshot = Snapshot::load(&cmd.snapshot)?;
            match snapshot.unlink(&cmd.item)? {
                Some(feature) => {
                    snapshot.save(&cmd.snapshot)?;
                    println!("unlinked {} from {}", cmd.item, feature);
                }
                None => println!("{} was not linked", cmd.item),
            }
            Ok(exit_code::SUCCESS)
        }
        Commands::Vote(cmd) => {
            let mut snapshot = Snapshot::load(&cmd.snapshot)?;
            let tally = snapshot.vote(&cmd.item, cmd.direction.into())?;
            snapshot.save(&cmd.snapshot)?;
            println!(
                "{}: {} up, {} down (net {:+})",
                cmd.item,
                tally.upvotes,
                tally.downvotes,
                tally.net()
            );
            Ok(exit_code::SUCCESS)
        }
        Commands::Weights(cmd) => run_weights(cmd),
    }
}

fn run_weights(cmd: cli::WeightsCommand) -> Result<i32> {
    match cmd.action {
        WeightsAction::Show => {
            let ctx = ScoringContext::load(&cmd.context)?;
            print_weights(&format!("weights ({})", ctx.weights_source()), &ctx.weights);
            Ok(ctx.exit_status(&cmd.context.root))
        }
        WeightsAction::Validate(values) => {
            let candidate = ScoringWeights::from(values);
            match weights::validate(&candidate) {
                Ok(()) => {
                    println!("weights valid (sum {:.2})", candidate.sum());
                    Ok(exit_code::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{e}");
                    Ok(exit_code::BLOCKING)
                }
            }
        }
        WeightsAction::Adjust { key, value, save } => {
            let mut ctx = ScoringContext::load(&cmd.context)?;
            let adjusted = weights::adjust_one(&ctx.weights, key.into(), value)?;
            print_weights("adjusted weights", &adjusted);
            if save {
                let user = require_user(&cmd.context, "save weights")?;
                ctx.store.save(user, &adjusted)?;
                println!("saved for {user}");
            }
            Ok(exit_code::SUCCESS)
        }
        WeightsAction::Repair(values) => {
            let repaired = weights::repair(&ScoringWeights::from(values))?;
            print_weights("repaired weights", &repaired);
            Ok(exit_code::SUCCESS)
        }
        WeightsAction::Save(values) => {
            let user = require_user(&cmd.context, "save weights")?;
            let mut ctx = ScoringContext::load(&cmd.context)?;
            ctx.store.save(user, &ScoringWeights::from(values))?;
            println!("saved weights for {user}");
            Ok(exit_code::SUCCESS)
        }
        WeightsAction::Reset => {
            let user = require_user(&cmd.context, "reset weights")?;
            let mut ctx = ScoringContext::load(&cmd.context)?;
            ctx.store.reset(user)?;
            println!("weights for {user} reset to defaults");
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
