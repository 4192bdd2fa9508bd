use crate::analytics::LabelCount;
use crate::scoring::normalize::VoteNormalization;
use crate::types::report::{
    FeatureReport, QuickWinReport, RankingReport, Report, ReportMeta, StatsReport,
};
use crate::types::scoring::{ScoredItem, ScoringWeights};

pub fn to_markdown(report: &Report) -> String {
    match report {
        Report::Ranking(ranking) => ranking_markdown(ranking),
        Report::QuickWins(wins) => quick_wins_markdown(wins),
        Report::Features(features) => features_markdown(features),
        Report::Stats(stats) => stats_markdown(stats),
    }
}

fn ranking_markdown(report: &RankingReport) -> String {
    let mut output = String::new();
    output.push_str("# Priority Ranking\n\n");
    push_meta(&mut output, &report.meta);
    push_weights(&mut output, &report.weights);
    output.push_str(&format!(
        "Vote normalization: {}\n\n",
        normalization_label(&report.vote_normalization)
    ));

    output.push_str(&format!(
        "## Top Items ({} of {})\n\n",
        report.ranked.len(),
        report.total_items
    ));
    push_items(&mut output, &report.ranked);

    output.push_str("## Quick Wins\n\n");
    push_items(&mut output, &report.quick_wins);
    output
}

fn quick_wins_markdown(report: &QuickWinReport) -> String {
    let mut output = String::new();
    output.push_str("# Quick Wins\n\n");
    push_meta(&mut output, &report.meta);
    push_weights(&mut output, &report.weights);
    push_items(&mut output, &report.items);
    output
}

fn features_markdown(report: &FeatureReport) -> String {
    let mut output = String::new();
    output.push_str("# Feature Clusters\n\n");
    push_meta(&mut output, &report.meta);
    push_weights(&mut output, &report.weights);

    output.push_str("## Features\n\n");
    if report.features.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for (rank, entry) in report.features.iter().enumerate() {
            let score = &entry.score;
            output.push_str(&format!(
                "{}. {} [{}] score {} ({} feedback; votes {}, importance {}, alignment {}, cost {})\n",
                rank + 1,
                entry.feature.title,
                entry.feature.status.as_str(),
                score.composite,
                score.feedback_count,
                score.votes,
                score.importance,
                score.alignment,
                score.cost
            ));
        }
        output.push('\n');
    }
    output.push_str(&format!("Unlinked feedback: {}\n", report.unlinked_items));
    output
}

fn stats_markdown(report: &StatsReport) -> String {
    let mut output = String::new();
    output.push_str("# Feedback Overview\n\n");
    push_meta(&mut output, &report.meta);
    output.push_str(&format!(
        "- total: {}\n- critical: {}\n- high alignment: {}\n- quick wins: {}\n\n",
        report.overview.total,
        report.overview.critical,
        report.overview.high_alignment,
        report.overview.quick_wins
    ));
    push_counts(&mut output, "Themes", &report.patterns.themes);
    push_counts(&mut output, "Personas", &report.patterns.personas);
    push_counts(&mut output, "Product Areas", &report.patterns.product_areas);
    output
}

fn push_meta(output: &mut String, meta: &ReportMeta) {
    output.push_str(&format!(
        "Generated {} by {} (snapshot {})\n\n",
        meta.generated_at,
        meta.generator,
        short_digest(&meta.snapshot_digest)
    ));
}

fn push_weights(output: &mut String, weights: &ScoringWeights) {
    output.push_str(&format!(
        "Weights: votes {:.0}%, importance {:.0}%, alignment {:.0}%, cost {:.0}%\n\n",
        weights.votes * 100.0,
        weights.importance * 100.0,
        weights.alignment * 100.0,
        weights.cost * 100.0
    ));
}

fn push_items(output: &mut String, items: &[ScoredItem]) {
    if items.is_empty() {
        output.push_str("- none\n\n");
        return;
    }
    for (rank, entry) in items.iter().enumerate() {
        output.push_str(&format!(
            "{}. [{}] {}{} (net votes {:+}; {} / {} / alignment {})\n",
            rank + 1,
            entry.composite,
            entry.item.content,
            if entry.quick_win { " (quick win)" } else { "" },
            entry.net_votes,
            entry.item.importance.as_str(),
            entry.item.cost_estimate.as_str(),
            entry.item.business_alignment.value()
        ));
    }
    output.push('\n');
}

fn push_counts(output: &mut String, title: &str, counts: &[LabelCount]) {
    output.push_str(&format!("## {title}\n\n"));
    if counts.is_empty() {
        output.push_str("- none\n\n");
        return;
    }
    for entry in counts {
        output.push_str(&format!("- {}: {}\n", entry.label, entry.count));
    }
    output.push('\n');
}

fn normalization_label(normalization: &VoteNormalization) -> String {
    match normalization {
        VoteNormalization::Fixed { window } => format!("fixed window of ±{window}"),
        VoteNormalization::Dynamic => "dynamic (largest net vote in set)".to_string(),
    }
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::composite::score_item;
    use crate::types::feedback::{CostEstimate, FeedbackItem, Importance};
    use crate::types::votes::VoteTally;
    use chrono::Utc;

    fn scored(content: &str) -> ScoredItem {
        let mut item = FeedbackItem::new("fb-1", content, Utc::now());
        item.importance = Importance::High;
        item.cost_estimate = CostEstimate::Low;
        score_item(&item, &VoteTally::new(3, 1), &ScoringWeights::default())
            .expect("item should score")
    }

    #[test]
    fn ranking_report_contains_sections() {
        let entry = scored("Bulk export");
        let report = Report::Ranking(RankingReport {
            meta: ReportMeta::new("0123456789abcdef"),
            weights: ScoringWeights::default(),
            vote_normalization: VoteNormalization::Dynamic,
            total_items: 1,
            ranked: vec![entry.clone()],
            quick_wins: vec![entry],
        });

        let rendered = to_markdown(&report);
        assert!(rendered.contains("# Priority Ranking"));
        assert!(rendered.contains("## Top Items (1 of 1)"));
        assert!(rendered.contains("## Quick Wins"));
        assert!(rendered.contains("Bulk export (quick win)"));
        assert!(rendered.contains("net votes +2"));
        assert!(rendered.contains("votes 30%"));
        assert!(rendered.contains("snapshot 0123456789ab)"));
    }

    #[test]
    fn empty_sections_render_none() {
        let report = Report::QuickWins(QuickWinReport {
            meta: ReportMeta::new("d"),
            weights: ScoringWeights::default(),
            items: vec![],
        });
        assert!(to_markdown(&report).contains("- none"));
    }
}
