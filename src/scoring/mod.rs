//! The prioritization engine. Every function here is pure: feedback, tallies
//! and weights go in, scores come out.

pub mod aggregate;
pub mod composite;
pub mod normalize;
pub mod rank;
pub mod weights;

pub use aggregate::{aggregate, group_by_feature, rank_features, RankedFeature};
pub use composite::{composite, score_item, score_items};
pub use normalize::{VoteNormalization, VoteScale};
pub use rank::{is_quick_win, prioritize, quick_wins, rank_items};
