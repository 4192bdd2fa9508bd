use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Vote {
    Up,
    Down,
}

impl TryFrom<i8> for Vote {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(format!("vote must be 1 or -1, got {other}")),
        }
    }
}

impl From<Vote> for i8 {
    fn from(value: Vote) -> Self {
        match value {
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }
}

/// Counts for one feedback item as reported by the vote store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<Vote>,
}

impl VoteTally {
    pub fn new(upvotes: u32, downvotes: u32) -> Self {
        Self {
            upvotes,
            downvotes,
            user_vote: None,
        }
    }

    pub fn net(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }

    /// Casting the vote the user already holds withdraws it; casting the other
    /// direction switches it. The user never holds more than one vote.
    pub fn toggle(self, vote: Vote) -> Self {
        let mut next = self;
        if let Some(current) = self.user_vote {
            next.remove(current);
            next.user_vote = None;
            if current == vote {
                return next;
            }
        }
        match vote {
            Vote::Up => next.upvotes = next.upvotes.saturating_add(1),
            Vote::Down => next.downvotes = next.downvotes.saturating_add(1),
        }
        next.user_vote = Some(vote);
        next
    }

    fn remove(&mut self, vote: Vote) {
        match vote {
            Vote::Up => self.upvotes = self.upvotes.saturating_sub(1),
            Vote::Down => self.downvotes = self.downvotes.saturating_sub(1),
        }
    }
}

/// Tallies keyed by feedback id. Items the vote store knows nothing about
/// read as an empty tally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteTallies(BTreeMap<String, VoteTally>);

impl VoteTallies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, feedback_id: &str) -> VoteTally {
        self.0.get(feedback_id).copied().unwrap_or_default()
    }

    pub fn insert(&mut self, feedback_id: impl Into<String>, tally: VoteTally) {
        self.0.insert(feedback_id.into(), tally);
    }

    pub fn remove(&mut self, feedback_id: &str) -> Option<VoteTally> {
        self.0.remove(feedback_id)
    }

    pub fn contains(&self, feedback_id: &str) -> bool {
        self.0.contains_key(feedback_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, VoteTally)> for VoteTallies {
    fn from_iter<I: IntoIterator<Item = (K, VoteTally)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(id, tally)| (id.into(), tally))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_can_go_negative() {
        assert_eq!(VoteTally::new(2, 7).net(), -5);
        assert_eq!(VoteTally::default().net(), 0);
    }

    #[test]
    fn toggle_saturates_at_the_counter_limit() {
        let full = VoteTally::new(u32::MAX, u32::MAX);
        let up = full.toggle(Vote::Up);
        assert_eq!((up.upvotes, up.user_vote), (u32::MAX, Some(Vote::Up)));
        let down = full.toggle(Vote::Down);
        assert_eq!((down.downvotes, down.user_vote), (u32::MAX, Some(Vote::Down)));
    }

    #[test]
    fn toggle_adds_switches_and_withdraws() {
        let fresh = VoteTally::new(3, 1);

        let up = fresh.toggle(Vote::Up);
        assert_eq!((up.upvotes, up.downvotes, up.user_vote), (4, 1, Some(Vote::Up)));

        let switched = up.toggle(Vote::Down);
        assert_eq!(
            (switched.upvotes, switched.downvotes, switched.user_vote),
            (3, 2, Some(Vote::Down))
        );

        let withdrawn = switched.toggle(Vote::Down);
        assert_eq!(
            (withdrawn.upvotes, withdrawn.downvotes, withdrawn.user_vote),
            (3, 1, None)
        );
    }

    #[test]
    fn missing_tally_reads_as_empty() {
        let tallies: VoteTallies = [("a", VoteTally::new(1, 0))].into_iter().collect();
        assert_eq!(tallies.get("a").net(), 1);
        assert_eq!(tallies.get("missing"), VoteTally::default());
    }

    #[test]
    fn user_vote_parses_from_signed_integer() {
        let tally: VoteTally =
            serde_json::from_str(r#"{"upvotes": 2, "downvotes": 0, "user_vote": -1}"#)
                .expect("tally should parse");
        assert_eq!(tally.user_vote, Some(Vote::Down));
        assert!(serde_json::from_str::<VoteTally>(r#"{"user_vote": 2}"#).is_err());
    }
}
