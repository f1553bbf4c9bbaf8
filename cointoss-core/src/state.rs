//! Toss outcomes and the running counters derived from them.
use serde::{Deserialize, Serialize};

/// Result of a single toss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Heads,
    Tails,
    /// The coin came to rest standing on its rim.
    Edge,
}

impl Outcome {
    pub const ALL: [Self; 3] = [Self::Heads, Self::Tails, Self::Edge];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heads => "heads",
            Self::Tails => "tails",
            Self::Edge => "edge",
        }
    }

    /// Parse the lowercase tag used in storage and by the page script.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "heads" => Some(Self::Heads),
            "tails" => Some(Self::Tails),
            "edge" => Some(Self::Edge),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, append-only record of every toss in the session.
pub type ResultHistory = Vec<Outcome>;

/// Aggregate counters plus the history they were derived from.
///
/// Missing fields fall back to their defaults on deserialization, so a stored
/// object written by an older page merges over a fresh state instead of
/// failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TossStats {
    pub total: u64,
    pub heads: u64,
    pub tails: u64,
    pub edge: u64,
    /// Length of the trailing run of identical outcomes.
    pub current_streak: u64,
    /// Longest run observed this session; never decreases.
    pub max_streak: u64,
    pub last_result: Option<Outcome>,
    pub history: ResultHistory,
    /// Milliseconds since the Unix epoch when the session began.
    pub session_start: u64,
}

/// Counter-only view of [`TossStats`], cheap to copy out of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub total: u64,
    pub heads: u64,
    pub tails: u64,
    pub edge: u64,
    pub current_streak: u64,
    pub max_streak: u64,
    pub last_result: Option<Outcome>,
}

impl TossStats {
    #[must_use]
    pub fn with_session_start(session_start: u64) -> Self {
        Self {
            session_start,
            ..Self::default()
        }
    }

    /// Apply one toss to the counters and history.
    pub fn record(&mut self, outcome: Outcome) {
        self.history.push(outcome);
        self.total = self.total.saturating_add(1);
        match outcome {
            Outcome::Heads => self.heads = self.heads.saturating_add(1),
            Outcome::Tails => self.tails = self.tails.saturating_add(1),
            Outcome::Edge => self.edge = self.edge.saturating_add(1),
        }
        self.current_streak = if self.last_result == Some(outcome) {
            self.current_streak.saturating_add(1)
        } else {
            1
        };
        self.max_streak = self.max_streak.max(self.current_streak);
        self.last_result = Some(outcome);
    }

    #[must_use]
    pub const fn tally(&self) -> Tally {
        Tally {
            total: self.total,
            heads: self.heads,
            tails: self.tails,
            edge: self.edge,
            current_streak: self.current_streak,
            max_streak: self.max_streak,
            last_result: self.last_result,
        }
    }

    /// Counters add up, streaks are ordered, and a non-empty history agrees
    /// with every counter derived from it.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let counters_add_up = self
            .heads
            .checked_add(self.tails)
            .and_then(|sum| sum.checked_add(self.edge))
            == Some(self.total);
        counters_add_up
            && self.current_streak <= self.max_streak
            && (self.history.is_empty() || self.matches_history())
    }

    /// Restore the counter invariants on state that came from outside the
    /// engine (storage or an imported document).
    ///
    /// A non-empty history is authoritative: counts, the trailing streak and
    /// the last result are rebuilt from it. Counter-only state keeps its
    /// counts.
    pub fn sanitize(&mut self) {
        if !self.history.is_empty() {
            let derived = HistoryCounts::of(&self.history);
            self.heads = derived.heads;
            self.tails = derived.tails;
            self.edge = derived.edge;
            self.current_streak = derived.trailing_run;
            self.max_streak = self.max_streak.max(derived.longest_run);
            self.last_result = self.history.last().copied();
        }
        self.total = self
            .heads
            .saturating_add(self.tails)
            .saturating_add(self.edge);
        self.max_streak = self.max_streak.max(self.current_streak);
        if self.total == 0 {
            self.current_streak = 0;
            self.last_result = None;
        }
    }

    fn matches_history(&self) -> bool {
        let derived = HistoryCounts::of(&self.history);
        derived.heads == self.heads
            && derived.tails == self.tails
            && derived.edge == self.edge
            && derived.trailing_run == self.current_streak
            && derived.longest_run <= self.max_streak
            && self.history.last().copied() == self.last_result
    }
}

struct HistoryCounts {
    heads: u64,
    tails: u64,
    edge: u64,
    trailing_run: u64,
    longest_run: u64,
}

impl HistoryCounts {
    fn of(history: &[Outcome]) -> Self {
        let mut counts = Self {
            heads: 0,
            tails: 0,
            edge: 0,
            trailing_run: 0,
            longest_run: 0,
        };
        let mut previous = None;
        for &outcome in history {
            match outcome {
                Outcome::Heads => counts.heads = counts.heads.saturating_add(1),
                Outcome::Tails => counts.tails = counts.tails.saturating_add(1),
                Outcome::Edge => counts.edge = counts.edge.saturating_add(1),
            }
            counts.trailing_run = if previous == Some(outcome) {
                counts.trailing_run.saturating_add(1)
            } else {
                1
            };
            counts.longest_run = counts.longest_run.max(counts.trailing_run);
            previous = Some(outcome);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tracks_counters_and_streaks() {
        let mut stats = TossStats::default();
        for outcome in [
            Outcome::Heads,
            Outcome::Heads,
            Outcome::Heads,
            Outcome::Tails,
            Outcome::Heads,
            Outcome::Heads,
        ] {
            stats.record(outcome);
        }
        assert_eq!(stats.total, 6);
        assert_eq!(stats.heads, 5);
        assert_eq!(stats.tails, 1);
        assert_eq!(stats.edge, 0);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.max_streak, 3);
        assert_eq!(stats.last_result, Some(Outcome::Heads));
        assert_eq!(stats.history.len(), 6);
        assert!(stats.is_consistent());
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let stats: TossStats = serde_json::from_str(r#"{"total":3,"heads":3}"#).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.heads, 3);
        assert_eq!(stats.max_streak, 0);
        assert!(stats.history.is_empty());
        assert_eq!(stats.last_result, None);
    }

    #[test]
    fn serializes_with_page_field_names() {
        let mut stats = TossStats::with_session_start(42);
        stats.record(Outcome::Edge);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["currentStreak"], 1);
        assert_eq!(json["maxStreak"], 1);
        assert_eq!(json["lastResult"], "edge");
        assert_eq!(json["sessionStart"], 42);
        assert_eq!(json["history"][0], "edge");
    }

    #[test]
    fn sanitize_repairs_foreign_counters() {
        let mut stats = TossStats {
            total: 10,
            heads: 2,
            tails: 1,
            current_streak: 4,
            max_streak: 1,
            ..TossStats::default()
        };
        assert!(!stats.is_consistent());
        stats.sanitize();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.max_streak, 4);
        assert!(stats.is_consistent());
    }

    #[test]
    fn history_overrides_stale_counters() {
        let mut stats: TossStats =
            serde_json::from_str(r#"{"total":0,"history":["heads"]}"#).unwrap();
        assert!(!stats.is_consistent());
        stats.sanitize();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.heads, 1);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.max_streak, 1);
        assert_eq!(stats.last_result, Some(Outcome::Heads));
        assert!(stats.is_consistent());
    }

    #[test]
    fn missing_streak_is_rebuilt_from_history() {
        let mut stats: TossStats = serde_json::from_str(
            r#"{"total":3,"heads":1,"tails":2,"lastResult":"tails","history":["heads","tails","tails"]}"#,
        )
        .unwrap();
        assert!(!stats.is_consistent());
        stats.sanitize();
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.max_streak, 2);
        assert!(stats.is_consistent());
    }

    #[test]
    fn sanitize_keeps_earlier_longer_max_streak() {
        let mut stats = TossStats {
            max_streak: 9,
            history: vec![Outcome::Edge, Outcome::Heads],
            ..TossStats::default()
        };
        stats.sanitize();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.max_streak, 9);
        assert_eq!(stats.last_result, Some(Outcome::Heads));
    }

    #[test]
    fn outcome_tags_parse_case_insensitively() {
        assert_eq!(Outcome::from_tag(" Heads "), Some(Outcome::Heads));
        assert_eq!(Outcome::from_tag("EDGE"), Some(Outcome::Edge));
        assert_eq!(Outcome::from_tag("side"), None);
        assert_eq!(Outcome::Tails.to_string(), "tails");
    }
}
