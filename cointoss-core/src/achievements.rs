//! Achievement catalog and the unlock-only flag set.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::state::{Outcome, TossStats};

/// Tosses needed for [`AchievementId::HundredTosses`].
pub const HUNDRED_TOSSES: u64 = 100;
/// Run length needed for [`AchievementId::LongStreak`].
pub const LONG_STREAK: u64 = 10;

/// Closed set of achievements shown on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AchievementId {
    FirstToss,
    HundredTosses,
    EdgeLand,
    PerfectBalance,
    LongStreak,
    WisdomSeeker,
    ProbabilityMaster,
    StatisticalInsight,
}

/// Display metadata for an achievement notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementInfo {
    pub id: AchievementId,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

impl AchievementId {
    pub const ALL: [Self; 8] = [
        Self::FirstToss,
        Self::HundredTosses,
        Self::EdgeLand,
        Self::PerfectBalance,
        Self::LongStreak,
        Self::WisdomSeeker,
        Self::ProbabilityMaster,
        Self::StatisticalInsight,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstToss => "first-toss",
            Self::HundredTosses => "hundred-tosses",
            Self::EdgeLand => "edge-land",
            Self::PerfectBalance => "perfect-balance",
            Self::LongStreak => "long-streak",
            Self::WisdomSeeker => "wisdom-seeker",
            Self::ProbabilityMaster => "probability-master",
            Self::StatisticalInsight => "statistical-insight",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == name)
    }

    /// Whether the id is unlocked by toss statistics rather than by the host page.
    #[must_use]
    pub const fn is_stat_driven(self) -> bool {
        matches!(
            self,
            Self::FirstToss
                | Self::HundredTosses
                | Self::EdgeLand
                | Self::PerfectBalance
                | Self::LongStreak
        )
    }

    #[must_use]
    pub const fn info(self) -> AchievementInfo {
        let (name, icon, description) = match self {
            Self::FirstToss => ("First Toss", "🎯", "Complete your first coin toss"),
            Self::HundredTosses => ("Hundred Tosses", "💯", "Toss the coin 100 times"),
            Self::EdgeLand => ("Edge Miracle", "⚖️", "Watch the coin land on its edge"),
            Self::PerfectBalance => ("Perfect Balance", "⚖️", "Heads and tails are tied"),
            Self::LongStreak => ("Long Streak", "🔥", "Ten identical results in a row"),
            Self::WisdomSeeker => ("Wisdom Seeker", "🧠", "Finish every reflection"),
            Self::ProbabilityMaster => (
                "Probability Master",
                "🎲",
                "Grasp the essence of probability",
            ),
            Self::StatisticalInsight => (
                "Statistical Insight",
                "📊",
                "See the pattern behind the noise",
            ),
        };
        AchievementInfo {
            id: self,
            name,
            icon,
            description,
        }
    }
}

impl std::fmt::Display for AchievementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Achievements whose conditions hold right after `outcome` was recorded.
#[must_use]
pub fn earned_by(stats: &TossStats, outcome: Outcome) -> Vec<AchievementId> {
    let mut earned = Vec::new();
    if stats.total == 1 {
        earned.push(AchievementId::FirstToss);
    }
    if stats.total == HUNDRED_TOSSES {
        earned.push(AchievementId::HundredTosses);
    }
    if outcome == Outcome::Edge {
        earned.push(AchievementId::EdgeLand);
    }
    if stats.total > 0 && stats.heads == stats.tails {
        earned.push(AchievementId::PerfectBalance);
    }
    if stats.current_streak == LONG_STREAK {
        earned.push(AchievementId::LongStreak);
    }
    earned
}

/// Unlock-only flags keyed by [`AchievementId`].
///
/// Serialized as a `{ "first-toss": bool, ... }` object listing every id.
/// Unknown keys are dropped when loading and missing keys read as locked.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, bool>", into = "BTreeMap<String, bool>")]
pub struct AchievementSet {
    unlocked: BTreeSet<AchievementId>,
}

impl AchievementSet {
    #[must_use]
    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.contains(&id)
    }

    /// Mark `id` unlocked. Returns `true` only on the locked to unlocked transition.
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        self.unlocked.insert(id)
    }

    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }
}

impl From<BTreeMap<String, bool>> for AchievementSet {
    fn from(raw: BTreeMap<String, bool>) -> Self {
        let unlocked = raw
            .into_iter()
            .filter(|(_, flag)| *flag)
            .filter_map(|(name, _)| AchievementId::from_name(&name))
            .collect();
        Self { unlocked }
    }
}

impl From<AchievementSet> for BTreeMap<String, bool> {
    fn from(set: AchievementSet) -> Self {
        AchievementId::ALL
            .into_iter()
            .map(|id| (id.as_str().to_string(), set.is_unlocked(id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_through_serde_tags() {
        for id in AchievementId::ALL {
            let tag = serde_json::to_value(id).unwrap();
            assert_eq!(tag, id.as_str());
            assert_eq!(AchievementId::from_name(id.as_str()), Some(id));
        }
        assert_eq!(AchievementId::from_name("moon-landing"), None);
    }

    #[test]
    fn unlock_reports_only_the_first_transition() {
        let mut set = AchievementSet::default();
        assert!(set.unlock(AchievementId::EdgeLand));
        assert!(!set.unlock(AchievementId::EdgeLand));
        assert!(set.is_unlocked(AchievementId::EdgeLand));
        assert_eq!(set.unlocked_count(), 1);
    }

    #[test]
    fn stored_map_ignores_unknown_ids_and_defaults_missing() {
        let set: AchievementSet =
            serde_json::from_str(r#"{"first-toss":true,"moon-landing":true,"edge-land":false}"#)
                .unwrap();
        assert!(set.is_unlocked(AchievementId::FirstToss));
        assert!(!set.is_unlocked(AchievementId::EdgeLand));
        assert_eq!(set.unlocked_count(), 1);
    }

    #[test]
    fn serialized_map_lists_every_id() {
        let mut set = AchievementSet::default();
        set.unlock(AchievementId::LongStreak);
        let json = serde_json::to_value(&set).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), AchievementId::ALL.len());
        assert_eq!(map["long-streak"], true);
        assert_eq!(map["first-toss"], false);
    }

    #[test]
    fn conditions_follow_the_table() {
        let mut stats = TossStats::default();
        stats.record(Outcome::Heads);
        assert_eq!(earned_by(&stats, Outcome::Heads), vec![AchievementId::FirstToss]);

        stats.record(Outcome::Tails);
        assert_eq!(
            earned_by(&stats, Outcome::Tails),
            vec![AchievementId::PerfectBalance]
        );

        stats.record(Outcome::Edge);
        assert_eq!(
            earned_by(&stats, Outcome::Edge),
            vec![AchievementId::EdgeLand, AchievementId::PerfectBalance]
        );
    }

    #[test]
    fn host_driven_ids_have_no_stat_condition() {
        let host_only: Vec<_> = AchievementId::ALL
            .into_iter()
            .filter(|id| !id.is_stat_driven())
            .collect();
        assert_eq!(
            host_only,
            vec![
                AchievementId::WisdomSeeker,
                AchievementId::ProbabilityMaster,
                AchievementId::StatisticalInsight,
            ]
        );
        assert_eq!(AchievementId::LongStreak.info().icon, "🔥");
    }
}
