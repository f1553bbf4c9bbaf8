//! The stats engine: sole owner of toss state, persisting after each change.
use serde::Serialize;

use crate::KeyValueStore;
use crate::achievements::{AchievementId, AchievementSet, earned_by};
use crate::export::{ExportDocument, ImportError, ImportPayload, parse_import};
use crate::state::{Outcome, Tally, TossStats};
use crate::storage::{ACHIEVEMENTS_KEY, STATS_KEY, StorageError, load_or_default, save_json};
use crate::summary::{StatisticalSummary, summarize};

/// What the caller gets back from [`StatsEngine::record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TossReport {
    pub outcome: Outcome,
    /// Counters after the toss was applied.
    pub tally: Tally,
    /// Achievements that flipped from locked to unlocked on this toss.
    pub unlocked: Vec<AchievementId>,
}

pub struct StatsEngine<S>
where
    S: KeyValueStore,
{
    store: S,
    stats: TossStats,
    achievements: AchievementSet,
}

impl<S> StatsEngine<S>
where
    S: KeyValueStore,
{
    /// Open an engine over `store`, loading any saved state.
    ///
    /// Missing or malformed stored data is replaced by defaults; a fresh
    /// state is stamped with `now_ms` as its session start.
    pub fn open(store: S, now_ms: u64) -> Self {
        let mut stats: TossStats = match crate::storage::load_json(&store, STATS_KEY) {
            Ok(Some(stats)) => stats,
            Ok(None) => TossStats::with_session_start(now_ms),
            Err(err) => {
                log::warn!("discarding stored {STATS_KEY}: {err}");
                TossStats::with_session_start(now_ms)
            }
        };
        if !stats.is_consistent() {
            log::warn!("stored stats had inconsistent counters; repairing");
            stats.sanitize();
        }
        if stats.session_start == 0 {
            stats.session_start = now_ms;
        }
        let achievements = load_or_default(&store, ACHIEVEMENTS_KEY);
        Self {
            store,
            stats,
            achievements,
        }
    }

    #[must_use]
    pub const fn stats(&self) -> &TossStats {
        &self.stats
    }

    #[must_use]
    pub const fn achievements(&self) -> &AchievementSet {
        &self.achievements
    }

    /// Record one toss, persist, and unlock whatever it earned.
    pub fn record(&mut self, outcome: Outcome) -> TossReport {
        self.stats.record(outcome);
        log::debug!(
            "recorded {outcome}: total={} streak={}",
            self.stats.total,
            self.stats.current_streak
        );
        self.persist_stats();

        let unlocked: Vec<AchievementId> = earned_by(&self.stats, outcome)
            .into_iter()
            .filter(|id| self.achievements.unlock(*id))
            .collect();
        if !unlocked.is_empty() {
            for id in &unlocked {
                log::info!("achievement unlocked: {id}");
            }
            self.persist_achievements();
        }

        TossReport {
            outcome,
            tally: self.stats.tally(),
            unlocked,
        }
    }

    /// Clear history and counters. The session start and achievements survive.
    pub fn reset(&mut self) {
        self.stats = TossStats::with_session_start(self.stats.session_start);
        log::debug!("stats reset");
        self.persist_stats();
    }

    #[must_use]
    pub fn summarize(&self) -> StatisticalSummary {
        summarize(&self.stats)
    }

    /// Unlock an achievement on behalf of the host page.
    ///
    /// Returns `true` only when this call flipped the flag.
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        let flipped = self.achievements.unlock(id);
        if flipped {
            log::info!("achievement unlocked: {id}");
            self.persist_achievements();
        }
        flipped
    }

    /// Like [`Self::unlock`], silently ignoring ids outside the catalog.
    pub fn unlock_by_name(&mut self, name: &str) -> bool {
        match AchievementId::from_name(name) {
            Some(id) => self.unlock(id),
            None => {
                log::debug!("ignoring unknown achievement id {name:?}");
                false
            }
        }
    }

    #[must_use]
    pub fn export_document(&self, timestamp: u64, user_agent: &str) -> ExportDocument {
        ExportDocument {
            stats: self.stats.clone(),
            achievements: self.achievements.clone(),
            summary: self.summarize(),
            timestamp,
            user_agent: user_agent.to_string(),
        }
    }

    /// Replace stats and achievements wholesale from an import document.
    ///
    /// A document without a session start keeps the current one.
    ///
    /// On success the caller should re-render everything it derived from
    /// the previous state.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the current state untouched, if the document
    /// is not valid JSON, lacks `stats` or `achievements`, or cannot be
    /// written to the store.
    pub fn import_json(&mut self, text: &str) -> Result<(), ImportError> {
        let ImportPayload {
            mut stats,
            achievements,
        } = parse_import(text)?;
        if stats.session_start == 0 {
            stats.session_start = self.stats.session_start;
        }
        save_json(&self.store, STATS_KEY, &stats)?;
        save_json(&self.store, ACHIEVEMENTS_KEY, &achievements)?;
        log::info!(
            "imported {} tosses and {} achievements",
            stats.total,
            achievements.unlocked_count()
        );
        self.stats = stats;
        self.achievements = achievements;
        Ok(())
    }

    /// Write the current stats to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn save_stats(&self) -> Result<(), StorageError> {
        save_json(&self.store, STATS_KEY, &self.stats)
    }

    /// Write the current achievements to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn save_achievements(&self) -> Result<(), StorageError> {
        save_json(&self.store, ACHIEVEMENTS_KEY, &self.achievements)
    }

    fn persist_stats(&self) {
        if let Err(err) = self.save_stats() {
            log::warn!("failed to persist stats: {err}");
        }
    }

    fn persist_achievements(&self) {
        if let Err(err) = self.save_achievements() {
            log::warn!("failed to persist achievements: {err}");
        }
    }
}
