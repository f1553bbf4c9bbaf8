//! Coin Toss Engine
//!
//! Platform-agnostic toss tracking for the Coin Toss page: running counters,
//! streaks, probability metrics, achievements, and import/export documents.
//! This crate has no UI or browser dependencies; hosts supply storage
//! through [`KeyValueStore`].

pub mod achievements;
pub mod coin;
pub mod engine;
pub mod export;
pub mod numbers;
pub mod state;
pub mod storage;
pub mod summary;
pub mod timing;

// Re-export commonly used types
pub use achievements::{AchievementId, AchievementInfo, AchievementSet, earned_by};
pub use coin::{Coin, CoinConfig, CoinConfigError, DEFAULT_EDGE_PROBABILITY};
pub use engine::{StatsEngine, TossReport};
pub use export::{ExportDocument, ImportError, ImportPayload, export_file_name, parse_import};
pub use state::{Outcome, ResultHistory, Tally, TossStats};
pub use storage::{ACHIEVEMENTS_KEY, MemoryStore, STATS_KEY, StorageError};
pub use summary::{StatisticalSummary, summarize};
pub use timing::{Debouncer, Throttler, Ticket};

/// Trait for abstracting the browser's key-value storage.
/// Platform-specific implementations should provide this
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the JSON blob stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store a JSON blob under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}
