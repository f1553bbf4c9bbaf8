//! Toss session: the engine paired with the coin that feeds it.
//!
//! Stands in for the page's coin animator. Everything here is plain Rust so
//! it can be exercised off the browser with a [`cointoss_core::MemoryStore`].

use cointoss_core::{
    AchievementId, Coin, CoinConfig, CoinConfigError, ExportDocument, ImportError, KeyValueStore,
    Outcome, StatsEngine, Tally, TossReport,
};
use serde::Serialize;

/// Upper bound for a single auto-toss burst.
pub const MAX_AUTO_TOSSES: u32 = 1_000;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown outcome {0:?}")]
    UnknownOutcome(String),
    #[error(transparent)]
    Coin(#[from] CoinConfigError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("export failed: {0}")]
    Export(#[from] serde_json::Error),
}

/// Result of an auto-toss burst.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTossReport {
    pub tosses: u32,
    pub tally: Tally,
    pub unlocked: Vec<AchievementId>,
}

/// A rendered export, ready to hand to the download helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub body: String,
}

pub struct TossSession<S>
where
    S: KeyValueStore,
{
    engine: StatsEngine<S>,
    coin: Coin,
}

impl<S> TossSession<S>
where
    S: KeyValueStore,
{
    /// # Errors
    ///
    /// Returns an error if the coin configuration is invalid.
    pub fn new(store: S, seed: u64, config: CoinConfig, now_ms: u64) -> Result<Self, SessionError> {
        Ok(Self {
            engine: StatsEngine::open(store, now_ms),
            coin: Coin::new(seed, config)?,
        })
    }

    #[must_use]
    pub const fn engine(&self) -> &StatsEngine<S> {
        &self.engine
    }

    pub const fn engine_mut(&mut self) -> &mut StatsEngine<S> {
        &mut self.engine
    }

    pub fn toss(&mut self) -> TossReport {
        let outcome = self.coin.toss();
        self.engine.record(outcome)
    }

    /// Record an outcome reported by the page as a tag (`"heads"`, ...).
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is not one of the known outcomes.
    pub fn record_tag(&mut self, tag: &str) -> Result<TossReport, SessionError> {
        let outcome =
            Outcome::from_tag(tag).ok_or_else(|| SessionError::UnknownOutcome(tag.to_string()))?;
        Ok(self.engine.record(outcome))
    }

    /// Toss `count` times in a row, capped at [`MAX_AUTO_TOSSES`].
    pub fn auto_toss(&mut self, count: u32) -> AutoTossReport {
        let tosses = count.min(MAX_AUTO_TOSSES);
        let mut unlocked = Vec::new();
        for _ in 0..tosses {
            unlocked.extend(self.toss().unlocked);
        }
        AutoTossReport {
            tosses,
            tally: self.engine.stats().tally(),
            unlocked,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    pub fn export(&self, timestamp: u64, user_agent: &str) -> Result<ExportFile, SessionError> {
        let doc: ExportDocument = self.engine.export_document(timestamp, user_agent);
        Ok(ExportFile {
            file_name: doc.file_name(),
            body: doc.to_pretty_json()?,
        })
    }

    /// # Errors
    ///
    /// Returns an error, leaving state untouched, if the document is rejected.
    pub fn import(&mut self, text: &str) -> Result<(), SessionError> {
        self.engine.import_json(text)?;
        Ok(())
    }
}
