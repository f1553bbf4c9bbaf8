use anyhow::{Context, Result};
use std::sync::Arc;

use cointoss_core::{
    AchievementId, Coin, CoinConfig, MemoryStore, StatisticalSummary, StatsEngine, TossReport,
};

/// Session start stamped on every simulated engine.
pub const SIMULATED_SESSION_START: u64 = 1_700_000_000_000;

/// Tosses per simulated session when the CLI does not override it.
pub const DEFAULT_TOSSES: u64 = 250;

/// How a simulated session is driven and what must hold afterwards.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub coin: CoinConfig,
    /// Overrides the CLI toss count when set.
    pub tosses: Option<u64>,
    /// Outcome tags fed in before the coin takes over.
    pub script: Vec<&'static str>,
    pub expectations: Vec<SimulationExpectation>,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self::new(CoinConfig::default())
    }
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(coin: CoinConfig) -> Self {
        Self {
            coin,
            tosses: None,
            script: Vec::new(),
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_tosses(mut self, tosses: u64) -> Self {
        self.tosses = Some(tosses);
        self
    }

    #[must_use]
    pub fn with_script(mut self, script: &[&'static str]) -> Self {
        self.script = script.to_vec();
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn = Arc<dyn Fn(&SimulationRun) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationRun) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

impl SimulationExpectation {
    /// # Errors
    ///
    /// Returns the expectation's failure, if any.
    pub fn check(&self, run: &SimulationRun) -> Result<()> {
        (self.0)(run)
    }
}

/// Everything a finished session leaves behind.
pub struct SimulationRun {
    pub store: MemoryStore,
    pub engine: StatsEngine<MemoryStore>,
    pub reports: Vec<TossReport>,
    pub summary: StatisticalSummary,
}

impl SimulationRun {
    /// Every achievement unlocked during the run, in unlock order.
    #[must_use]
    pub fn unlocked(&self) -> Vec<AchievementId> {
        self.reports
            .iter()
            .flat_map(|report| report.unlocked.iter().copied())
            .collect()
    }
}

/// Play one session over a fresh in-memory store.
///
/// # Errors
///
/// Returns an error if the plan's coin configuration is invalid or a
/// scripted tag is not a known outcome.
pub fn run_plan(plan: &SimulationPlan, seed: u64, default_tosses: u64) -> Result<SimulationRun> {
    let store = MemoryStore::new();
    let mut engine = StatsEngine::open(store.clone(), SIMULATED_SESSION_START);
    let mut coin = Coin::new(seed, plan.coin).context("invalid coin configuration")?;
    let mut reports = Vec::new();

    for tag in &plan.script {
        let outcome = cointoss_core::Outcome::from_tag(tag)
            .with_context(|| format!("unknown scripted outcome {tag:?}"))?;
        reports.push(engine.record(outcome));
    }
    let tosses = plan.tosses.unwrap_or(default_tosses);
    for _ in 0..tosses {
        reports.push(engine.record(coin.toss()));
    }

    let summary = engine.summarize();
    log::debug!(
        "seed {seed}: {} tosses, chi^2 {:.3}, entropy {:.3}",
        summary.total,
        summary.chi_squared,
        summary.entropy
    );
    Ok(SimulationRun {
        store,
        engine,
        reports,
        summary,
    })
}
