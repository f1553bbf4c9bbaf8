use anyhow::{Context, Result, ensure};

use crate::logic::SimulationPlan;
use crate::logic::SimulationRun;
use crate::logic::simulation::SIMULATED_SESSION_START;
use crate::scenario::TestScenario;
use cointoss_core::achievements::{HUNDRED_TOSSES, LONG_STREAK};
use cointoss_core::summary::{chi_squared, run_lengths};
use cointoss_core::{AchievementId, CoinConfig, MemoryStore, Outcome, STATS_KEY, StatsEngine};

/// Well above the 99.9999th percentile of chi-squared with one degree of freedom.
const FAIR_CHI_SQUARED_CEILING: f64 = 30.0;
const FLOAT_TOLERANCE: f64 = 1e-9;

pub struct CatalogEntry {
    pub key: &'static str,
    pub name: &'static str,
    build: fn() -> SimulationPlan,
}

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        key: "smoke",
        name: "Smoke Test",
        build: smoke_plan,
    },
    CatalogEntry {
        key: "fair-coin",
        name: "Fair Coin Distribution",
        build: fair_coin_plan,
    },
    CatalogEntry {
        key: "streaks",
        name: "Streak Analysis",
        build: streaks_plan,
    },
    CatalogEntry {
        key: "achievements",
        name: "Achievement Gating",
        build: achievements_plan,
    },
    CatalogEntry {
        key: "edge-heavy",
        name: "Edge-Heavy Coin",
        build: edge_heavy_plan,
    },
    CatalogEntry {
        key: "persistence",
        name: "Persistence Reload",
        build: persistence_plan,
    },
    CatalogEntry {
        key: "import-export",
        name: "Export and Import",
        build: import_export_plan,
    },
    CatalogEntry {
        key: "reset",
        name: "Reset Semantics",
        build: reset_plan,
    },
];

pub fn catalog_scenario(key: &str) -> Option<TestScenario> {
    CATALOG
        .iter()
        .find(|entry| entry.key == key)
        .map(|entry| TestScenario::simulation(entry.name, (entry.build)()))
}

fn smoke_plan() -> SimulationPlan {
    SimulationPlan::default()
        .with_expectation(counters_expectation)
        .with_expectation(smoke_expectation)
}

fn fair_coin_plan() -> SimulationPlan {
    SimulationPlan::new(CoinConfig {
        edge_probability: 0.0,
    })
    .with_tosses(1_000)
    .with_expectation(counters_expectation)
    .with_expectation(fair_coin_expectation)
}

fn streaks_plan() -> SimulationPlan {
    SimulationPlan::default()
        .with_script(&["heads"; 10])
        .with_expectation(counters_expectation)
        .with_expectation(streaks_expectation)
}

fn achievements_plan() -> SimulationPlan {
    SimulationPlan::new(CoinConfig {
        edge_probability: 0.01,
    })
    .with_expectation(counters_expectation)
    .with_expectation(achievements_expectation)
}

fn edge_heavy_plan() -> SimulationPlan {
    SimulationPlan::new(CoinConfig {
        edge_probability: 0.5,
    })
    .with_tosses(400)
    .with_expectation(counters_expectation)
    .with_expectation(edge_heavy_expectation)
}

fn persistence_plan() -> SimulationPlan {
    SimulationPlan::default().with_expectation(persistence_expectation)
}

fn import_export_plan() -> SimulationPlan {
    SimulationPlan::default()
        .with_script(&["edge"])
        .with_expectation(import_export_expectation)
}

fn reset_plan() -> SimulationPlan {
    SimulationPlan::default().with_expectation(reset_expectation)
}

fn counters_expectation(run: &SimulationRun) -> Result<()> {
    let stats = run.engine.stats();
    ensure!(stats.is_consistent(), "counters out of sync: {stats:?}");
    ensure!(
        stats.total == u64::try_from(run.reports.len())?,
        "recorded {} tosses but total is {}",
        run.reports.len(),
        stats.total
    );
    ensure!(
        u64::try_from(stats.history.len())? == stats.total,
        "history length {} differs from total {}",
        stats.history.len(),
        stats.total
    );
    Ok(())
}

fn smoke_expectation(run: &SimulationRun) -> Result<()> {
    let summary = &run.summary;
    for (label, value) in [
        ("heads frequency", summary.heads_frequency),
        ("tails frequency", summary.tails_frequency),
        ("edge frequency", summary.edge_frequency),
        ("chi-squared", summary.chi_squared),
        ("entropy", summary.entropy),
        ("average streak", summary.average_streak),
    ] {
        ensure!(value.is_finite(), "{label} is not finite: {value}");
    }
    if summary.total > 0 {
        let sum = summary.heads_frequency + summary.tails_frequency + summary.edge_frequency;
        ensure!((sum - 1.0).abs() < 1e-6, "frequencies sum to {sum}");
        ensure!(
            run.engine
                .achievements()
                .is_unlocked(AchievementId::FirstToss),
            "first toss did not unlock first-toss"
        );
    }
    Ok(())
}

fn fair_coin_expectation(run: &SimulationRun) -> Result<()> {
    let summary = &run.summary;
    ensure!(summary.edge == 0, "edge landed with zero edge probability");
    let diff = summary.heads.abs_diff(summary.tails);
    #[allow(clippy::cast_precision_loss)]
    let expected = (diff * diff) as f64 / summary.total as f64;
    ensure!(
        (summary.chi_squared - expected).abs() < FLOAT_TOLERANCE,
        "chi-squared {} differs from (h-t)^2/n = {expected}",
        summary.chi_squared
    );
    ensure!(
        summary.chi_squared < FAIR_CHI_SQUARED_CEILING,
        "chi-squared {} is implausible for a fair coin",
        summary.chi_squared
    );
    ensure!(
        summary.entropy > 0.95 && summary.entropy <= 1.0 + FLOAT_TOLERANCE,
        "entropy {} out of range for a fair coin",
        summary.entropy
    );
    Ok(())
}

fn streaks_expectation(run: &SimulationRun) -> Result<()> {
    let stats = run.engine.stats();
    let runs = run_lengths(&stats.history);
    let longest = runs.iter().copied().max().unwrap_or(0);
    ensure!(
        run.summary.longest_streak == longest && stats.max_streak == longest,
        "longest streak {} / max streak {} / recomputed {longest}",
        run.summary.longest_streak,
        stats.max_streak
    );
    ensure!(
        runs.last().copied() == Some(stats.current_streak),
        "current streak {} is not the trailing run {:?}",
        stats.current_streak,
        runs.last()
    );
    #[allow(clippy::cast_precision_loss)]
    let covered = run.summary.average_streak * runs.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let total = stats.total as f64;
    ensure!(
        (covered - total).abs() < 1e-6,
        "runs cover {covered} tosses out of {total}"
    );
    let long = run
        .engine
        .achievements()
        .is_unlocked(AchievementId::LongStreak);
    ensure!(
        long == (longest >= LONG_STREAK),
        "long-streak unlocked={long} with longest run {longest}"
    );
    Ok(())
}

fn achievements_expectation(run: &SimulationRun) -> Result<()> {
    let stats = run.engine.stats();
    let achievements = run.engine.achievements();

    let mut heads = 0_u64;
    let mut tails = 0_u64;
    let mut balanced = false;
    for outcome in &stats.history {
        match outcome {
            Outcome::Heads => heads += 1,
            Outcome::Tails => tails += 1,
            Outcome::Edge => {}
        }
        balanced |= heads == tails;
    }

    let expectations = [
        (AchievementId::FirstToss, stats.total >= 1),
        (AchievementId::HundredTosses, stats.total >= HUNDRED_TOSSES),
        (AchievementId::EdgeLand, stats.edge > 0),
        (AchievementId::PerfectBalance, balanced),
        (AchievementId::LongStreak, stats.max_streak >= LONG_STREAK),
        (AchievementId::WisdomSeeker, false),
        (AchievementId::ProbabilityMaster, false),
        (AchievementId::StatisticalInsight, false),
    ];
    for (id, expected) in expectations {
        ensure!(
            achievements.is_unlocked(id) == expected,
            "{id} unlocked={} but expected {expected}",
            achievements.is_unlocked(id)
        );
    }

    let mut reported = run.unlocked();
    let reported_count = reported.len();
    reported.sort_unstable();
    reported.dedup();
    ensure!(
        reported.len() == reported_count,
        "an achievement was reported as newly unlocked twice"
    );
    ensure!(
        reported.len() == achievements.unlocked_count(),
        "{} unlocks reported but {} flags set",
        reported.len(),
        achievements.unlocked_count()
    );
    Ok(())
}

fn edge_heavy_expectation(run: &SimulationRun) -> Result<()> {
    let summary = &run.summary;
    ensure!(
        (0.35..=0.65).contains(&summary.edge_frequency),
        "edge frequency {} far from 0.5",
        summary.edge_frequency
    );
    ensure!(
        run.engine
            .achievements()
            .is_unlocked(AchievementId::EdgeLand),
        "edge landings did not unlock edge-land"
    );
    let expected = chi_squared(summary.heads, summary.tails, summary.total);
    ensure!(
        (summary.chi_squared - expected).abs() < FLOAT_TOLERANCE,
        "chi-squared {} differs from {expected}",
        summary.chi_squared
    );
    Ok(())
}

fn persistence_expectation(run: &SimulationRun) -> Result<()> {
    let reopened = StatsEngine::open(run.store.clone(), SIMULATED_SESSION_START + 60_000);
    ensure!(
        reopened.stats() == run.engine.stats(),
        "reloaded stats differ from the live session"
    );
    ensure!(
        reopened.achievements() == run.engine.achievements(),
        "reloaded achievements differ from the live session"
    );
    ensure!(
        reopened.stats().session_start == SIMULATED_SESSION_START,
        "session start was not preserved across reload"
    );
    Ok(())
}

fn import_export_expectation(run: &SimulationRun) -> Result<()> {
    let doc = run.engine.export_document(SIMULATED_SESSION_START, "cointoss-tester");
    ensure!(
        doc.file_name() == format!("coin-toss-data-{SIMULATED_SESSION_START}.json"),
        "unexpected export file name {}",
        doc.file_name()
    );
    let text = doc.to_pretty_json().context("serializing export")?;

    let store = MemoryStore::new();
    let mut target = StatsEngine::open(store.clone(), 0);
    target.import_json(&text).context("importing export")?;
    ensure!(
        target.stats() == run.engine.stats() && target.achievements() == run.engine.achievements(),
        "imported state differs from the exported session"
    );
    ensure!(
        StatsEngine::open(store, 0).stats() == run.engine.stats(),
        "imported stats were not persisted"
    );

    ensure!(
        target.import_json(r#"{"stats":{"total":0}}"#).is_err(),
        "import without achievements was accepted"
    );
    ensure!(
        target.stats() == run.engine.stats(),
        "rejected import changed the session"
    );
    Ok(())
}

fn reset_expectation(run: &SimulationRun) -> Result<()> {
    let mut engine = StatsEngine::open(run.store.clone(), 0);
    let unlocked_before = engine.achievements().unlocked_count();
    engine.reset();
    let stats = engine.stats();
    ensure!(
        stats.total == 0 && stats.history.is_empty() && stats.last_result.is_none(),
        "reset left counters behind: {stats:?}"
    );
    ensure!(
        stats.session_start == SIMULATED_SESSION_START,
        "reset changed the session start"
    );
    ensure!(
        engine.achievements().unlocked_count() == unlocked_before,
        "reset touched achievements"
    );
    let stored = run.store.raw(STATS_KEY).context("stats missing after reset")?;
    ensure!(
        stored.contains("\"total\":0"),
        "reset was not persisted: {stored}"
    );
    Ok(())
}
