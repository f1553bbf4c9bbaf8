//! Derived probability metrics over the toss history.
//!
//! Every metric is defined as 0 on an empty history so callers never see
//! NaN or infinity.
use serde::{Deserialize, Serialize};

use crate::numbers::{count_to_f64, finite_or_zero, len_to_f64, ratio};
use crate::state::{Outcome, TossStats};

/// Snapshot of the statistics shown on the charts page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatisticalSummary {
    pub total: u64,
    pub heads: u64,
    pub tails: u64,
    pub edge: u64,
    pub heads_frequency: f64,
    pub tails_frequency: f64,
    pub edge_frequency: f64,
    /// Goodness of fit against a fair heads/tails coin.
    pub chi_squared: f64,
    /// Shannon entropy of the heads/tails split, in bits.
    pub entropy: f64,
    pub longest_streak: u64,
    pub average_streak: f64,
}

/// Build the summary for the given stats. Pure; reads only.
#[must_use]
pub fn summarize(stats: &TossStats) -> StatisticalSummary {
    let runs = run_lengths(&stats.history);
    StatisticalSummary {
        total: stats.total,
        heads: stats.heads,
        tails: stats.tails,
        edge: stats.edge,
        heads_frequency: ratio(stats.heads, stats.total),
        tails_frequency: ratio(stats.tails, stats.total),
        edge_frequency: ratio(stats.edge, stats.total),
        chi_squared: chi_squared(stats.heads, stats.tails, stats.total),
        entropy: entropy(stats.heads, stats.tails, stats.total),
        longest_streak: runs.iter().copied().max().unwrap_or(0),
        average_streak: mean(&runs),
    }
}

/// Chi-squared statistic against a uniform heads/tails split of `total`.
///
/// Edge landings count toward `total` but have no expected bucket of their
/// own, so they only shrink the observed heads/tails mass.
#[must_use]
pub fn chi_squared(heads: u64, tails: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let expected = count_to_f64(total) / 2.0;
    let heads_dev = count_to_f64(heads) - expected;
    let tails_dev = count_to_f64(tails) - expected;
    finite_or_zero(heads_dev.powi(2) / expected + tails_dev.powi(2) / expected)
}

/// Shannon entropy in bits over `{heads/total, tails/total}`.
#[must_use]
pub fn entropy(heads: u64, tails: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    // Accumulate from +0.0 so a one-sided history yields 0, not -0.
    let bits = [ratio(heads, total), ratio(tails, total)]
        .into_iter()
        .filter(|p| *p > 0.0)
        .fold(0.0, |acc, p| acc - p * p.log2());
    finite_or_zero(bits)
}

/// Lengths of every maximal run of identical outcomes, in order.
#[must_use]
pub fn run_lengths(history: &[Outcome]) -> Vec<u64> {
    let mut runs = Vec::new();
    let mut iter = history.iter();
    let Some(mut current) = iter.next() else {
        return runs;
    };
    let mut length = 1_u64;
    for outcome in iter {
        if outcome == current {
            length += 1;
        } else {
            runs.push(length);
            current = outcome;
            length = 1;
        }
    }
    runs.push(length);
    runs
}

#[must_use]
pub fn longest_streak(history: &[Outcome]) -> u64 {
    run_lengths(history).into_iter().max().unwrap_or(0)
}

#[must_use]
pub fn average_streak(history: &[Outcome]) -> f64 {
    mean(&run_lengths(history))
}

fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().sum();
    finite_or_zero(count_to_f64(sum) / len_to_f64(values.len()))
}
