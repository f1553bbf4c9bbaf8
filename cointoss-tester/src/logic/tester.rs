use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::logic::{SimulationPlan, run_plan};
use crate::scenario::TestScenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    /// Mean chi-squared across successful iterations.
    pub mean_chi_squared: f64,
    /// Mean entropy across successful iterations.
    pub mean_entropy: f64,
}

pub struct LogicTester {
    verbose: bool,
    tosses: u64,
}

impl LogicTester {
    pub const fn new(verbose: bool, tosses: u64) -> Self {
        Self { verbose, tosses }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (seed: {seed})",
                        scenario.name.bright_white()
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut failures = Vec::new();
        let mut durations = Vec::new();
        let mut chi_squared = Vec::new();
        let mut entropy = Vec::new();

        for i in 0..iterations {
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let start_time = Instant::now();
            match self.run_iteration(&scenario.plan, iteration_seed) {
                Ok((chi, bits)) => {
                    let duration = start_time.elapsed();
                    durations.push(duration);
                    chi_squared.push(chi);
                    entropy.push(bits);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{iterations} passed ({duration:?}) chi²:{chi:.3} entropy:{bits:.3}",
                            i + 1
                        );
                    }
                }
                Err(err) => {
                    let message = format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1);
                    if self.verbose {
                        println!("  ❌ {}", message.clone().red());
                    }
                    failures.push(message);
                }
            }
        }

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: durations.len(),
            failures,
            average_duration: average_duration(&durations),
            mean_chi_squared: mean(&chi_squared),
            mean_entropy: mean(&entropy),
        }
    }

    fn run_iteration(&self, plan: &SimulationPlan, seed: u64) -> anyhow::Result<(f64, f64)> {
        let run = run_plan(plan, seed, self.tosses)?;
        for expectation in &plan.expectations {
            expectation.check(&run)?;
        }
        Ok((run.summary.chi_squared, run.summary.entropy))
    }
}

fn average_duration(durations: &[Duration]) -> Duration {
    if durations.is_empty() {
        return Duration::ZERO;
    }
    durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(u32::MAX)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}
