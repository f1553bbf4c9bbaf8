pub mod reports;
pub mod simulation;
pub mod tester;

pub use simulation::{DEFAULT_TOSSES, SimulationPlan, SimulationRun, run_plan};
pub use tester::*;
