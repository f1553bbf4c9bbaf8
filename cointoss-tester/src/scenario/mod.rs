pub mod catalog;

use crate::logic::SimulationPlan;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Look up a scenario by key or alias.
pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let key = match name.to_lowercase().as_str() {
        "smoke" => "smoke",
        "fair-coin" | "fair" => "fair-coin",
        "streaks" | "streak-analysis" => "streaks",
        "achievements" => "achievements",
        "edge-heavy" | "edge" => "edge-heavy",
        "persistence" | "reload" => "persistence",
        "import-export" | "roundtrip" => "import-export",
        "reset" => "reset",
        _ => return None,
    };
    catalog::catalog_scenario(key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog::CATALOG
        .iter()
        .map(|entry| (entry.key, entry.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_catalog_entries() {
        assert_eq!(get_scenario("fair").unwrap().name, "Fair Coin Distribution");
        assert_eq!(get_scenario("ROUNDTRIP").unwrap().name, "Export and Import");
        assert!(get_scenario("moon").is_none());
    }

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, name) in list_scenarios() {
            assert_eq!(get_scenario(key).unwrap().name, name);
        }
    }
}
