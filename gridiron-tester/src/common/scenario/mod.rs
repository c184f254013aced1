pub mod catalog;

use crate::logic::SimulationPlan;
use catalog::catalog_scenarios;

/// A named simulation plan the CLI can run by key.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub const fn new(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        plan: SimulationPlan,
    ) -> Self {
        Self {
            key,
            name,
            description,
            plan,
        }
    }
}

pub fn get_scenario(key: &str) -> Option<TestScenario> {
    let key = key.trim().to_ascii_lowercase();
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let scenario = get_scenario(" Full-Season ").unwrap();
        assert_eq!(scenario.key, "full-season");
        assert!(get_scenario("coin-toss").is_none());
    }

    #[test]
    fn keys_are_unique_and_listed() {
        let listed = list_scenarios();
        let mut keys: Vec<_> = listed.iter().map(|(key, _)| *key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), listed.len());
        assert!(keys.contains(&"smoke"));
    }
}
