//! Scenario runner for batch projections
//!
//! Scenarios are loaded once, then projected in parallel across the rayon
//! thread pool. Results keep the input order.

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::ProjectionAssumptions;
use crate::error::Result;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionSummary};

/// A set of assumptions with its holding period, identified by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedScenario {
    pub name: String,
    #[serde(default)]
    pub config: ProjectionConfig,
    pub assumptions: ProjectionAssumptions,
}

impl NamedScenario {
    pub fn new(name: impl Into<String>, assumptions: ProjectionAssumptions, config: ProjectionConfig) -> Self {
        Self {
            name: name.into(),
            config,
            assumptions,
        }
    }

    pub fn project(&self) -> Result<ProjectionResult> {
        ProjectionEngine::new(self.assumptions.clone(), self.config).project()
    }
}

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(load_scenarios("data/scenarios")?);
/// for (name, result) in runner.run_all() {
///     println!("{}: {:?}", name, result.map(|r| r.summary()));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    scenarios: Vec<NamedScenario>,
}

impl ScenarioRunner {
    pub fn new(scenarios: Vec<NamedScenario>) -> Self {
        Self { scenarios }
    }

    /// Add a scenario to the batch
    pub fn push(&mut self, scenario: NamedScenario) {
        self.scenarios.push(scenario);
    }

    /// Vary the holding period of one set of assumptions
    pub fn holding_periods(name: &str, assumptions: &ProjectionAssumptions, years: &[i32]) -> Self {
        Self::new(
            years
                .iter()
                .map(|&y| NamedScenario::new(format!("{}_{}y", name, y), assumptions.clone(), ProjectionConfig::with_years(y)))
                .collect(),
        )
    }

    pub fn scenarios(&self) -> &[NamedScenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Project every scenario in parallel; a failing scenario does not stop the batch
    pub fn run_all(&self) -> Vec<(String, Result<ProjectionResult>)> {
        info!("Running {} scenarios", self.scenarios.len());

        self.scenarios
            .par_iter()
            .map(|s| {
                let result = s.project();
                if let Err(e) = &result {
                    warn!("Scenario {} failed: {}", s.name, e);
                }
                (s.name.clone(), result)
            })
            .collect()
    }

    /// Headline figures of the scenarios that projected successfully
    pub fn summaries(&self) -> Vec<(String, ProjectionSummary)> {
        self.run_all()
            .into_iter()
            .filter_map(|(name, result)| result.ok().map(|r| (name, r.summary())))
            .collect()
    }
}
