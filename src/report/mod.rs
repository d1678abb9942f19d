//! Final run reports for stdout, rendered as text or pretty JSON.
//!
//! A [`RunSummary`] carries the run's shape (objective, sizes, seed, timing)
//! together with the objective's decoding of the best agent, so a JSON report
//! is enough to reproduce and inspect a run.

use crate::config::RunConfig;
use crate::data::CATEGORY_COUNT;
use crate::evolution::EvolutionOutcome;
use crate::objective::{Objective, ObjectiveReport, TeamReport};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Everything printed once a run finishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Name of the objective that was minimized
    pub objective: String,
    pub best_score: f64,
    /// Slot of the best agent in the final population
    pub best_index: usize,
    pub generations: usize,
    pub population_size: usize,
    pub dimension: usize,
    pub concurrency: usize,
    /// Seed that reproduces the run
    pub seed: u64,
    pub elapsed_ms: f64,
    /// Objective-specific decoding of the best agent
    pub result: ObjectiveReport,
}

impl RunSummary {
    /// Builds the summary of a finished run.
    ///
    /// # Arguments
    /// * `config` - The run's configuration.
    /// * `objective` - The objective the run minimized, used to decode the best agent.
    /// * `dimension` - Genes per agent actually used by the run.
    /// * `outcome` - What the engine returned.
    pub fn new<O: Objective + ?Sized>(
        config: &RunConfig,
        objective: &O,
        dimension: usize,
        outcome: &EvolutionOutcome,
    ) -> Self {
        Self {
            objective: objective.name().to_string(),
            best_score: outcome.best_score,
            best_index: outcome.best_index,
            generations: config.generations,
            population_size: config.population_size,
            dimension,
            concurrency: config.concurrency,
            seed: outcome.seed,
            elapsed_ms: millis(outcome.elapsed),
            result: objective.report(&outcome.best, outcome.best_score),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Run Summary ===")?;
        writeln!(f, "Objective: {}", self.objective)?;
        writeln!(
            f,
            "Best score: {:.6} (slot {})",
            self.best_score, self.best_index
        )?;
        writeln!(
            f,
            "Generations: {} | Population: {} | Dimension: {} | Workers: {}",
            self.generations, self.population_size, self.dimension, self.concurrency
        )?;
        writeln!(f, "Seed: {}", self.seed)?;
        writeln!(f, "Elapsed: {:.3} ms", self.elapsed_ms)?;

        match &self.result {
            ObjectiveReport::Vector { genes } => {
                let rendered: Vec<String> = genes.iter().map(|g| format!("{:.6}", g)).collect();
                write!(f, "Best agent: [{}]", rendered.join(", "))
            }
            ObjectiveReport::Team(team) => write_team(f, team),
        }
    }
}

fn write_team(f: &mut fmt::Formatter<'_>, team: &TeamReport) -> fmt::Result {
    writeln!(f, "Team (strength total {:.0}):", team.strength_total)?;
    for member in &team.members {
        writeln!(
            f,
            "  {}. {} (row {}) strength {:.0}, gene {:.4}",
            member.rank, member.name, member.index, member.strength, member.gene
        )?;
    }
    if team.missing.is_empty() {
        write!(f, "Coverage: all {} categories resisted", CATEGORY_COUNT)
    } else {
        write!(
            f,
            "Coverage: {}/{} categories resisted, missing: {}",
            team.covered.len(),
            CATEGORY_COUNT,
            team.missing.join(", ")
        )
    }
}

/// Timing over repeated runs of the same configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkSummary {
    pub runs: usize,
    pub average_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl BenchmarkSummary {
    /// Returns `None` when no run was timed.
    pub fn from_durations(durations: &[Duration]) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }
        let times: Vec<f64> = durations.iter().copied().map(millis).collect();
        Some(Self {
            runs: times.len(),
            average_ms: times.iter().sum::<f64>() / times.len() as f64,
            min_ms: times.iter().copied().fold(f64::INFINITY, f64::min),
            max_ms: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for BenchmarkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Benchmark: {} runs | Average: {:.3} ms | Min: {:.3} ms | Max: {:.3} ms",
            self.runs, self.average_ms, self.min_ms, self.max_ms
        )
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;
    use crate::evolution::population::Population;
    use crate::objective::{Sphere, TeamMember};

    fn create_test_config() -> RunConfig {
        RunConfig {
            population_size: 2,
            dimension: 2,
            generations: 10,
            concurrency: 2,
            report_interval: 5,
            seed: Some(7),
            bounds: Bounds::new(-1.0, 1.0),
            crossover: Bounds::new(0.1, 0.9),
            mutation: Bounds::new(0.2, 0.8),
        }
    }

    fn create_test_outcome() -> EvolutionOutcome {
        EvolutionOutcome {
            best: vec![0.5, -0.25],
            best_score: 0.3125,
            best_index: 1,
            history: Vec::new(),
            population: Population::from_parts(
                vec![vec![1.0, 1.0], vec![0.5, -0.25]],
                vec![2.0, 0.3125],
            ),
            seed: 7,
            elapsed: Duration::from_millis(12),
        }
    }

    fn create_team_report(missing: Vec<String>) -> TeamReport {
        TeamReport {
            members: vec![TeamMember {
                rank: 1,
                index: 0,
                name: "Shield".to_string(),
                strength: 100.0,
                gene: 0.9,
            }],
            strength_total: 100.0,
            uncovered: missing.len(),
            covered: vec!["bug".to_string()],
            missing,
        }
    }

    #[test]
    fn test_summary_from_outcome() {
        let config = create_test_config();
        let summary = RunSummary::new(&config, &Sphere, 2, &create_test_outcome());

        assert_eq!(summary.objective, "sphere");
        assert_eq!(summary.best_score, 0.3125);
        assert_eq!(summary.best_index, 1);
        assert_eq!(summary.seed, 7);
        assert_eq!(summary.elapsed_ms, 12.0);
        assert_eq!(
            summary.result,
            ObjectiveReport::Vector {
                genes: vec![0.5, -0.25]
            }
        );
    }

    #[test]
    fn test_text_rendering() {
        let config = create_test_config();
        let text = RunSummary::new(&config, &Sphere, 2, &create_test_outcome()).to_string();

        assert!(text.contains("Objective: sphere"));
        assert!(text.contains("Best score: 0.312500 (slot 1)"));
        assert!(text.contains("Seed: 7"));
        assert!(text.ends_with("Best agent: [0.500000, -0.250000]"));
    }

    #[test]
    fn test_team_rendering() {
        let config = create_test_config();
        let mut summary = RunSummary::new(&config, &Sphere, 2, &create_test_outcome());

        summary.result = ObjectiveReport::Team(create_team_report(Vec::new()));
        let text = summary.to_string();
        assert!(text.contains("1. Shield (row 0) strength 100"));
        assert!(text.ends_with("Coverage: all 18 categories resisted"));

        summary.result = ObjectiveReport::Team(create_team_report(vec!["fire".to_string()]));
        assert!(summary
            .to_string()
            .ends_with("Coverage: 1/18 categories resisted, missing: fire"));
    }

    #[test]
    fn test_json_serialization() {
        let config = create_test_config();
        let summary = RunSummary::new(&config, &Sphere, 2, &create_test_outcome());
        let json = summary.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["objective"], "sphere");
        assert_eq!(value["seed"], 7);
        assert_eq!(value["result"]["kind"], "vector");
        assert_eq!(value["result"]["genes"][1], -0.25);
    }

    #[test]
    fn test_team_json_is_tagged() {
        let config = create_test_config();
        let mut summary = RunSummary::new(&config, &Sphere, 2, &create_test_outcome());
        summary.result = ObjectiveReport::Team(create_team_report(Vec::new()));

        let value: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(value["result"]["kind"], "team");
        assert_eq!(value["result"]["members"][0]["name"], "Shield");
        assert_eq!(value["result"]["uncovered"], 0);
    }

    #[test]
    fn test_benchmark_summary() {
        let durations = [
            Duration::from_millis(10),
            Duration::from_millis(30),
            Duration::from_millis(20),
        ];
        let summary = BenchmarkSummary::from_durations(&durations).unwrap();
        assert_eq!(summary.runs, 3);
        assert!((summary.average_ms - 20.0).abs() < 1e-9);
        assert!((summary.min_ms - 10.0).abs() < 1e-9);
        assert!((summary.max_ms - 30.0).abs() < 1e-9);
        assert!(summary.to_string().starts_with("Benchmark: 3 runs"));

        let value: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(value["runs"], 3);

        assert!(BenchmarkSummary::from_durations(&[]).is_none());
    }
}
