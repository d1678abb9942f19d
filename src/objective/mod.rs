//! Scoring functions the engine minimizes.
//!
//! An [`Objective`] is shared by every worker of a run, so implementations
//! must be pure: evaluation reads the agent and any data captured at
//! construction, and never mutates shared state.

pub mod benchmarks;
pub mod team;

use crate::config::{ObjectiveConfig, ObjectiveKind};
use crate::data::{load_dataset, DataError};
use log::info;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

pub use benchmarks::{Beale, Booth, CumulativeSum, Matyas, Rastrigin, Sphere, SumAbsProduct};
pub use team::{TeamCoverage, TeamMember, TeamReport};

#[derive(Error, Debug)]
pub enum ObjectiveError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("Objective '{0}' requires a dataset file")]
    MissingDataFile(&'static str),
    #[error("Team size must be greater than zero")]
    EmptyTeam,
    #[error("Team size {team_size} exceeds the {candidates} candidates available")]
    TeamTooLarge { team_size: usize, candidates: usize },
    #[error("Candidate '{name}' has negative strength {strength}")]
    NegativeStrength { name: String, strength: f64 },
    #[error("Penalty {penalty} does not dominate the largest team strength {max_strength}")]
    PenaltyTooSmall { penalty: f64, max_strength: f64 },
}

/// Domain decoding of a bare score, used for progress lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub uncovered: usize,
    pub strength: f64,
}

/// Decoded best agent produced at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectiveReport {
    Vector { genes: Vec<f64> },
    Team(TeamReport),
}

pub trait Objective: Send + Sync {
    fn name(&self) -> &str;

    /// Scores an agent. Lower is better.
    fn evaluate(&self, agent: &[f64]) -> f64;

    /// Gene count the objective is defined for, when it is not free.
    fn required_dimension(&self) -> Option<usize> {
        None
    }

    fn breakdown(&self, _score: f64) -> Option<ScoreBreakdown> {
        None
    }

    fn report(&self, agent: &[f64], _score: f64) -> ObjectiveReport {
        ObjectiveReport::Vector {
            genes: agent.to_vec(),
        }
    }
}

/// Builds the objective named by the configuration, loading its dataset when
/// it needs one.
pub fn build(config: &ObjectiveConfig) -> Result<Box<dyn Objective>, ObjectiveError> {
    let objective: Box<dyn Objective> = match config.kind {
        ObjectiveKind::Sphere => Box::new(Sphere),
        ObjectiveKind::SumAbsProduct => Box::new(SumAbsProduct),
        ObjectiveKind::CumulativeSum => Box::new(CumulativeSum),
        ObjectiveKind::Rastrigin => Box::new(Rastrigin),
        ObjectiveKind::Booth => Box::new(Booth),
        ObjectiveKind::Beale => Box::new(Beale),
        ObjectiveKind::Matyas => Box::new(Matyas),
        ObjectiveKind::TeamCoverage => {
            let file = config
                .data_file
                .as_deref()
                .ok_or(ObjectiveError::MissingDataFile("team_coverage"))?;
            let dataset = load_dataset(Path::new(file))?;
            Box::new(TeamCoverage::new(dataset, config.team_size, config.penalty)?)
        }
    };
    info!("Objective '{}' ready.", objective.name());
    Ok(objective)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(kind: ObjectiveKind) -> ObjectiveConfig {
        ObjectiveConfig {
            kind,
            data_file: None,
            team_size: 6,
            penalty: 10_000.0,
        }
    }

    #[test]
    fn test_build_benchmarks() {
        let sphere = build(&config(ObjectiveKind::Sphere)).unwrap();
        assert_eq!(sphere.name(), "sphere");
        assert_eq!(sphere.evaluate(&[1.0, 2.0]), 5.0);
        assert_eq!(sphere.required_dimension(), None);
        assert!(sphere.breakdown(3.0).is_none());

        let booth = build(&config(ObjectiveKind::Booth)).unwrap();
        assert_eq!(booth.required_dimension(), Some(2));
    }

    #[test]
    fn test_team_without_dataset_fails() {
        let result = build(&config(ObjectiveKind::TeamCoverage));
        assert!(matches!(
            result,
            Err(ObjectiveError::MissingDataFile("team_coverage"))
        ));
    }

    #[test]
    fn test_default_report_is_the_vector() {
        let report = Sphere.report(&[0.5, -0.5], 0.5);
        assert_eq!(
            report,
            ObjectiveReport::Vector {
                genes: vec![0.5, -0.5]
            }
        );
    }
}
