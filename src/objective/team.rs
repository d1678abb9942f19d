use super::{Objective, ObjectiveError, ObjectiveReport, ScoreBreakdown};
use crate::data::{category_label, Dataset, CATEGORY_COUNT};
use serde::Serialize;
use std::cmp::Ordering;

/// A team member resists a category when its multiplier is at or below this.
pub const RESISTANCE_THRESHOLD: f64 = 0.5;

/// Descending gene value, ascending index on ties. A total order, so every
/// ranking derived from it is reproducible.
fn rank_order(agent: &[f64], a: usize, b: usize) -> Ordering {
    agent[b].total_cmp(&agent[a]).then(a.cmp(&b))
}

/// Gene indices ordered from highest to lowest value.
pub fn rank_genes(agent: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..agent.len()).collect();
    indices.sort_by(|&a, &b| rank_order(agent, a, b));
    indices
}

/// The `k` highest ranked gene indices, in ascending index order.
pub fn top_k(agent: &[f64], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..agent.len()).collect();
    if k < indices.len() {
        indices.select_nth_unstable_by(k, |&a, &b| rank_order(agent, a, b));
        indices.truncate(k);
    }
    indices.sort_unstable();
    indices
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMember {
    pub rank: usize,
    /// Row of the candidate in the dataset
    pub index: usize,
    pub name: String,
    pub strength: f64,
    pub gene: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamReport {
    pub members: Vec<TeamMember>,
    pub strength_total: f64,
    pub uncovered: usize,
    pub covered: Vec<String>,
    pub missing: Vec<String>,
}

/// Picks the `team_size` candidates with the highest genes and scores the
/// team by its strength, penalizing every category no member resists.
///
/// `score = uncovered * penalty - Σ strength`
#[derive(Debug, Clone)]
pub struct TeamCoverage {
    dataset: Dataset,
    team_size: usize,
    penalty: f64,
}

impl TeamCoverage {
    /// # Errors
    /// * `EmptyTeam` / `TeamTooLarge` - `team_size` is 0 or above the dataset size.
    /// * `NegativeStrength` - A candidate has a negative strength.
    /// * `PenaltyTooSmall` - The strongest possible team outweighs one uncovered category.
    pub fn new(dataset: Dataset, team_size: usize, penalty: f64) -> Result<Self, ObjectiveError> {
        if team_size == 0 {
            return Err(ObjectiveError::EmptyTeam);
        }
        if team_size > dataset.len() {
            return Err(ObjectiveError::TeamTooLarge {
                team_size,
                candidates: dataset.len(),
            });
        }
        if let Some(candidate) = dataset.candidates().iter().find(|c| c.strength < 0.0) {
            return Err(ObjectiveError::NegativeStrength {
                name: candidate.name.clone(),
                strength: candidate.strength,
            });
        }

        let mut strengths: Vec<f64> = dataset.candidates().iter().map(|c| c.strength).collect();
        strengths.sort_by(|a, b| b.total_cmp(a));
        let max_strength: f64 = strengths.iter().take(team_size).sum();
        if penalty <= max_strength {
            return Err(ObjectiveError::PenaltyTooSmall {
                penalty,
                max_strength,
            });
        }

        Ok(Self {
            dataset,
            team_size,
            penalty,
        })
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    fn resists(&self, member: usize, category: usize) -> bool {
        self.dataset.candidates()[member].multipliers[category] <= RESISTANCE_THRESHOLD
    }

    fn is_covered(&self, team: &[usize], category: usize) -> bool {
        team.iter().any(|&member| self.resists(member, category))
    }

    fn uncovered_count(&self, team: &[usize]) -> usize {
        (0..CATEGORY_COUNT)
            .filter(|&category| !self.is_covered(team, category))
            .count()
    }

    fn strength(&self, team: &[usize]) -> f64 {
        team.iter()
            .map(|&member| self.dataset.candidates()[member].strength)
            .sum()
    }
}

impl Objective for TeamCoverage {
    fn name(&self) -> &str {
        "team_coverage"
    }

    fn evaluate(&self, agent: &[f64]) -> f64 {
        debug_assert_eq!(agent.len(), self.dataset.len());
        let team = top_k(agent, self.team_size);
        self.uncovered_count(&team) as f64 * self.penalty - self.strength(&team)
    }

    fn required_dimension(&self) -> Option<usize> {
        Some(self.dataset.len())
    }

    /// Recovers the uncovered count and team strength from a bare score.
    /// Exact because strengths are non-negative and below the penalty.
    /// Must round up: `floor(score / penalty)` under-counts by one whenever
    /// the team strength is positive.
    fn breakdown(&self, score: f64) -> Option<ScoreBreakdown> {
        if score > 0.0 {
            let uncovered = (score / self.penalty).ceil();
            Some(ScoreBreakdown {
                uncovered: uncovered as usize,
                strength: uncovered * self.penalty - score,
            })
        } else {
            Some(ScoreBreakdown {
                uncovered: 0,
                strength: -score,
            })
        }
    }

    fn report(&self, agent: &[f64], _score: f64) -> ObjectiveReport {
        let team: Vec<usize> = rank_genes(agent)
            .into_iter()
            .take(self.team_size)
            .collect();

        let members = team
            .iter()
            .enumerate()
            .map(|(position, &index)| {
                let candidate = &self.dataset.candidates()[index];
                TeamMember {
                    rank: position + 1,
                    index,
                    name: candidate.name.clone(),
                    strength: candidate.strength,
                    gene: agent[index],
                }
            })
            .collect();

        let (covered, missing): (Vec<usize>, Vec<usize>) =
            (0..CATEGORY_COUNT).partition(|&category| self.is_covered(&team, category));

        ObjectiveReport::Team(TeamReport {
            members,
            strength_total: self.strength(&team),
            uncovered: missing.len(),
            covered: covered.iter().map(|&c| category_label(c).to_string()).collect(),
            missing: missing.iter().map(|&c| category_label(c).to_string()).collect(),
        })
    }
}
