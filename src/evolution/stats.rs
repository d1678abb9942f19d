use super::population::best_index;
use crate::objective::ScoreBreakdown;
use serde::Serialize;
use std::fmt;

/// Score summary of one fully reduced generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub mean: f64,
    pub best: f64,
    pub best_index: usize,
    /// Decoded best score, for objectives that can decode one
    pub breakdown: Option<ScoreBreakdown>,
}

impl GenerationStats {
    /// Returns `None` for an empty score slice.
    pub fn from_scores(generation: usize, scores: &[f64]) -> Option<Self> {
        let best_index = best_index(scores)?;
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        Some(Self {
            generation,
            mean,
            best: scores[best_index],
            best_index,
            breakdown: None,
        })
    }

    pub fn with_breakdown(mut self, breakdown: Option<ScoreBreakdown>) -> Self {
        self.breakdown = breakdown;
        self
    }
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gen: {} | Mean: {:.6} | Best: {:.6}",
            self.generation, self.mean, self.best
        )?;
        if let Some(breakdown) = self.breakdown {
            write!(
                f,
                " | Missing: {} | Stats: {:.0}",
                breakdown.uncovered, breakdown.strength
            )?;
        }
        Ok(())
    }
}

/// Whether generation `generation` (0-based) of `total` is sampled: the first,
/// the last, and every `interval`-th.
pub fn should_report(generation: usize, total: usize, interval: usize) -> bool {
    generation % interval == 0 || generation + 1 == total
}
