//! DE/rand/1/bin trial construction.

use super::{Agent, GenerationParams};
use crate::config::Bounds;
use rand::Rng;

/// The three parents a trial's mutant gene is built from:
/// `base + F * (left - right)`.
#[derive(Debug, Clone, Copy)]
pub struct Donors<'s> {
    pub base: &'s [f64],
    pub left: &'s [f64],
    pub right: &'s [f64],
}

/// Draws three donors uniformly from the snapshot, with replacement. A donor
/// may be the target itself or repeat another donor.
pub fn sample_donors<'s, R: Rng + ?Sized>(snapshot: &'s [Agent], rng: &mut R) -> Donors<'s> {
    let size = snapshot.len();
    Donors {
        base: &snapshot[rng.random_range(0..size)],
        left: &snapshot[rng.random_range(0..size)],
        right: &snapshot[rng.random_range(0..size)],
    }
}

/// Binomial crossover between `target` and the mutant built from `donors`.
///
/// Gene `forced` always takes the mutant value; every other gene does so
/// with probability `params.crossover_rate`. Mutant values are clamped to
/// `bounds`.
pub fn recombine<R: Rng + ?Sized>(
    target: &[f64],
    donors: &Donors<'_>,
    forced: usize,
    params: GenerationParams,
    bounds: &Bounds,
    rng: &mut R,
) -> Agent {
    target
        .iter()
        .enumerate()
        .map(|(j, &current)| {
            let crossed = rng.random::<f64>() < params.crossover_rate;
            if crossed || j == forced {
                bounds.clamp(
                    donors.base[j] + params.mutation_factor * (donors.left[j] - donors.right[j]),
                )
            } else {
                current
            }
        })
        .collect()
}

/// Builds the trial for `slot` against a frozen snapshot of the generation.
pub fn generate<R: Rng + ?Sized>(
    snapshot: &[Agent],
    slot: usize,
    params: GenerationParams,
    bounds: &Bounds,
    rng: &mut R,
) -> Agent {
    let donors = sample_donors(snapshot, rng);
    let target = &snapshot[slot];
    let forced = rng.random_range(0..target.len());
    recombine(target, &donors, forced, params, bounds, rng)
}
