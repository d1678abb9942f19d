use super::Agent;
use crate::config::Bounds;
use crate::objective::Objective;
use rand::Rng;
use rayon::prelude::*;

/// Index-aligned agents and their scores.
///
/// `scores[i]` is always the objective value of `agents[i]`. The engine never
/// edits a live population in place: it takes a [`Population::snapshot`],
/// fills a separate next buffer, and installs it with [`Population::commit`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Population {
    agents: Vec<Agent>,
    scores: Vec<f64>,
}

impl Population {
    /// Builds a population from pre-scored agents.
    ///
    /// # Panics
    /// Panics if the two vectors differ in length.
    pub fn from_parts(agents: Vec<Agent>, scores: Vec<f64>) -> Self {
        assert_eq!(
            agents.len(),
            scores.len(),
            "every agent needs exactly one score"
        );
        Self { agents, scores }
    }

    /// Draws `size` agents uniformly within `bounds` and scores them. Sampling
    /// is sequential on `rng`; scoring runs on the current rayon pool.
    pub fn random<R, O>(
        size: usize,
        dimension: usize,
        bounds: &Bounds,
        objective: &O,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
        O: Objective + ?Sized,
    {
        let agents: Vec<Agent> = (0..size)
            .map(|_| (0..dimension).map(|_| bounds.sample(rng)).collect())
            .collect();
        let scores = agents
            .par_iter()
            .map(|agent| objective.evaluate(agent))
            .collect();
        Self { agents, scores }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Independent copy of the current generation, safe to share read-only
    /// with every worker while the next buffer is being written.
    pub fn snapshot(&self) -> Population {
        self.clone()
    }

    /// Splits into per-slot mutable cells so each worker owns exactly one slot.
    pub(crate) fn slots_mut(&mut self) -> (&mut [Agent], &mut [f64]) {
        (&mut self.agents, &mut self.scores)
    }

    /// Installs the next generation. The only place the current population
    /// changes between generations.
    pub fn commit(&mut self, next: Population) {
        debug_assert_eq!(next.len(), self.len());
        *self = next;
    }

    /// Index of the lowest score, the lowest index winning ties.
    pub fn best_index(&self) -> Option<usize> {
        best_index(&self.scores)
    }
}

/// Index of the minimum, preferring the lowest index among equal scores.
pub fn best_index(scores: &[f64]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .min_by(|(ia, a), (ib, b)| a.total_cmp(b).then(ia.cmp(ib)))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_population_within_bounds() {
        let bounds = Bounds::new(-2.0, 3.0);
        let mut rng = StdRng::seed_from_u64(7);
        let population = Population::random(20, 5, &bounds, &Sphere, &mut rng);

        assert_eq!(population.len(), 20);
        for (agent, score) in population.agents().iter().zip(population.scores()) {
            assert_eq!(agent.len(), 5);
            assert!(agent.iter().all(|&gene| bounds.contains(gene)));
            assert_eq!(*score, Sphere.evaluate(agent));
        }
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut population = Population::from_parts(vec![vec![1.0], vec![2.0]], vec![1.0, 4.0]);
        let snapshot = population.snapshot();

        let (agents, scores) = population.slots_mut();
        agents[0] = vec![0.0];
        scores[0] = 0.0;

        assert_eq!(snapshot.agents()[0], vec![1.0]);
        assert_eq!(snapshot.scores()[0], 1.0);
    }

    #[test]
    fn test_commit_replaces_generation() {
        let mut population = Population::from_parts(vec![vec![1.0]], vec![1.0]);
        population.commit(Population::from_parts(vec![vec![0.5]], vec![0.25]));
        assert_eq!(population.agents()[0], vec![0.5]);
        assert_eq!(population.scores()[0], 0.25);
    }

    #[test]
    fn test_best_index_prefers_lowest_index() {
        assert_eq!(best_index(&[3.0, 1.0, 2.0, 1.0]), Some(1));
        assert_eq!(best_index(&[5.0]), Some(0));
        assert_eq!(best_index(&[]), None);
    }

    #[test]
    #[should_panic]
    fn test_from_parts_rejects_mismatch() {
        Population::from_parts(vec![vec![1.0]], vec![]);
    }
}
