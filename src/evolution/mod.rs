pub mod population;
pub mod stats;
pub mod trial;

use crate::config::RunConfig;
use crate::objective::Objective;
use log::{debug, info};
use population::Population;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use stats::{should_report, GenerationStats};
use std::time::{Duration, Instant};
use thiserror::Error;

/// A candidate solution: one real-valued gene per problem dimension.
pub type Agent = Vec<f64>;

#[derive(Error, Debug)]
pub enum EvolutionError {
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Invalid engine setup: {0}")]
    InvalidSetup(&'static str),
}

/// Crossover rate and mutation factor shared by every slot of one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub crossover_rate: f64,
    pub mutation_factor: f64,
}

impl GenerationParams {
    pub fn sample<R: Rng + ?Sized>(config: &RunConfig, rng: &mut R) -> Self {
        Self {
            crossover_rate: config.crossover.sample(rng),
            mutation_factor: config.mutation.sample(rng),
        }
    }
}

/// Everything a finished run hands back to the caller.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    pub best: Agent,
    pub best_score: f64,
    pub best_index: usize,
    /// Stats of every sampled generation, in order
    pub history: Vec<GenerationStats>,
    /// The final population
    pub population: Population,
    /// Seed that reproduces this run
    pub seed: u64,
    pub elapsed: Duration,
}

/// Drives a differential evolution run for one objective.
///
/// Each generation is a fixed cycle: sample the generation parameters, take a
/// frozen snapshot of the population, dispatch one trial/evaluate/select unit
/// per slot onto a worker pool of `concurrency` threads, wait for all of them,
/// then commit the next buffer. Workers only read the snapshot and only write
/// their own slot of the next buffer.
///
/// All randomness flows from a single seeded master generator on the calling
/// thread; each unit gets its own generator seeded from it, so a run is
/// reproducible regardless of how the pool schedules units.
pub struct EvolutionEngine<'a, O: Objective + ?Sized> {
    /// Parameters of the run, borrowed for its whole duration
    config: &'a RunConfig,
    /// The scoring function, shared read-only by all workers
    objective: &'a O,
    /// Genes per agent
    dimension: usize,
    /// Bounded worker pool, `config.concurrency` threads
    pool: ThreadPool,
    /// Master generator
    rng: StdRng,
    seed: u64,
    population: Population,
}

impl<'a, O: Objective + ?Sized> EvolutionEngine<'a, O> {
    /// Creates a new EvolutionEngine instance
    ///
    /// # Arguments
    /// * `config` - Reference to a validated `RunConfig`.
    /// * `objective` - The objective to minimize.
    /// * `dimension` - Genes per agent. Use `Objective::required_dimension` when it is set.
    ///
    /// # Returns
    /// * `Result<Self, EvolutionError>` - The engine, with an empty population.
    ///
    /// # Errors
    /// * `InvalidSetup` - Zero dimension, population size or concurrency, or a
    ///   dimension other than `objective.required_dimension()`.
    /// * `ThreadPool` - The worker pool cannot be created.
    pub fn new(
        config: &'a RunConfig,
        objective: &'a O,
        dimension: usize,
    ) -> Result<Self, EvolutionError> {
        if dimension == 0 {
            return Err(EvolutionError::InvalidSetup("dimension must be greater than zero"));
        }
        if objective
            .required_dimension()
            .is_some_and(|required| required != dimension)
        {
            return Err(EvolutionError::InvalidSetup(
                "dimension differs from the one the objective is defined for",
            ));
        }
        if config.population_size == 0 {
            return Err(EvolutionError::InvalidSetup(
                "population size must be greater than zero",
            ));
        }
        if config.concurrency == 0 {
            return Err(EvolutionError::InvalidSetup(
                "concurrency must be greater than zero",
            ));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.concurrency)
            .thread_name(|i| format!("de-worker-{}", i))
            .build()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());

        Ok(Self {
            config,
            objective,
            dimension,
            pool,
            rng: StdRng::seed_from_u64(seed),
            seed,
            population: Population::default(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of threads in the worker pool.
    pub fn concurrency(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs the evolution process
    ///
    /// Resets the master generator to the engine's seed, builds and scores a
    /// fresh population, then runs `config.generations` generations. Stats
    /// are sampled after the barrier of generation 0, of every
    /// `report_interval`-th generation and of the last one.
    ///
    /// # Returns
    /// * `EvolutionOutcome` - The best agent of the final population and the run's history.
    pub fn evolve(&mut self) -> EvolutionOutcome {
        let start = Instant::now();
        self.rng = StdRng::seed_from_u64(self.seed);

        info!(
            "Initializing population of size {} (dimension {}, {} workers, seed {})...",
            self.config.population_size,
            self.dimension,
            self.concurrency(),
            self.seed
        );
        self.initialize_population();

        let total = self.config.generations;
        let mut history = Vec::new();
        for generation in 0..total {
            let accepted = self.next_generation();
            debug!(
                "Gen {}: {}/{} trials accepted",
                generation,
                accepted,
                self.population.len()
            );

            if should_report(generation, total, self.config.report_interval) {
                if let Some(stats) = self.current_stats(generation) {
                    info!("{}", stats);
                    history.push(stats);
                }
            }
        }

        let best_index = self.population.best_index().unwrap_or(0);
        let elapsed = start.elapsed();
        info!("Evolution complete in {:.3?}.", elapsed);

        EvolutionOutcome {
            best: self.population.agents()[best_index].clone(),
            best_score: self.population.scores()[best_index],
            best_index,
            history,
            population: self.population.clone(),
            seed: self.seed,
            elapsed,
        }
    }

    /// Fills the population with uniformly random agents within the gene
    /// bounds and scores them on the worker pool.
    pub fn initialize_population(&mut self) {
        let config = self.config;
        let objective = self.objective;
        let dimension = self.dimension;
        let rng = &mut self.rng;
        self.population = self.pool.install(|| {
            Population::random(
                config.population_size,
                dimension,
                &config.bounds,
                objective,
                rng,
            )
        });
    }

    /// Runs one full generation and returns how many trials replaced their
    /// target.
    ///
    /// Returns only once every slot's unit has finished; the new population
    /// is committed after that barrier.
    pub fn next_generation(&mut self) -> usize {
        let params = GenerationParams::sample(self.config, &mut self.rng);
        let slot_seeds: Vec<u64> = (0..self.population.len())
            .map(|_| self.rng.random())
            .collect();

        let parents = self.population.snapshot();
        let mut next = parents.clone();

        let objective = self.objective;
        let bounds = &self.config.bounds;
        let snapshot = parents.agents();
        let (agents, scores) = next.slots_mut();

        let accepted = self.pool.install(|| {
            agents
                .par_iter_mut()
                .zip(scores.par_iter_mut())
                .zip(slot_seeds.par_iter())
                .enumerate()
                .map(|(slot, ((agent, score), &seed))| {
                    let mut rng = StdRng::seed_from_u64(seed);
                    let candidate = trial::generate(snapshot, slot, params, bounds, &mut rng);
                    let candidate_score = objective.evaluate(&candidate);
                    if candidate_score < *score {
                        *agent = candidate;
                        *score = candidate_score;
                        true
                    } else {
                        false
                    }
                })
                .filter(|&replaced| replaced)
                .count()
        });

        self.population.commit(next);
        accepted
    }

    /// Mean and best of the committed population, decoded by the objective
    /// when it can.
    pub fn current_stats(&self, generation: usize) -> Option<GenerationStats> {
        GenerationStats::from_scores(generation, self.population.scores())
            .map(|stats| stats.with_breakdown(self.objective.breakdown(stats.best)))
    }
}
