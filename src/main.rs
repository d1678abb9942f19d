use diffevo::config::{Config, OutputFormat};
use diffevo::evolution::EvolutionEngine;
use diffevo::objective::{self, Objective};
use diffevo::report::{BenchmarkSummary, RunSummary};
use std::env;
use std::fmt;
use std::path::Path;
use std::process;

/// Picks the gene count for the run.
///
/// Objectives defined for a fixed dimension (the team objective, the
/// two-variable benchmarks) override the configured one.
fn resolve_dimension(configured: usize, objective: &dyn Objective) -> usize {
    match objective.required_dimension() {
        Some(required) if configured != 0 && required != configured => {
            log::warn!(
                "Objective '{}' is defined for dimension {}; ignoring configured dimension {}.",
                objective.name(),
                required,
                configured
            );
            required
        }
        Some(required) => required,
        None => configured,
    }
}

/// Prints a report to stdout in the configured format.
fn emit<T: fmt::Display>(
    report: &T,
    to_json: fn(&T) -> Result<String, serde_json::Error>,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => match to_json(report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to serialize report: {}", e);
                process::exit(1);
            }
        },
    }
}

fn main() {
    env_logger::init();
    log::info!("Booting diffevo...");

    // 1. Load and Validate Configuration
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = match Config::load(Path::new(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load configuration '{}': {}", config_path, e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        log::error!("Invalid configuration: {}", e);
        process::exit(1);
    }
    log::info!("Configuration '{}' loaded and validated.", config_path);

    // 2. Build the Objective (loads and validates the dataset, if any)
    let objective = match objective::build(&config.objective) {
        Ok(o) => o,
        Err(e) => {
            log::error!("Failed to prepare objective: {}", e);
            process::exit(1);
        }
    };
    let dimension = resolve_dimension(config.run.dimension, objective.as_ref());

    // 3. Run the Evolution, repeatedly in benchmark mode
    let repeat = config.output.repeat;
    let mut durations = Vec::with_capacity(repeat);
    for run in 1..=repeat {
        if repeat > 1 {
            log::info!("--- Run {}/{} ---", run, repeat);
        }

        let mut engine = match EvolutionEngine::new(&config.run, objective.as_ref(), dimension) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("Failed to start evolution: {}", e);
                process::exit(1);
            }
        };
        let outcome = engine.evolve();
        durations.push(outcome.elapsed);

        // 4. Report
        let summary = RunSummary::new(&config.run, objective.as_ref(), dimension, &outcome);
        emit(&summary, RunSummary::to_json, config.output.format);
    }

    if repeat > 1 {
        if let Some(benchmark) = BenchmarkSummary::from_durations(&durations) {
            emit(&benchmark, BenchmarkSummary::to_json, config.output.format);
        }
    }
}
