//! Differential evolution (DE/rand/1/bin) over real-valued agents, with a
//! bounded worker pool, double-buffered generations and pluggable objectives.

pub mod config;
pub mod data;
pub mod evolution;
pub mod objective;
pub mod report;
