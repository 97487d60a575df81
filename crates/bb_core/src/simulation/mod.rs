//! Monte Carlo aggregation over many simulated games.

pub mod aggregator;
pub mod distribution;

pub use aggregator::{run_monte_carlo, MonteCarloAggregator};
pub use distribution::{RunDistribution, RunTally, ScoreCount, TrialOutcome};
