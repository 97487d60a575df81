//! # bb_core - Deterministic Monte Carlo Baseball Simulation Engine
//!
//! Estimates the outcome distribution of a baseball game from season
//! statlines of both starting pitchers and batting orders.
//!
//! ## Features
//! - Per-at-bat outcome model over eight outcome categories
//! - Base-runner state machine, half-inning and full-game control flow
//!   (ninth-inning skip rule, extra innings with a runner on second)
//! - Parallel Monte Carlo aggregation into run distributions and win
//!   probabilities, reproducible from a single seed
//! - Plain-text lineup exchange format and a JSON API
//!
//! ```
//! use bb_core::{run_monte_carlo, BatterStatline, Lineup, PitcherStatline, Side};
//! use bb_core::engine::deterministic::seeded_factory;
//!
//! let pitcher = PitcherStatline::new(214, 76, 207, 913)?;
//! let batter = BatterStatline::builder("Everyman")
//!     .at_bats(3059)
//!     .hits(783)
//!     .extra_base_hits(160, 13, 130)
//!     .strikeouts(720)
//!     .batting_average(0.256)
//!     .build()?;
//! let home = Lineup::new("Home", pitcher, vec![batter.clone(); 9])?;
//! let away = Lineup::new("Away", pitcher, vec![batter; 9])?;
//!
//! let dist = run_monte_carlo(&home, &away, 1_000, seeded_factory(7))?;
//! assert_eq!(dist.n_trials(), 1_000);
//! assert!(dist.expected_runs(Side::Home) > 0.0);
//! # Ok::<(), bb_core::SimError>(())
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod models;
pub mod provider;
pub mod simulation;

pub use api::{simulate_matchup, simulate_matchup_json, MatchupRequest, MatchupResponse, SideSummary};
pub use config::SimConfig;
pub use engine::{simulate_game, simulate_game_with_log, AtBatOutcome, GameResult, OutcomeModel, RandomSource};
pub use error::{Result, SimError};
pub use models::{BatterStatline, FinalScore, Lineup, LineupBuilder, PitcherStatline, ScoreBoard, Side};
pub use provider::{assemble_lineup, RosterCard, ScheduledGame, StatBook, StatsProvider};
pub use simulation::{run_monte_carlo, MonteCarloAggregator, RunDistribution};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
