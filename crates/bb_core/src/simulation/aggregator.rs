//! Monte Carlo repetition of [`Game`] and reduction into a [`RunDistribution`].
//!
//! Trials share the two lineups by reference and build everything mutable
//! (batting cursors, bases, scoreboard, random source) inside the trial.
//! Each trial's random source comes from `factory(trial_index)`, so a run is
//! reproducible regardless of thread count, scheduling or batching.

use rayon::prelude::*;
use std::ops::Range;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::distribution::{RunDistribution, RunTally, TrialOutcome};
use crate::config::SimConfig;
use crate::engine::deterministic::{entropy_seed, seeded_factory, trial_rng};
use crate::engine::{Game, GameResult, PlayLog, RandomSource};
use crate::error::{Result, SimError};
use crate::models::Lineup;

/// Runs `n_trials` games on the rayon pool.
///
/// # Errors
/// `InvalidConfig` for `n_trials == 0`; the first `InvalidStatline` raised
/// by any trial aborts the run.
pub fn run_monte_carlo<F, R>(home: &Lineup, away: &Lineup, n_trials: usize, factory: F) -> Result<RunDistribution>
where
    F: Fn(u64) -> R + Sync,
    R: RandomSource,
{
    if n_trials == 0 {
        return Err(SimError::InvalidConfig("n_trials must be at least 1".into()));
    }
    Ok(run_range(home, away, 0..n_trials as u64, &factory, true)?.finish())
}

fn play_trial<R: RandomSource>(home: &Lineup, away: &Lineup, mut rng: R) -> Result<TrialOutcome> {
    let result = Game::new(home, away).play(&mut rng, &mut ())?;
    Ok(TrialOutcome::from(&result))
}

fn run_range<F, R>(home: &Lineup, away: &Lineup, trials: Range<u64>, factory: &F, parallel: bool) -> Result<RunTally>
where
    F: Fn(u64) -> R + Sync,
    R: RandomSource,
{
    if parallel {
        trials
            .into_par_iter()
            .try_fold(RunTally::new, |mut tally, i| {
                tally.record(play_trial(home, away, factory(i))?);
                Ok::<_, SimError>(tally)
            })
            .try_reduce(RunTally::new, |a, b| Ok(a.merge(b)))
    } else {
        let mut tally = RunTally::new();
        for i in trials {
            tally.record(play_trial(home, away, factory(i))?);
        }
        Ok(tally)
    }
}

/// Config-driven aggregation runs.
#[derive(Debug, Clone)]
pub struct MonteCarloAggregator {
    config: SimConfig,
    seed: u64,
}

impl MonteCarloAggregator {
    /// Validates the config and fixes the base seed (drawn from OS entropy
    /// when the config has none).
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(entropy_seed);
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Base seed actually used.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// `n_trials` games with a caller-supplied random source per trial.
    pub fn run<F, R>(&self, home: &Lineup, away: &Lineup, n_trials: usize, factory: F) -> Result<RunDistribution>
    where
        F: Fn(u64) -> R + Sync,
        R: RandomSource,
    {
        if n_trials == 0 {
            return Err(SimError::InvalidConfig("n_trials must be at least 1".into()));
        }

        let started = Instant::now();
        info!(n_trials, parallel = self.config.parallel, home = home.name(), away = away.name(), "aggregation started");

        let dist = run_range(home, away, 0..n_trials as u64, &factory, self.config.parallel)?.finish();

        info!(
            n_trials = dist.n_trials(),
            home_win = dist.home_win_probability(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "aggregation finished"
        );
        Ok(dist)
    }

    /// Runs according to the config with the default seeded factory:
    /// fixed `n_trials`, or early stopping when `target_std_error` is set.
    pub fn run_seeded(&self, home: &Lineup, away: &Lineup) -> Result<RunDistribution> {
        let factory = seeded_factory(self.seed);
        if self.config.early_stopping() {
            self.run_until_converged(home, away, factory)
        } else {
            self.run(home, away, self.config.n_trials, factory)
        }
    }

    /// Runs batches of `batch_size` trials until the home-win standard error
    /// reaches `target_std_error` (checked once at least `n_trials` games are
    /// in) or `max_trials` games have been played.
    ///
    /// Trial indices continue across batches, so the result equals a single
    /// [`Self::run`] of the same total length.
    pub fn run_until_converged<F, R>(&self, home: &Lineup, away: &Lineup, factory: F) -> Result<RunDistribution>
    where
        F: Fn(u64) -> R + Sync,
        R: RandomSource,
    {
        let Some(target) = self.config.target_std_error else {
            return Err(SimError::InvalidConfig("run_until_converged requires target_std_error".into()));
        };

        let started = Instant::now();
        let max_trials = self.config.max_trials as u64;
        let mut batch_size = self.config.batch_size as u64;
        if batch_size > max_trials {
            warn!(batch_size, max_trials, "batch_size exceeds max_trials, clamping");
            batch_size = max_trials;
        }
        info!(target_std_error = target, max_trials, batch_size, "early-stopping aggregation started");

        let mut tally = RunTally::new();
        let mut done = 0u64;
        let dist = loop {
            let end = (done + batch_size).min(max_trials);
            tally = tally.merge(run_range(home, away, done..end, &factory, self.config.parallel)?);
            done = end;

            let dist = tally.clone().finish();
            let std_error = dist.home_win_std_error();
            debug!(trials = done, std_error, home_win = dist.home_win_probability(), "batch finished");

            let converged = done >= self.config.n_trials as u64 && std_error <= target;
            if converged || done >= max_trials {
                break dist;
            }
        };

        info!(
            n_trials = dist.n_trials(),
            std_error = dist.home_win_std_error(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "early-stopping aggregation finished"
        );
        Ok(dist)
    }

    /// Replays trial `trial_index` of [`Self::run_seeded`] with a full play log.
    pub fn replay_trial(&self, home: &Lineup, away: &Lineup, trial_index: u64) -> Result<(GameResult, PlayLog)> {
        let mut log = PlayLog::new();
        let result = Game::new(home, away).play(&mut trial_rng(self.seed, trial_index), &mut log)?;
        Ok((result, log))
    }
}
