//! Run distributions built from many simulated games.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::GameResult;
use crate::models::{FinalScore, Side};

/// What the aggregator keeps from one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub score: FinalScore,
    pub extra_innings: bool,
}

impl From<&GameResult> for TrialOutcome {
    fn from(result: &GameResult) -> Self {
        Self { score: result.score, extra_innings: result.went_to_extra_innings() }
    }
}

/// Number of trials that ended with one exact final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCount {
    pub home: u32,
    pub away: u32,
    pub count: u64,
}

/// Mutable accumulator. Tallies from disjoint trial ranges merge into the
/// same counts in any order.
#[derive(Debug, Clone, Default)]
pub struct RunTally {
    joint: BTreeMap<(u32, u32), u64>,
    extra_inning_games: u64,
}

impl RunTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, trial: TrialOutcome) {
        debug_assert_ne!(trial.score.home, trial.score.away, "simulated game ended tied");
        *self.joint.entry(trial.score.as_pair()).or_insert(0) += 1;
        if trial.extra_innings {
            self.extra_inning_games += 1;
        }
    }

    pub fn merge(mut self, other: RunTally) -> RunTally {
        for (score, count) in other.joint {
            *self.joint.entry(score).or_insert(0) += count;
        }
        self.extra_inning_games += other.extra_inning_games;
        self
    }

    pub fn trials(&self) -> u64 {
        self.joint.values().sum()
    }

    pub fn finish(self) -> RunDistribution {
        let max_runs = self.joint.keys().map(|&(h, a)| h.max(a)).max();
        let bins = max_runs.map_or(0, |m| m as usize + 1);

        let mut home_counts = vec![0u64; bins];
        let mut away_counts = vec![0u64; bins];
        let mut home_wins = 0u64;
        let mut n_trials = 0u64;
        let mut joint = Vec::with_capacity(self.joint.len());

        for ((home, away), count) in self.joint {
            home_counts[home as usize] += count;
            away_counts[away as usize] += count;
            if home > away {
                home_wins += count;
            }
            n_trials += count;
            joint.push(ScoreCount { home, away, count });
        }

        RunDistribution {
            n_trials,
            home_counts,
            away_counts,
            joint,
            home_wins,
            extra_inning_games: self.extra_inning_games,
        }
    }
}

impl Extend<TrialOutcome> for RunTally {
    fn extend<I: IntoIterator<Item = TrialOutcome>>(&mut self, iter: I) {
        for trial in iter {
            self.record(trial);
        }
    }
}

impl FromIterator<TrialOutcome> for RunTally {
    fn from_iter<I: IntoIterator<Item = TrialOutcome>>(iter: I) -> Self {
        let mut tally = RunTally::new();
        tally.extend(iter);
        tally
    }
}

/// Final-score statistics over `n_trials` games.
///
/// Both histograms have one bin per run value from 0 to the largest total
/// observed on either side; there is no overflow bin. The joint table is
/// sorted by `(home, away)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDistribution {
    n_trials: u64,
    home_counts: Vec<u64>,
    away_counts: Vec<u64>,
    joint: Vec<ScoreCount>,
    home_wins: u64,
    extra_inning_games: u64,
}

impl RunDistribution {
    pub fn n_trials(&self) -> u64 {
        self.n_trials
    }

    /// Raw counts indexed by run total.
    pub fn histogram(&self, side: Side) -> &[u64] {
        match side {
            Side::Home => &self.home_counts,
            Side::Away => &self.away_counts,
        }
    }

    /// Normalized histogram.
    pub fn probabilities(&self, side: Side) -> Vec<f64> {
        let n = self.n_trials.max(1) as f64;
        self.histogram(side).iter().map(|&c| c as f64 / n).collect()
    }

    /// Σ x·P(x)
    pub fn expected_runs(&self, side: Side) -> f64 {
        if self.n_trials == 0 {
            return 0.0;
        }
        let total: u64 = self.histogram(side).iter().enumerate().map(|(runs, &c)| runs as u64 * c).sum();
        total as f64 / self.n_trials as f64
    }

    /// Most frequent run total; the lowest one wins a tie.
    pub fn most_probable(&self, side: Side) -> u32 {
        let counts = self.histogram(side);
        let mut best = 0usize;
        for (runs, &count) in counts.iter().enumerate() {
            if count > counts[best] {
                best = runs;
            }
        }
        best as u32
    }

    /// Empirical P(home > away).
    pub fn home_win_probability(&self) -> f64 {
        if self.n_trials == 0 {
            return 0.0;
        }
        self.home_wins as f64 / self.n_trials as f64
    }

    pub fn away_win_probability(&self) -> f64 {
        if self.n_trials == 0 {
            return 0.0;
        }
        1.0 - self.home_win_probability()
    }

    /// sqrt(p(1-p)/n) of [`Self::home_win_probability`].
    pub fn home_win_std_error(&self) -> f64 {
        if self.n_trials == 0 {
            return f64::INFINITY;
        }
        let p = self.home_win_probability();
        (p * (1.0 - p) / self.n_trials as f64).sqrt()
    }

    /// Σ_r P(H=r)·P(A<r), treating the two marginals as independent.
    ///
    /// Ignores the correlation the game rules introduce (skipped bottom
    /// halves, extra innings), so it differs from the empirical value.
    pub fn marginal_home_win_probability(&self) -> f64 {
        let home = self.probabilities(Side::Home);
        let away = self.probabilities(Side::Away);

        let mut away_below = 0.0;
        let mut total = 0.0;
        for (runs, p_home) in home.iter().enumerate() {
            total += p_home * away_below;
            away_below += away.get(runs).copied().unwrap_or(0.0);
        }
        total
    }

    /// P(home = `home`, away = `away`)
    pub fn score_probability(&self, home: u32, away: u32) -> f64 {
        if self.n_trials == 0 {
            return 0.0;
        }
        self.joint
            .binary_search_by(|s| (s.home, s.away).cmp(&(home, away)))
            .map_or(0.0, |i| self.joint[i].count as f64 / self.n_trials as f64)
    }

    /// Most frequent exact final score; the smallest `(home, away)` wins a tie.
    pub fn most_probable_score(&self) -> Option<FinalScore> {
        let mut best: Option<&ScoreCount> = None;
        for entry in &self.joint {
            if best.map_or(true, |b| entry.count > b.count) {
                best = Some(entry);
            }
        }
        best.map(|s| FinalScore { home: s.home, away: s.away })
    }

    pub fn joint(&self) -> &[ScoreCount] {
        &self.joint
    }

    /// Share of games that went past nine innings.
    pub fn extra_inning_rate(&self) -> f64 {
        if self.n_trials == 0 {
            return 0.0;
        }
        self.extra_inning_games as f64 / self.n_trials as f64
    }

    pub fn merge(&self, other: &RunDistribution) -> RunDistribution {
        let mut tally = self.to_tally();
        tally = tally.merge(other.to_tally());
        tally.finish()
    }

    fn to_tally(&self) -> RunTally {
        RunTally {
            joint: self.joint.iter().map(|s| ((s.home, s.away), s.count)).collect(),
            extra_inning_games: self.extra_inning_games,
        }
    }
}
