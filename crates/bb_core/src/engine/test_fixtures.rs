//! Shared fixtures for engine tests.

use std::collections::VecDeque;

use super::outcome::AtBatOutcome;
use super::random::RandomSource;
use crate::models::{BatterStatline, Lineup, PitcherStatline};

pub fn league_average_pitcher() -> PitcherStatline {
    PitcherStatline::new(214, 76, 207, 913).unwrap()
}

pub fn league_average_batter(name: &str) -> BatterStatline {
    BatterStatline::builder(name)
        .at_bats(3059)
        .hits(783)
        .extra_base_hits(160, 13, 130)
        .strikeouts(720)
        .batting_average(0.256)
        .build()
        .unwrap()
}

/// Nine identical league-average batters behind a league-average starter.
pub fn sample_lineup(team: &str) -> Lineup {
    let batters = (1..=9).map(|i| league_average_batter(&format!("{team} #{i}"))).collect();
    Lineup::new(team, league_average_pitcher(), batters).unwrap()
}

/// Random source that replays a fixed script of outcomes.
///
/// Uniform draws (tag-out runner selection) always pick the first candidate.
/// Panics when the script runs out.
pub struct ScriptedSource {
    script: VecDeque<usize>,
}

impl ScriptedSource {
    pub fn new(outcomes: impl IntoIterator<Item = AtBatOutcome>) -> Self {
        Self { script: outcomes.into_iter().map(AtBatOutcome::index).collect() }
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self { script: indices.into_iter().collect() }
    }

    pub fn is_exhausted(&self) -> bool {
        self.script.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedSource {
    fn draw_categorical(&mut self, _probabilities: &[f64]) -> usize {
        self.script.pop_front().expect("scripted outcomes exhausted")
    }

    fn draw_uniform_index(&mut self, _count: usize) -> usize {
        0
    }
}

/// `n` strikeouts in a row.
pub fn strikeouts(n: usize) -> Vec<AtBatOutcome> {
    vec![AtBatOutcome::Strikeout; n]
}

/// A scoreless inning: three strikeouts in each half.
pub fn quiet_inning() -> Vec<AtBatOutcome> {
    strikeouts(6)
}

/// `runs` solo home runs followed by three strikeouts.
pub fn scoring_half(runs: usize) -> Vec<AtBatOutcome> {
    let mut half = vec![AtBatOutcome::HomeRun; runs];
    half.extend(strikeouts(3));
    half
}
