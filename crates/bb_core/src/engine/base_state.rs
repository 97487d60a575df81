//! Runners on base and runs scored for one half-inning.

use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Base {
    First,
    Second,
    Third,
}

impl Base {
    pub const ALL: [Base; 3] = [Base::First, Base::Second, Base::Third];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Base occupancy plus the half-inning's run counter.
///
/// Created fresh for every half-inning. The run counter only grows; the
/// half-inning driver hands it to the scoreboard when three outs are made.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseState {
    occupied: [bool; 3],
    runs: u32,
}

impl BaseState {
    /// Empty bases, no runs.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Extra-inning start: a runner placed on second.
    pub fn with_tie_break_runner() -> Self {
        Self { occupied: [false, true, false], runs: 0 }
    }

    pub fn for_half_inning(tie_break: bool) -> Self {
        if tie_break {
            Self::with_tie_break_runner()
        } else {
            Self::empty()
        }
    }

    /// Moves every runner `n` bases and puts the batter on.
    ///
    /// Applied one base at a time: the runner on third scores, the others
    /// shift up, and the batter takes first on the first step only. Existing
    /// runners move before the batter is placed, so a home run (`n = 4`)
    /// clears the bases and scores the batter too. Returns runs scored.
    pub fn advance(&mut self, n: u8) -> u32 {
        let before = self.runs;
        for step in 0..n {
            let [first, second, third] = self.occupied;
            if third {
                self.runs += 1;
            }
            self.occupied = [step == 0, first, second];
        }
        self.runs - before
    }

    /// Retires one runner without touching the run counter.
    ///
    /// With `at_base = None` the runner is chosen uniformly among occupied
    /// bases. Returns the base that was cleared, `None` when it was empty.
    ///
    /// # Errors
    /// `InvalidDraw` when the random source picks an index outside the
    /// occupied bases.
    pub fn record_out<R: RandomSource + ?Sized>(
        &mut self,
        at_base: Option<Base>,
        rng: &mut R,
    ) -> Result<Option<Base>> {
        let base = match at_base {
            Some(base) => base,
            None => {
                let candidates: Vec<Base> =
                    Base::ALL.iter().copied().filter(|b| self.is_occupied(*b)).collect();
                if candidates.is_empty() {
                    return Ok(None);
                }
                let index = rng.draw_uniform_index(candidates.len());
                *candidates
                    .get(index)
                    .ok_or(SimError::InvalidDraw { index, categories: candidates.len() })?
            }
        };

        if !self.occupied[base.index()] {
            return Ok(None);
        }
        self.occupied[base.index()] = false;
        Ok(Some(base))
    }

    pub fn is_occupied(&self, base: Base) -> bool {
        self.occupied[base.index()]
    }

    pub fn occupied(&self) -> [bool; 3] {
        self.occupied
    }

    pub fn runners_on(&self) -> usize {
        self.occupied.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        self.runners_on() == 0
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }
}
