//! At-bat outcome model.
//!
//! Pure mapping from (pitcher statline, batter statline) to a probability
//! vector over the eight at-bat outcomes. The draw itself is left to the
//! caller's [`RandomSource`](super::random::RandomSource).

use serde::{Deserialize, Serialize};

use super::probability_validator::{ProbabilityValidator, OUTCOME_SUM_TOLERANCE};
use crate::error::{Result, SimError};
use crate::models::{BatterStatline, PitcherStatline};

/// Number of at-bat outcome categories.
pub const OUTCOME_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtBatOutcome {
    Single,
    Double,
    Triple,
    HomeRun,
    TagOut,
    Flyout,
    Strikeout,
    Walk,
}

impl AtBatOutcome {
    /// All outcomes in probability-vector order.
    pub const ALL: [AtBatOutcome; OUTCOME_COUNT] = [
        AtBatOutcome::Single,
        AtBatOutcome::Double,
        AtBatOutcome::Triple,
        AtBatOutcome::HomeRun,
        AtBatOutcome::TagOut,
        AtBatOutcome::Flyout,
        AtBatOutcome::Strikeout,
        AtBatOutcome::Walk,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<AtBatOutcome> {
        Self::ALL.get(index).copied()
    }

    /// Tag-outs, flyouts and strikeouts each record one out.
    pub fn is_out(self) -> bool {
        matches!(self, AtBatOutcome::TagOut | AtBatOutcome::Flyout | AtBatOutcome::Strikeout)
    }

    pub fn is_hit(self) -> bool {
        matches!(
            self,
            AtBatOutcome::Single | AtBatOutcome::Double | AtBatOutcome::Triple | AtBatOutcome::HomeRun
        )
    }

    /// Bases every runner (and the batter) moves before any out is recorded.
    pub fn bases_advanced(self) -> u8 {
        match self {
            AtBatOutcome::Single | AtBatOutcome::Walk | AtBatOutcome::TagOut => 1,
            AtBatOutcome::Double => 2,
            AtBatOutcome::Triple => 3,
            AtBatOutcome::HomeRun => 4,
            AtBatOutcome::Flyout | AtBatOutcome::Strikeout => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AtBatOutcome::Single => "1B",
            AtBatOutcome::Double => "2B",
            AtBatOutcome::Triple => "3B",
            AtBatOutcome::HomeRun => "HR",
            AtBatOutcome::TagOut => "TagOut",
            AtBatOutcome::Flyout => "Flyout",
            AtBatOutcome::Strikeout => "K",
            AtBatOutcome::Walk => "BB",
        }
    }
}

/// Validated probability vector, indexed by [`AtBatOutcome::index`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeProbabilities([f64; OUTCOME_COUNT]);

impl OutcomeProbabilities {
    pub fn get(&self, outcome: AtBatOutcome) -> f64 {
        self.0[outcome.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (AtBatOutcome, f64)> + '_ {
        AtBatOutcome::ALL.iter().copied().zip(self.0.iter().copied())
    }

    /// P(the at-bat ends in an out).
    pub fn out_probability(&self) -> f64 {
        self.iter().filter(|(o, _)| o.is_out()).map(|(_, p)| p).sum()
    }
}

/// The at-bat outcome model.
///
/// - `hit = sqrt(H_p/BF_p * BA_b)`, `walk = BB_p/BF_p`, `out = 1 - hit - walk`
/// - hits split by the batter's 2B/3B/HR shares of H (all singles when H = 0)
/// - `k = sqrt(SO_p/BF_p * SO_b/AB_b)` is the strikeout share of outs;
///   the rest splits evenly: `tag_out = flyout = out * (1 - k) / 2`
pub struct OutcomeModel;

impl OutcomeModel {
    /// # Errors
    /// `InvalidStatline` on a zero denominator, when any resulting
    /// probability falls outside [0, 1] (e.g. hit + walk > 1), or when
    /// no out is possible and a half-inning could never end.
    pub fn evaluate(
        pitcher: &PitcherStatline,
        batter: &BatterStatline,
    ) -> Result<OutcomeProbabilities> {
        let bf = pitcher.batters_faced();
        let hit = (ratio(pitcher.hits(), bf, "pitcher BF")? * batter.batting_average()).sqrt();
        let walk = ratio(pitcher.walks(), bf, "pitcher BF")?;

        let out = 1.0 - hit - walk;
        if out < 0.0 {
            return Err(SimError::InvalidStatline(format!(
                "hit ({hit:.6}) + walk ({walk:.6}) probabilities exceed 1 for {}",
                describe(batter)
            )));
        }
        // below the sum tolerance an out is rounding noise, not a chance
        if out <= OUTCOME_SUM_TOLERANCE {
            return Err(SimError::InvalidStatline(format!(
                "hit ({hit:.6}) + walk ({walk:.6}) probabilities leave no chance of an out for {}",
                describe(batter)
            )));
        }

        // singles are counted, not derived as 1 - others, to stay exact
        let (p_single, p_double, p_triple, p_home_run) = if batter.hits() == 0 {
            (1.0, 0.0, 0.0, 0.0)
        } else {
            let h = batter.hits();
            let singles = h
                .checked_sub(batter.doubles())
                .and_then(|n| n.checked_sub(batter.triples()))
                .and_then(|n| n.checked_sub(batter.home_runs()))
                .ok_or_else(|| {
                    SimError::InvalidStatline(format!(
                        "extra-base hits exceed hits for {}",
                        describe(batter)
                    ))
                })?;
            (
                ratio(singles, h, "batter H")?,
                ratio(batter.doubles(), h, "batter H")?,
                ratio(batter.triples(), h, "batter H")?,
                ratio(batter.home_runs(), h, "batter H")?,
            )
        };

        let k = (ratio(pitcher.strikeouts(), bf, "pitcher BF")?
            * ratio(batter.strikeouts(), batter.at_bats(), "batter AB")?)
        .sqrt();
        let contact_out = out * (1.0 - k) * 0.5;

        let probabilities = [
            hit * p_single,
            hit * p_double,
            hit * p_triple,
            hit * p_home_run,
            contact_out,
            contact_out,
            out * k,
            walk,
        ];

        ProbabilityValidator::new()
            .validate_distribution(&probabilities)
            .map_err(|msg| SimError::InvalidStatline(format!("{} ({msg})", describe(batter))))?;

        Ok(OutcomeProbabilities(probabilities))
    }
}

fn ratio(numerator: u32, denominator: u32, what: &str) -> Result<f64> {
    if denominator == 0 {
        return Err(SimError::InvalidStatline(format!("{what} is zero")));
    }
    Ok(f64::from(numerator) / f64::from(denominator))
}

fn describe(batter: &BatterStatline) -> String {
    if batter.name().is_empty() {
        "unnamed batter".to_string()
    } else {
        format!("batter '{}'", batter.name())
    }
}
