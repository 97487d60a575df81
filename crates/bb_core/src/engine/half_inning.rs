//! One team's turn at bat.

use super::base_state::BaseState;
use super::outcome::{AtBatOutcome, OutcomeModel, OUTCOME_COUNT};
use super::play_log::{AtBatEvent, PlayObserver};
use super::random::RandomSource;
use crate::error::{Result, SimError};
use crate::models::{BattingOrder, Side};

pub const OUTS_PER_HALF_INNING: u8 = 3;

/// Which half-inning is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfInning {
    pub inning: u32,
    pub batting: Side,
    /// Extra-inning rule: start with a runner on second.
    pub tie_break: bool,
}

impl HalfInning {
    /// Plays at-bats until three outs and returns the runs scored.
    ///
    /// Each at-bat consumes one slot of `offense`'s batting order and one
    /// categorical draw (plus one uniform draw for a tag-out with more than
    /// one runner on). There is no cap on at-bats or runs.
    ///
    /// # Errors
    /// Propagates `InvalidStatline` from the outcome model; `InvalidDraw`
    /// when the random source answers outside the offered range.
    pub fn play<R, O>(
        &self,
        offense: &mut BattingOrder<'_>,
        defense: &BattingOrder<'_>,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<u32>
    where
        R: RandomSource + ?Sized,
        O: PlayObserver + ?Sized,
    {
        let mut bases = BaseState::for_half_inning(self.tie_break);
        let pitcher = defense.current_pitcher();
        let mut outs = 0u8;

        while outs < OUTS_PER_HALF_INNING {
            let batter_slot = offense.cursor();
            let batter = offense.next_batter();
            let probabilities = OutcomeModel::evaluate(pitcher, batter)?;

            let index = rng.draw_categorical(probabilities.as_slice());
            let outcome = AtBatOutcome::from_index(index)
                .ok_or(SimError::InvalidDraw { index, categories: OUTCOME_COUNT })?;

            let runs_before = bases.runs();
            apply_outcome(&mut bases, outcome, rng)?;
            if outcome.is_out() {
                outs += 1;
            }

            observer.on_at_bat(&AtBatEvent {
                inning: self.inning,
                batting: self.batting,
                batter_slot,
                outcome,
                runs_scored: bases.runs() - runs_before,
                outs_after: outs,
                bases_after: bases.occupied(),
            });
        }

        observer.on_half_inning_end(self.inning, self.batting, bases.runs());
        Ok(bases.runs())
    }
}

/// Applies one at-bat result to the bases.
///
/// A tag-out advances everyone one base first, then retires one runner
/// (chosen uniformly among occupied bases).
pub fn apply_outcome<R: RandomSource + ?Sized>(
    bases: &mut BaseState,
    outcome: AtBatOutcome,
    rng: &mut R,
) -> Result<()> {
    match outcome {
        AtBatOutcome::TagOut => {
            bases.advance(1);
            bases.record_out(None, rng)?;
        }
        AtBatOutcome::Flyout | AtBatOutcome::Strikeout => {}
        hit_or_walk => {
            bases.advance(hit_or_walk.bases_advanced());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::play_log::PlayLog;
    use crate::engine::test_fixtures::{sample_lineup, ScriptedSource};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn top_of(inning: u32) -> HalfInning {
        HalfInning { inning, batting: Side::Away, tie_break: false }
    }

    #[test]
    fn test_three_strikeouts_score_nothing() {
        let offense_lineup = sample_lineup("Offense");
        let defense_lineup = sample_lineup("Defense");
        let mut offense = offense_lineup.batting_order();
        let defense = defense_lineup.batting_order();

        let mut rng = ScriptedSource::new([AtBatOutcome::Strikeout; 3]);
        let runs = top_of(1).play(&mut offense, &defense, &mut rng, &mut ()).unwrap();

        assert_eq!(runs, 0);
        assert_eq!(offense.cursor(), 3);
        assert!(rng.is_exhausted());
    }

    #[test]
    fn test_scripted_rally() {
        let offense_lineup = sample_lineup("Offense");
        let defense_lineup = sample_lineup("Defense");
        let mut offense = offense_lineup.batting_order();
        let defense = defense_lineup.batting_order();

        use AtBatOutcome::*;
        // BB, 1B -> 1st & 2nd; HR -> 3 runs; K, Flyout, TagOut (bases empty -> batter out)
        let mut rng = ScriptedSource::new([Walk, Single, HomeRun, Strikeout, Flyout, TagOut]);
        let mut log = PlayLog::new();
        let runs = top_of(4).play(&mut offense, &defense, &mut rng, &mut log).unwrap();

        assert_eq!(runs, 3);
        assert_eq!(log.len(), 6);
        assert_eq!(log.events()[2].runs_scored, 3);
        assert_eq!(log.events()[5].outs_after, 3);
        assert_eq!(log.events()[5].bases_after, [false, false, false]);
        assert_eq!(offense.cursor(), 6);
    }

    #[test]
    fn test_tie_break_runner_can_score() {
        let offense_lineup = sample_lineup("Offense");
        let defense_lineup = sample_lineup("Defense");
        let mut offense = offense_lineup.batting_order_from(7);
        let defense = defense_lineup.batting_order();

        use AtBatOutcome::*;
        let mut rng = ScriptedSource::new([Double, Strikeout, Strikeout, Strikeout]);
        let half = HalfInning { inning: 10, batting: Side::Home, tie_break: true };
        let runs = half.play(&mut offense, &defense, &mut rng, &mut ()).unwrap();

        assert_eq!(runs, 1);
        // cursor wrapped: 7, 8, 0, 1 batted
        assert_eq!(offense.cursor(), 2);
    }

    #[test]
    fn test_invalid_draw_is_reported() {
        let offense_lineup = sample_lineup("Offense");
        let defense_lineup = sample_lineup("Defense");
        let mut offense = offense_lineup.batting_order();
        let defense = defense_lineup.batting_order();

        let mut rng = ScriptedSource::from_indices([12]);
        let err = top_of(1).play(&mut offense, &defense, &mut rng, &mut ()).unwrap_err();
        assert!(matches!(err, SimError::InvalidDraw { index: 12, categories: 8 }));
    }

    proptest! {
        /// Property: a half-inning ends with exactly three outs, never more
        #[test]
        fn prop_half_inning_terminates_with_three_outs(seed in any::<u64>(), start in 0usize..9) {
            let offense_lineup = sample_lineup("Offense");
            let defense_lineup = sample_lineup("Defense");
            let mut offense = offense_lineup.batting_order_from(start);
            let defense = defense_lineup.batting_order();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut log = PlayLog::new();

            let runs = top_of(1).play(&mut offense, &defense, &mut rng, &mut log).unwrap();

            let outs = log.events().iter().filter(|e| e.outcome.is_out()).count();
            prop_assert_eq!(outs, 3);
            prop_assert_eq!(log.events().last().map(|e| e.outs_after), Some(3));
            prop_assert_eq!(runs, log.events().iter().map(|e| e.runs_scored).sum::<u32>());
            prop_assert_eq!(offense.cursor(), (start + log.len()) % 9);
        }
    }
}
