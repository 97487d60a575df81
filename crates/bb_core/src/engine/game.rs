//! Game control flow as a finite state machine.
//!
//! ```text
//! RegularInning(1) -> ... -> RegularInning(8) -> NinthInning
//! NinthInning   -> GameOver                     (home leads after the top half)
//!               -> GameOver | ExtraInning(1)    (after both halves)
//! ExtraInning(k) -> GameOver | ExtraInning(k+1)
//! ```
//!
//! Extra-inning halves start with a runner on second. The loop only exits on
//! a strict score difference, so a finished game is never tied.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::half_inning::HalfInning;
use super::play_log::{PlayLog, PlayObserver};
use super::random::RandomSource;
use crate::error::Result;
use crate::models::{BattingOrder, FinalScore, Lineup, ScoreBoard, Side};

pub const REGULATION_INNINGS: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Innings 1..=8: both halves always played.
    RegularInning(u32),
    NinthInning,
    /// k-th extra inning (inning 9 + k).
    ExtraInning(u32),
    GameOver(FinalScore),
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::GameOver(_))
    }

    /// 1-based inning number, `None` once the game is over.
    pub fn inning(&self) -> Option<u32> {
        match *self {
            GamePhase::RegularInning(i) => Some(i),
            GamePhase::NinthInning => Some(REGULATION_INNINGS),
            GamePhase::ExtraInning(k) => Some(REGULATION_INNINGS + k),
            GamePhase::GameOver(_) => None,
        }
    }
}

/// A finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub score: FinalScore,
    pub scoreboard: ScoreBoard,
}

impl GameResult {
    pub fn innings_played(&self) -> u32 {
        self.scoreboard.innings_played()
    }

    pub fn went_to_extra_innings(&self) -> bool {
        self.innings_played() > REGULATION_INNINGS
    }
}

/// One game in progress: both batting cursors, the scoreboard and the phase.
#[derive(Debug, Clone)]
pub struct Game<'a> {
    home: BattingOrder<'a>,
    away: BattingOrder<'a>,
    scoreboard: ScoreBoard,
    phase: GamePhase,
}

impl<'a> Game<'a> {
    /// New game, both leadoff hitters due up.
    pub fn new(home: &'a Lineup, away: &'a Lineup) -> Self {
        Self::resume(home.batting_order(), away.batting_order(), ScoreBoard::new(), GamePhase::RegularInning(1))
    }

    /// Continues from an arbitrary situation, e.g. a live game's score
    /// entering the ninth.
    pub fn resume(
        home: BattingOrder<'a>,
        away: BattingOrder<'a>,
        scoreboard: ScoreBoard,
        phase: GamePhase,
    ) -> Self {
        Self { home, away, scoreboard, phase }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }

    /// Plays one inning (one state transition) and returns the new phase.
    pub fn step<R, O>(&mut self, rng: &mut R, observer: &mut O) -> Result<GamePhase>
    where
        R: RandomSource + ?Sized,
        O: PlayObserver + ?Sized,
    {
        self.phase = match self.phase {
            GamePhase::RegularInning(i) => {
                let away = self.play_half(i, Side::Away, false, rng, observer)?;
                self.scoreboard.record_top(away);
                let home = self.play_half(i, Side::Home, false, rng, observer)?;
                self.scoreboard.record_bottom(home);

                if i + 1 < REGULATION_INNINGS {
                    GamePhase::RegularInning(i + 1)
                } else {
                    GamePhase::NinthInning
                }
            }
            GamePhase::NinthInning => {
                self.play_deciding_inning(REGULATION_INNINGS, false, GamePhase::ExtraInning(1), rng, observer)?
            }
            GamePhase::ExtraInning(k) => self.play_deciding_inning(
                REGULATION_INNINGS + k,
                true,
                GamePhase::ExtraInning(k + 1),
                rng,
                observer,
            )?,
            over @ GamePhase::GameOver(_) => over,
        };

        trace!(phase = ?self.phase, home = self.scoreboard.home(), away = self.scoreboard.away(), "inning complete");
        Ok(self.phase)
    }

    /// Plays to completion.
    ///
    /// # Errors
    /// `InvalidStatline` from the outcome model aborts the game.
    pub fn play<R, O>(mut self, rng: &mut R, observer: &mut O) -> Result<GameResult>
    where
        R: RandomSource + ?Sized,
        O: PlayObserver + ?Sized,
    {
        loop {
            if let GamePhase::GameOver(score) = self.step(rng, observer)? {
                debug_assert_ne!(score.home, score.away, "finished game must not be tied");
                return Ok(GameResult { score, scoreboard: self.scoreboard });
            }
        }
    }

    /// Ninth or extra inning: the home half is skipped when the home team
    /// already leads after the top half; a tie after both halves continues.
    fn play_deciding_inning<R, O>(
        &mut self,
        inning: u32,
        tie_break: bool,
        if_tied: GamePhase,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<GamePhase>
    where
        R: RandomSource + ?Sized,
        O: PlayObserver + ?Sized,
    {
        let away = self.play_half(inning, Side::Away, tie_break, rng, observer)?;
        self.scoreboard.record_top(away);

        // 홈팀 리드 시 9회말(연장 말) 생략
        if self.scoreboard.home_leads() {
            return Ok(GamePhase::GameOver(self.final_score()));
        }

        let home = self.play_half(inning, Side::Home, tie_break, rng, observer)?;
        self.scoreboard.record_bottom(home);

        if self.scoreboard.is_tied() {
            Ok(if_tied)
        } else {
            Ok(GamePhase::GameOver(self.final_score()))
        }
    }

    fn play_half<R, O>(
        &mut self,
        inning: u32,
        batting: Side,
        tie_break: bool,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<u32>
    where
        R: RandomSource + ?Sized,
        O: PlayObserver + ?Sized,
    {
        let half = HalfInning { inning, batting, tie_break };
        match batting {
            Side::Away => half.play(&mut self.away, &self.home, rng, observer),
            Side::Home => half.play(&mut self.home, &self.away, rng, observer),
        }
    }

    fn final_score(&self) -> FinalScore {
        FinalScore { home: self.scoreboard.home(), away: self.scoreboard.away() }
    }
}

/// Simulates one full game.
///
/// # Errors
/// `InvalidStatline` when any batter/pitcher pair cannot be modeled.
pub fn simulate_game<R: RandomSource + ?Sized>(
    home: &Lineup,
    away: &Lineup,
    rng: &mut R,
) -> Result<FinalScore> {
    Ok(Game::new(home, away).play(rng, &mut ())?.score)
}

/// Simulates one full game and keeps its at-bat trace.
pub fn simulate_game_with_log<R: RandomSource + ?Sized>(
    home: &Lineup,
    away: &Lineup,
    rng: &mut R,
) -> Result<(GameResult, PlayLog)> {
    let mut log = PlayLog::new();
    let result = Game::new(home, away).play(rng, &mut log)?;
    Ok((result, log))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::outcome::AtBatOutcome;
    use crate::engine::test_fixtures::{quiet_inning, sample_lineup, scoring_half, strikeouts, ScriptedSource};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn board_after_eight(home: u32, away: u32) -> ScoreBoard {
        let mut board = ScoreBoard::new();
        board.record_top(away);
        board.record_bottom(home);
        for _ in 1..8 {
            board.record_top(0);
            board.record_bottom(0);
        }
        board
    }

    #[test]
    fn test_ninth_inning_home_bats_when_trailing() {
        // 2-2 entering the ninth, away scores 3: home still bats
        let home = sample_lineup("Home");
        let away = sample_lineup("Away");
        let mut game = Game::resume(
            home.batting_order(),
            away.batting_order(),
            board_after_eight(2, 2),
            GamePhase::NinthInning,
        );

        let mut script = scoring_half(3);
        script.extend(strikeouts(3));
        let mut rng = ScriptedSource::new(script);
        let phase = game.step(&mut rng, &mut ()).unwrap();

        assert!(rng.is_exhausted(), "home half must consume the last three outs");
        assert_eq!(phase, GamePhase::GameOver(FinalScore { home: 2, away: 5 }));
        assert_eq!(game.scoreboard().innings()[8].home, Some(0));
    }

    #[test]
    fn test_ninth_inning_skipped_when_home_leads() {
        // 3-2 entering the ninth, away scores 0: bottom of the ninth is skipped
        let home = sample_lineup("Home");
        let away = sample_lineup("Away");
        let mut game = Game::resume(
            home.batting_order(),
            away.batting_order(),
            board_after_eight(3, 2),
            GamePhase::NinthInning,
        );

        let mut rng = ScriptedSource::new(strikeouts(6));
        let phase = game.step(&mut rng, &mut ()).unwrap();

        assert_eq!(phase, GamePhase::GameOver(FinalScore { home: 3, away: 2 }));
        assert_eq!(rng.remaining(), 3, "home half must not be played");
        assert_eq!(game.scoreboard().innings()[8].home, None);
    }

    #[test]
    fn test_tied_after_nine_goes_to_extras_with_runner_on_second() {
        let home = sample_lineup("Home");
        let away = sample_lineup("Away");

        use AtBatOutcome::*;
        let mut script: Vec<AtBatOutcome> = (0..9).flat_map(|_| quiet_inning()).collect();
        // top 10th: double scores the runner from second
        script.push(Double);
        script.extend(strikeouts(3));
        // bottom 10th: 1st & 3rd, double scores one (2nd & 3rd), single scores one;
        // no walk-off, so the half still ends on three outs
        script.extend([Single, Double, Single]);
        script.extend(strikeouts(3));

        let mut rng = ScriptedSource::new(script);
        let mut log = PlayLog::new();
        let result = Game::new(&home, &away).play(&mut rng, &mut log).unwrap();

        assert_eq!(result.score, FinalScore { home: 2, away: 1 });
        assert_eq!(result.innings_played(), 10);
        assert!(result.went_to_extra_innings());
        assert!(rng.is_exhausted());
        assert_eq!(log.events().last().map(|e| e.outs_after), Some(3));
    }

    #[test]
    fn test_regular_innings_always_play_both_halves() {
        let home = sample_lineup("Home");
        let away = sample_lineup("Away");
        let mut game = Game::new(&home, &away);

        // home leads big after one, yet the bottom of the 2nd is still played
        let mut script = strikeouts(3);
        script.extend(scoring_half(4));
        script.extend(quiet_inning());
        let mut rng = ScriptedSource::new(script);

        assert_eq!(game.step(&mut rng, &mut ()).unwrap(), GamePhase::RegularInning(2));
        assert_eq!(game.step(&mut rng, &mut ()).unwrap(), GamePhase::RegularInning(3));
        assert!(rng.is_exhausted());
        assert_eq!(game.scoreboard().home(), 4);
    }

    #[test]
    fn test_cursor_persists_across_innings() {
        let home = sample_lineup("Home");
        let away = sample_lineup("Away");
        let mut log = PlayLog::new();

        // every half-inning is three up, three down: the away order cycles 0..9
        let mut script: Vec<AtBatOutcome> = (0..9).flat_map(|_| quiet_inning()).collect();
        // top 10th: home run with the tie-break runner aboard, then 1-2-3 bottom
        script.extend(scoring_half(1));
        script.extend(strikeouts(3));
        let mut rng = ScriptedSource::new(script);
        let result = Game::new(&home, &away).play(&mut rng, &mut log).unwrap();

        assert_eq!(result.score, FinalScore { home: 0, away: 2 });
        let away_slots: Vec<usize> =
            log.events().iter().filter(|e| e.batting == Side::Away).map(|e| e.batter_slot).collect();
        assert_eq!(&away_slots[..4], &[0, 1, 2, 3]);
        assert_eq!(away_slots[9], 0);
        // 27 outs in nine innings, then the 10th starts with slot 0 again
        assert_eq!(away_slots[27], 0);
    }

    #[test]
    fn test_seeded_game_is_reproducible() {
        let home = sample_lineup("Home");
        let away = sample_lineup("Away");

        let (a, log_a) = simulate_game_with_log(&home, &away, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
        let (b, log_b) = simulate_game_with_log(&home, &away, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();

        assert_eq!(a, b);
        assert_eq!(log_a.outcomes(), log_b.outcomes());
        assert!(a.innings_played() >= REGULATION_INNINGS);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: no sequence of draws ends a game tied
        #[test]
        fn prop_final_score_never_tied(seed in any::<u64>()) {
            let home = sample_lineup("Home");
            let away = sample_lineup("Away");
            let result = Game::new(&home, &away).play(&mut ChaCha8Rng::seed_from_u64(seed), &mut ()).unwrap();

            prop_assert_ne!(result.score.home, result.score.away);
            prop_assert_eq!(result.score.home, result.scoreboard.home());
            prop_assert!(result.innings_played() >= REGULATION_INNINGS);

            // only the final inning may have a skipped bottom half
            let innings = result.scoreboard.innings();
            for line in &innings[..innings.len() - 1] {
                prop_assert!(line.home.is_some());
            }
        }
    }
}
