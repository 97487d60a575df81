pub mod base_state;
pub mod deterministic; // per-trial ChaCha streams, FxHash-derived seeds
pub mod game; // Game FSM: regulation, ninth-inning skip rule, extra innings
pub mod half_inning;
pub mod outcome; // OutcomeModel: (pitcher, batter) -> 8 outcome probabilities
pub mod play_log;
pub mod probability_validator;
pub mod random;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use base_state::{Base, BaseState};
pub use game::{simulate_game, simulate_game_with_log, Game, GamePhase, GameResult, REGULATION_INNINGS};
pub use half_inning::{HalfInning, OUTS_PER_HALF_INNING};
pub use outcome::{AtBatOutcome, OutcomeModel, OutcomeProbabilities, OUTCOME_COUNT};
pub use play_log::{AtBatEvent, PlayLog, PlayObserver};
pub use probability_validator::ProbabilityValidator;
pub use random::{weighted_choice_index, RandomSource};
