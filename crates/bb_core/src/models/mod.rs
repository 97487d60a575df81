//! Data model: statlines, lineups and the scoreboard.

pub mod lineup;
pub mod scoreboard;
pub mod statline;

pub use lineup::{BattingOrder, Lineup, LineupBuilder, BATTING_ORDER_LEN};
pub use scoreboard::{FinalScore, InningLine, ScoreBoard, Side};
pub use statline::{BatterStatline, BatterStatlineBuilder, PitcherStatline};
