//! Statistics provider contract and lineup assembly.
//!
//! A provider answers two questions: the season statline for a player id,
//! and which games (with announced starters) are scheduled on a date.
//! [`StatBook`] is the in-memory implementation used by the slate tools
//! and tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, SimError};
use crate::models::{BatterStatline, Lineup, LineupBuilder, PitcherStatline};

/// Announced starters for one team in one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterCard {
    pub team: String,
    /// `None` when the starter has not been announced yet.
    #[serde(default)]
    pub pitcher_id: Option<String>,
    #[serde(default)]
    pub batter_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub game_id: String,
    pub date: NaiveDate,
    pub home: RosterCard,
    pub away: RosterCard,
}

pub trait StatsProvider {
    fn pitcher(&self, id: &str) -> Option<PitcherStatline>;

    fn batter(&self, id: &str) -> Option<BatterStatline>;

    /// Games on `date`, in a stable order.
    fn schedule(&self, date: NaiveDate) -> Vec<ScheduledGame>;
}

/// Resolves a roster card into a lineup named after the team.
///
/// Batters without a name in the provider's statline take their id.
///
/// # Errors
/// `MissingLineupData` for a missing or unknown starter, an unknown batter
/// id, or a card without exactly nine batters.
pub fn assemble_lineup<P: StatsProvider + ?Sized>(provider: &P, card: &RosterCard) -> Result<Lineup> {
    let mut builder = LineupBuilder::new(card.team.as_str());

    if let Some(id) = &card.pitcher_id {
        let pitcher = provider
            .pitcher(id)
            .ok_or_else(|| SimError::MissingLineupData(format!("{}: unknown pitcher '{id}'", card.team)))?;
        builder = builder.pitcher(pitcher);
    }

    for id in &card.batter_ids {
        let batter = provider
            .batter(id)
            .ok_or_else(|| SimError::MissingLineupData(format!("{}: unknown batter '{id}'", card.team)))?;
        let batter = if batter.name().is_empty() { batter.renamed(id.as_str()) } else { batter };
        builder = builder.batter(batter);
    }

    builder.build()
}

/// In-memory [`StatsProvider`].
#[derive(Debug, Clone, Default)]
pub struct StatBook {
    pitchers: HashMap<String, PitcherStatline>,
    batters: HashMap<String, BatterStatline>,
    games: Vec<ScheduledGame>,
}

impl StatBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous statline for `id`.
    pub fn insert_pitcher(&mut self, id: impl Into<String>, statline: PitcherStatline) {
        self.pitchers.insert(id.into(), statline);
    }

    pub fn insert_batter(&mut self, id: impl Into<String>, statline: BatterStatline) {
        self.batters.insert(id.into(), statline);
    }

    pub fn add_game(&mut self, game: ScheduledGame) {
        self.games.push(game);
    }

    pub fn pitcher_count(&self) -> usize {
        self.pitchers.len()
    }

    pub fn batter_count(&self) -> usize {
        self.batters.len()
    }

    pub fn games(&self) -> &[ScheduledGame] {
        &self.games
    }
}

impl StatsProvider for StatBook {
    fn pitcher(&self, id: &str) -> Option<PitcherStatline> {
        self.pitchers.get(id).copied()
    }

    fn batter(&self, id: &str) -> Option<BatterStatline> {
        self.batters.get(id).cloned()
    }

    fn schedule(&self, date: NaiveDate) -> Vec<ScheduledGame> {
        let mut games: Vec<ScheduledGame> = self.games.iter().filter(|g| g.date == date).cloned().collect();
        games.sort_by(|a, b| a.game_id.cmp(&b.game_id));
        games
    }
}
