//! Lineup templates and per-game batting cursors.
//!
//! A [`Lineup`] is immutable and can be shared by reference across any number
//! of concurrently running trials. The "who is due up" position lives in a
//! separate [`BattingOrder`], created fresh for each team in each game.

use serde::{Deserialize, Serialize};

use super::statline::{BatterStatline, PitcherStatline};
use crate::error::{Result, SimError};

/// Batters in a batting order.
pub const BATTING_ORDER_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LineupRecord")]
pub struct Lineup {
    name: String,
    pitcher: PitcherStatline,
    batters: Vec<BatterStatline>,
}

#[derive(Deserialize)]
struct LineupRecord {
    #[serde(default)]
    name: String,
    pitcher: Option<PitcherStatline>,
    #[serde(default)]
    batters: Vec<BatterStatline>,
}

impl TryFrom<LineupRecord> for Lineup {
    type Error = SimError;

    fn try_from(r: LineupRecord) -> Result<Self> {
        let mut builder = LineupBuilder::new(r.name);
        if let Some(pitcher) = r.pitcher {
            builder = builder.pitcher(pitcher);
        }
        builder.batters(r.batters).build()
    }
}

impl Lineup {
    /// # Errors
    /// `MissingLineupData` unless exactly nine batters are given.
    pub fn new(
        name: impl Into<String>,
        pitcher: PitcherStatline,
        batters: Vec<BatterStatline>,
    ) -> Result<Self> {
        let name = name.into();
        if batters.len() != BATTING_ORDER_LEN {
            return Err(SimError::MissingLineupData(format!(
                "{}: expected {} batters, found {}",
                display_name(&name),
                BATTING_ORDER_LEN,
                batters.len()
            )));
        }
        Ok(Self { name, pitcher, batters })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pitcher(&self) -> &PitcherStatline {
        &self.pitcher
    }

    pub fn batters(&self) -> &[BatterStatline] {
        &self.batters
    }

    /// Fresh cursor with the leadoff hitter due up.
    pub fn batting_order(&self) -> BattingOrder<'_> {
        BattingOrder { lineup: self, cursor: 0 }
    }

    /// Cursor with `slot` (0-based, taken modulo 9) due up.
    pub fn batting_order_from(&self, slot: usize) -> BattingOrder<'_> {
        BattingOrder { lineup: self, cursor: slot % BATTING_ORDER_LEN }
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "lineup"
    } else {
        name
    }
}

/// Collects a lineup piece by piece, e.g. while resolving player ids.
#[derive(Debug, Clone, Default)]
pub struct LineupBuilder {
    name: String,
    pitcher: Option<PitcherStatline>,
    batters: Vec<BatterStatline>,
}

impl LineupBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn pitcher(mut self, pitcher: PitcherStatline) -> Self {
        self.pitcher = Some(pitcher);
        self
    }

    pub fn batter(mut self, batter: BatterStatline) -> Self {
        self.batters.push(batter);
        self
    }

    pub fn batters(mut self, batters: impl IntoIterator<Item = BatterStatline>) -> Self {
        self.batters.extend(batters);
        self
    }

    /// # Errors
    /// `MissingLineupData` when no pitcher was set or the batter count is not 9.
    pub fn build(self) -> Result<Lineup> {
        let Some(pitcher) = self.pitcher else {
            return Err(SimError::MissingLineupData(format!(
                "{}: no starting pitcher",
                display_name(&self.name)
            )));
        };
        Lineup::new(self.name, pitcher, self.batters)
    }
}

/// One team's batting cursor for one game.
///
/// The cursor survives innings and offense/defense switches and wraps after
/// the ninth batter. It borrows the lineup, so each trial owns its own cursor
/// while the statlines stay shared.
#[derive(Debug, Clone)]
pub struct BattingOrder<'a> {
    lineup: &'a Lineup,
    cursor: usize,
}

impl<'a> BattingOrder<'a> {
    /// Returns the batter due up and moves the cursor to the next slot.
    pub fn next_batter(&mut self) -> &'a BatterStatline {
        let batter = &self.lineup.batters[self.cursor];
        self.cursor = (self.cursor + 1) % BATTING_ORDER_LEN;
        batter
    }

    /// Starting pitcher; no pitching changes are modeled.
    pub fn current_pitcher(&self) -> &'a PitcherStatline {
        &self.lineup.pitcher
    }

    /// Slot (0-based) of the batter due up.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn lineup(&self) -> &'a Lineup {
        self.lineup
    }
}
