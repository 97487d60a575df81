//! At-bat event stream.
//!
//! The engine reports every at-bat to a [`PlayObserver`]. Aggregation runs use
//! `()` (no-op); [`PlayLog`] keeps the full trace for replaying one trial.

use serde::{Deserialize, Serialize};

use super::outcome::AtBatOutcome;
use crate::models::Side;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtBatEvent {
    /// 1-based inning number
    pub inning: u32,
    pub batting: Side,
    /// Batting-order slot (0-based) of the batter
    pub batter_slot: usize,
    pub outcome: AtBatOutcome,
    pub runs_scored: u32,
    pub outs_after: u8,
    pub bases_after: [bool; 3],
}

pub trait PlayObserver {
    fn on_at_bat(&mut self, event: &AtBatEvent);

    fn on_half_inning_end(&mut self, _inning: u32, _batting: Side, _runs: u32) {}
}

impl PlayObserver for () {
    #[inline]
    fn on_at_bat(&mut self, _event: &AtBatEvent) {}
}

/// Records every at-bat of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayLog {
    events: Vec<AtBatEvent>,
}

impl PlayLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AtBatEvent] {
        &self.events
    }

    pub fn outcomes(&self) -> Vec<AtBatOutcome> {
        self.events.iter().map(|e| e.outcome).collect()
    }

    pub fn plate_appearances(&self, side: Side) -> usize {
        self.events.iter().filter(|e| e.batting == side).count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl PlayObserver for PlayLog {
    fn on_at_bat(&mut self, event: &AtBatEvent) {
        self.events.push(event.clone());
    }
}
