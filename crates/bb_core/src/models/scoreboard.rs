use serde::{Deserialize, Serialize};

/// Which team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Runs in one inning. `home` is `None` when the bottom half was not played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningLine {
    pub away: u32,
    pub home: Option<u32>,
}

/// Cumulative score plus a per-inning line score.
///
/// Updated once per completed half-inning: top halves open a new inning line,
/// bottom halves fill it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    home: u32,
    away: u32,
    innings: Vec<InningLine>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the away team's half and opens the next inning.
    pub fn record_top(&mut self, runs: u32) {
        self.away += runs;
        self.innings.push(InningLine { away: runs, home: None });
    }

    /// Records the home team's half of the current inning.
    pub fn record_bottom(&mut self, runs: u32) {
        self.home += runs;
        match self.innings.last_mut() {
            Some(line) if line.home.is_none() => line.home = Some(runs),
            // no open inning: only reachable when a caller builds a board by hand
            _ => self.innings.push(InningLine { away: 0, home: Some(runs) }),
        }
    }

    pub fn home(&self) -> u32 {
        self.home
    }

    pub fn away(&self) -> u32 {
        self.away
    }

    pub fn runs(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn is_tied(&self) -> bool {
        self.home == self.away
    }

    pub fn home_leads(&self) -> bool {
        self.home > self.away
    }

    pub fn innings(&self) -> &[InningLine] {
        &self.innings
    }

    pub fn innings_played(&self) -> u32 {
        self.innings.len() as u32
    }
}

/// Final `(home, away)` runs of a finished game. Never tied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinalScore {
    pub home: u32,
    pub away: u32,
}

impl FinalScore {
    pub fn as_pair(&self) -> (u32, u32) {
        (self.home, self.away)
    }

    pub fn winner(&self) -> Side {
        if self.home > self.away {
            Side::Home
        } else {
            Side::Away
        }
    }
}
