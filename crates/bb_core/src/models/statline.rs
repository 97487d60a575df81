//! Season statlines - the only input to the outcome model.
//!
//! Both records are validated once at construction (and on deserialization),
//! so every statline that exists has non-zero denominators and rates in [0, 1].

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

// ============================================================================
// Pitcher
// ============================================================================

/// 투수 시즌 기록: H BB SO BF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PitcherRecord")]
pub struct PitcherStatline {
    hits: u32,
    walks: u32,
    strikeouts: u32,
    batters_faced: u32,
}

#[derive(Deserialize)]
struct PitcherRecord {
    hits: u32,
    walks: u32,
    strikeouts: u32,
    batters_faced: u32,
}

impl TryFrom<PitcherRecord> for PitcherStatline {
    type Error = SimError;

    fn try_from(r: PitcherRecord) -> Result<Self> {
        PitcherStatline::new(r.hits, r.walks, r.strikeouts, r.batters_faced)
    }
}

impl PitcherStatline {
    /// Build a pitcher statline.
    ///
    /// # Errors
    /// `InvalidStatline` when `batters_faced == 0` or when hits, walks or
    /// strikeouts exceed batters faced.
    pub fn new(hits: u32, walks: u32, strikeouts: u32, batters_faced: u32) -> Result<Self> {
        if batters_faced == 0 {
            return Err(SimError::InvalidStatline(
                "pitcher batters faced (BF) must be greater than 0".to_string(),
            ));
        }
        for (label, count) in [("hits (H)", hits), ("walks (BB)", walks), ("strikeouts (SO)", strikeouts)] {
            if count > batters_faced {
                return Err(SimError::InvalidStatline(format!(
                    "pitcher {label} = {count} exceeds batters faced (BF) = {batters_faced}"
                )));
            }
        }

        Ok(Self { hits, walks, strikeouts, batters_faced })
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn walks(&self) -> u32 {
        self.walks
    }

    pub fn strikeouts(&self) -> u32 {
        self.strikeouts
    }

    pub fn batters_faced(&self) -> u32 {
        self.batters_faced
    }
}

// ============================================================================
// Batter
// ============================================================================

/// 타자 시즌 기록: AB H 2B 3B HR SO BA
///
/// `batting_average` is supplied separately and kept as given; it is not
/// required to equal `hits / at_bats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BatterRecord")]
pub struct BatterStatline {
    name: String,
    at_bats: u32,
    hits: u32,
    doubles: u32,
    triples: u32,
    home_runs: u32,
    strikeouts: u32,
    batting_average: f64,
}

#[derive(Deserialize)]
struct BatterRecord {
    #[serde(default)]
    name: String,
    at_bats: u32,
    hits: u32,
    doubles: u32,
    triples: u32,
    home_runs: u32,
    strikeouts: u32,
    batting_average: f64,
}

impl TryFrom<BatterRecord> for BatterStatline {
    type Error = SimError;

    fn try_from(r: BatterRecord) -> Result<Self> {
        BatterStatline::builder(r.name)
            .at_bats(r.at_bats)
            .hits(r.hits)
            .extra_base_hits(r.doubles, r.triples, r.home_runs)
            .strikeouts(r.strikeouts)
            .batting_average(r.batting_average)
            .build()
    }
}

impl BatterStatline {
    pub fn builder(name: impl Into<String>) -> BatterStatlineBuilder {
        BatterStatlineBuilder { name: name.into(), ..Default::default() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn at_bats(&self) -> u32 {
        self.at_bats
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn doubles(&self) -> u32 {
        self.doubles
    }

    pub fn triples(&self) -> u32 {
        self.triples
    }

    pub fn home_runs(&self) -> u32 {
        self.home_runs
    }

    pub fn strikeouts(&self) -> u32 {
        self.strikeouts
    }

    pub fn batting_average(&self) -> f64 {
        self.batting_average
    }

    /// Hits that were neither doubles, triples nor home runs.
    pub fn singles(&self) -> u32 {
        self.hits - self.doubles - self.triples - self.home_runs
    }

    /// Same numbers under a different display name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self { name: name.into(), ..self.clone() }
    }
}

/// Builder for [`BatterStatline`]; all counts default to zero.
#[derive(Debug, Clone, Default)]
pub struct BatterStatlineBuilder {
    name: String,
    at_bats: u32,
    hits: u32,
    doubles: u32,
    triples: u32,
    home_runs: u32,
    strikeouts: u32,
    batting_average: f64,
}

impl BatterStatlineBuilder {
    pub fn at_bats(mut self, at_bats: u32) -> Self {
        self.at_bats = at_bats;
        self
    }

    pub fn hits(mut self, hits: u32) -> Self {
        self.hits = hits;
        self
    }

    pub fn extra_base_hits(mut self, doubles: u32, triples: u32, home_runs: u32) -> Self {
        self.doubles = doubles;
        self.triples = triples;
        self.home_runs = home_runs;
        self
    }

    pub fn strikeouts(mut self, strikeouts: u32) -> Self {
        self.strikeouts = strikeouts;
        self
    }

    pub fn batting_average(mut self, batting_average: f64) -> Self {
        self.batting_average = batting_average;
        self
    }

    /// # Errors
    /// `InvalidStatline` when `at_bats == 0`, the batting average is not a
    /// finite value in [0, 1], hits or strikeouts exceed at-bats, or extra-base
    /// hits exceed total hits.
    pub fn build(self) -> Result<BatterStatline> {
        let who = if self.name.is_empty() { "batter".to_string() } else { format!("batter '{}'", self.name) };

        if self.at_bats == 0 {
            return Err(SimError::InvalidStatline(format!(
                "{who}: at-bats (AB) must be greater than 0"
            )));
        }
        if !self.batting_average.is_finite() || !(0.0..=1.0).contains(&self.batting_average) {
            return Err(SimError::InvalidStatline(format!(
                "{who}: batting average (BA) = {} is outside [0, 1]",
                self.batting_average
            )));
        }
        if self.hits > self.at_bats || self.strikeouts > self.at_bats {
            return Err(SimError::InvalidStatline(format!(
                "{who}: H = {} and SO = {} must not exceed AB = {}",
                self.hits, self.strikeouts, self.at_bats
            )));
        }
        let extra_base = u64::from(self.doubles) + u64::from(self.triples) + u64::from(self.home_runs);
        if extra_base > u64::from(self.hits) {
            return Err(SimError::InvalidStatline(format!(
                "{who}: 2B + 3B + HR = {extra_base} exceeds hits (H) = {}",
                self.hits
            )));
        }

        Ok(BatterStatline {
            name: self.name,
            at_bats: self.at_bats,
            hits: self.hits,
            doubles: self.doubles,
            triples: self.triples,
            home_runs: self.home_runs,
            strikeouts: self.strikeouts,
            batting_average: self.batting_average,
        })
    }
}
