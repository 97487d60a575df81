use serde::{Deserialize, Serialize};

use crate::config::{SimConfig, DEFAULT_N_TRIALS};
use crate::error::{Result, SimError};
use crate::models::{FinalScore, Lineup, Side};
use crate::simulation::{MonteCarloAggregator, RunDistribution};
use crate::SCHEMA_VERSION;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupRequest {
    pub schema_version: u8,
    /// Base seed; drawn from OS entropy when absent (and echoed back).
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_n_trials")]
    pub n_trials: usize,
    pub home: Lineup,
    pub away: Lineup,
}

fn default_n_trials() -> usize {
    DEFAULT_N_TRIALS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideSummary {
    pub team: String,
    pub expected_runs: f64,
    pub most_probable_runs: u32,
    /// Raw counts indexed by run total.
    pub histogram: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupResponse {
    pub schema_version: u8,
    pub seed: u64,
    pub n_trials: u64,
    pub home: SideSummary,
    pub away: SideSummary,
    pub home_win_probability: f64,
    pub away_win_probability: f64,
    /// Estimate from the two marginals as if independent.
    pub marginal_home_win_probability: f64,
    pub home_win_std_error: f64,
    pub extra_inning_rate: f64,
    pub most_probable_score: Option<FinalScore>,
}

impl MatchupResponse {
    pub fn from_distribution(home: &Lineup, away: &Lineup, seed: u64, dist: &RunDistribution) -> Self {
        let side = |lineup: &Lineup, side: Side| SideSummary {
            team: lineup.name().to_string(),
            expected_runs: dist.expected_runs(side),
            most_probable_runs: dist.most_probable(side),
            histogram: dist.histogram(side).to_vec(),
        };

        Self {
            schema_version: SCHEMA_VERSION,
            seed,
            n_trials: dist.n_trials(),
            home: side(home, Side::Home),
            away: side(away, Side::Away),
            home_win_probability: dist.home_win_probability(),
            away_win_probability: dist.away_win_probability(),
            marginal_home_win_probability: dist.marginal_home_win_probability(),
            home_win_std_error: dist.home_win_std_error(),
            extra_inning_rate: dist.extra_inning_rate(),
            most_probable_score: dist.most_probable_score(),
        }
    }
}

/// Typed form of [`simulate_matchup_json`].
pub fn simulate_matchup(request: &MatchupRequest) -> Result<MatchupResponse> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(SimError::UnsupportedSchema { found: request.schema_version, expected: SCHEMA_VERSION });
    }

    let mut config = SimConfig::default().with_trials(request.n_trials);
    config.seed = request.seed;
    let aggregator = MonteCarloAggregator::new(config)?;
    let dist = aggregator.run_seeded(&request.home, &request.away)?;

    Ok(MatchupResponse::from_distribution(&request.home, &request.away, aggregator.seed(), &dist))
}

/// JSON in, JSON out. Same request with the same seed → byte-identical output.
pub fn simulate_matchup_json(request_json: &str) -> Result<String> {
    let request: MatchupRequest = serde_json::from_str(request_json)?;
    let response = simulate_matchup(&request)?;
    Ok(serde_json::to_string(&response)?)
}
