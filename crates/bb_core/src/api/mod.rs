pub mod json_api;

pub use json_api::{simulate_matchup, simulate_matchup_json, MatchupRequest, MatchupResponse, SideSummary};
