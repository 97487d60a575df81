//! Lineup Builder Library
//!
//! Stats CSV + schedule JSON → StatBook → lineup exchange files / slate predictions
//! Exchange files → matchup simulation

pub mod slate;
pub mod stats_tables;

use anyhow::{Context, Result};
use bb_core::exchange::read_lineup_file;
use bb_core::{MatchupResponse, MonteCarloAggregator, SimConfig};
use std::path::Path;

pub use slate::{export_slate, predict_slate, ExportReport, GamePrediction, SkippedGame, SlateReport};
pub use stats_tables::{load_batters, load_pitchers, load_schedule, load_stat_book, LoadReport, ParseStats};

/// Simulates the matchup stored in two exchange files.
pub fn simulate_files(away_path: &Path, home_path: &Path, config: &SimConfig) -> Result<MatchupResponse> {
    let away = read_lineup_file(away_path)
        .with_context(|| format!("Failed to read away lineup: {}", away_path.display()))?;
    let home = read_lineup_file(home_path)
        .with_context(|| format!("Failed to read home lineup: {}", home_path.display()))?;

    let aggregator = MonteCarloAggregator::new(config.clone())?;
    let dist = aggregator.run_seeded(&home, &away)?;
    Ok(MatchupResponse::from_distribution(&home, &away, aggregator.seed(), &dist))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_core::exchange::write_lineup_file;
    use bb_core::{BatterStatline, Lineup, PitcherStatline};

    fn lineup(team: &str, hits: u32) -> Lineup {
        let batters = (0..9)
            .map(|i| {
                BatterStatline::builder(format!("{team} #{i}"))
                    .at_bats(500)
                    .hits(hits)
                    .extra_base_hits(25, 2, 15)
                    .strikeouts(100)
                    .batting_average(hits as f64 / 500.0)
                    .build()
                    .unwrap()
            })
            .collect();
        Lineup::new(team, PitcherStatline::new(200, 60, 180, 850).unwrap(), batters).unwrap()
    }

    #[test]
    fn test_simulate_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let away_path = dir.path().join("BOS.txt");
        let home_path = dir.path().join("NYY.txt");
        write_lineup_file(&away_path, &lineup("BOS", 120))?;
        write_lineup_file(&home_path, &lineup("NYY", 160))?;

        let config = SimConfig::default().with_trials(2_000).with_seed(11);
        let response = simulate_files(&away_path, &home_path, &config)?;

        // file stems become team names
        assert_eq!(response.home.team, "NYY");
        assert_eq!(response.away.team, "BOS");
        assert_eq!(response.n_trials, 2_000);
        assert!(response.home.expected_runs > response.away.expected_runs);

        let again = simulate_files(&away_path, &home_path, &config)?;
        assert_eq!(response, again);
        Ok(())
    }

    #[test]
    fn test_simulate_files_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = simulate_files(&dir.path().join("missing.txt"), &dir.path().join("x.txt"), &SimConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read away lineup"));
    }
}
