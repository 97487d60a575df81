//! A day's games: exchange-file export and predictions.
//!
//! Games whose lineups cannot be assembled (unannounced starter, unknown
//! player id, short batting order) are skipped with a warning; the rest of
//! the slate continues.

use anyhow::{Context, Result};
use bb_core::engine::deterministic::{derive_seed, entropy_seed};
use bb_core::exchange::write_lineup_file;
use bb_core::provider::{assemble_lineup, ScheduledGame, StatsProvider};
use bb_core::{Lineup, MatchupResponse, MonteCarloAggregator, SimConfig, Side};
use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A game left out of the slate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedGame {
    pub game_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedGame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamePrediction {
    pub game_id: String,
    pub date: NaiveDate,
    pub matchup: MatchupResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlateReport {
    pub date: NaiveDate,
    /// Base seed; each game runs with a seed derived from it and its id.
    pub seed: u64,
    pub predictions: Vec<GamePrediction>,
    pub skipped: Vec<SkippedGame>,
}

/// `(home, away)` lineups of a game. Data errors are logged here; the
/// caller decides whether to skip.
fn game_lineups<P: StatsProvider + ?Sized>(provider: &P, game: &ScheduledGame) -> bb_core::Result<(Lineup, Lineup)> {
    let lineups = assemble_lineup(provider, &game.away)
        .and_then(|away| Ok((assemble_lineup(provider, &game.home)?, away)));
    if let Err(e) = &lineups {
        if e.is_data_error() {
            warn!("{}: problem setting up the simulation, skipping: {e}", game.game_id);
        }
    }
    lineups
}

/// Writes `<game_id>_away.txt` and `<game_id>_home.txt` for every game on
/// `date` into `out_dir`.
pub fn export_slate<P: StatsProvider + ?Sized>(provider: &P, date: NaiveDate, out_dir: &Path) -> Result<ExportReport> {
    fs::create_dir_all(out_dir).with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let mut report = ExportReport::default();
    for game in provider.schedule(date) {
        let (home, away) = match game_lineups(provider, &game) {
            Ok(pair) => pair,
            Err(e) if e.is_data_error() => {
                report.skipped.push(SkippedGame { game_id: game.game_id.clone(), reason: e.to_string() });
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        for (side, lineup) in [("away", &away), ("home", &home)] {
            let path = out_dir.join(format!("{}_{side}.txt", game.game_id));
            write_lineup_file(&path, lineup).with_context(|| format!("Failed to write {}", path.display()))?;
            report.written.push(path);
        }
    }

    info!("exported {} lineup files, {} games skipped", report.written.len(), report.skipped.len());
    Ok(report)
}

/// Simulates every game on `date`. `config.seed` (or an entropy seed) is the
/// slate's base seed.
pub fn predict_slate<P: StatsProvider + ?Sized>(provider: &P, date: NaiveDate, config: &SimConfig) -> Result<SlateReport> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(entropy_seed);

    let mut predictions = Vec::new();
    let mut skipped = Vec::new();
    for game in provider.schedule(date) {
        let (home, away) = match game_lineups(provider, &game) {
            Ok(pair) => pair,
            Err(e) if e.is_data_error() => {
                skipped.push(SkippedGame { game_id: game.game_id.clone(), reason: e.to_string() });
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let game_seed = derive_seed(seed, &game.game_id);
        let aggregator = MonteCarloAggregator::new(SimConfig { seed: Some(game_seed), ..config.clone() })?;
        let dist = match aggregator.run_seeded(&home, &away) {
            Ok(dist) => dist,
            Err(e) if e.is_data_error() => {
                warn!("{}: simulation failed, skipping: {e}", game.game_id);
                skipped.push(SkippedGame { game_id: game.game_id.clone(), reason: e.to_string() });
                continue;
            }
            Err(e) => return Err(e).with_context(|| format!("Simulation failed for {}", game.game_id)),
        };

        info!(
            "{}: {} {:.2} - {} {:.2} (P(home) = {:.3})",
            game.game_id,
            away.name(),
            dist.expected_runs(Side::Away),
            home.name(),
            dist.expected_runs(Side::Home),
            dist.home_win_probability()
        );
        predictions.push(GamePrediction {
            game_id: game.game_id.clone(),
            date: game.date,
            matchup: MatchupResponse::from_distribution(&home, &away, game_seed, &dist),
        });
    }

    Ok(SlateReport { date, seed, predictions, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_core::exchange::read_lineup_file;
    use bb_core::provider::{RosterCard, StatBook};
    use bb_core::{BatterStatline, PitcherStatline};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 7, 29).unwrap()
    }

    fn card(team: &str, pitcher: Option<&str>, batters: usize) -> RosterCard {
        RosterCard {
            team: team.to_string(),
            pitcher_id: pitcher.map(str::to_string),
            batter_ids: (0..batters).map(|i| format!("{team}-{i}")).collect(),
        }
    }

    /// Three games on one date: one playable, one without an announced
    /// starter, one with a short batting order.
    fn sample_book() -> StatBook {
        let mut book = StatBook::new();
        for team in ["NYY", "BOS", "TOR", "BAL", "TB", "CLE"] {
            book.insert_pitcher(format!("{team}-sp"), PitcherStatline::new(180, 55, 190, 820).unwrap());
            for i in 0..9 {
                let batter = BatterStatline::builder(format!("{team} #{i}"))
                    .at_bats(520)
                    .hits(140)
                    .extra_base_hits(28, 3, 18)
                    .strikeouts(110)
                    .batting_average(0.269)
                    .build()
                    .unwrap();
                book.insert_batter(format!("{team}-{i}"), batter);
            }
        }

        let games = [
            ("2020-07-29-BOS-NYY", card("NYY", Some("NYY-sp"), 9), card("BOS", Some("BOS-sp"), 9)),
            ("2020-07-29-BAL-TOR", card("TOR", Some("TOR-sp"), 9), card("BAL", None, 9)),
            ("2020-07-29-CLE-TB", card("TB", Some("TB-sp"), 9), card("CLE", Some("CLE-sp"), 7)),
        ];
        for (id, home, away) in games {
            book.add_game(ScheduledGame { game_id: id.into(), date: date(), home, away });
        }
        book
    }

    #[test]
    fn test_export_slate_writes_playable_games() -> Result<()> {
        let book = sample_book();
        let dir = tempfile::tempdir()?;

        let report = export_slate(&book, date(), dir.path())?;

        assert_eq!(report.written.len(), 2);
        assert_eq!(report.skipped.len(), 2);
        let away = read_lineup_file(dir.path().join("2020-07-29-BOS-NYY_away.txt"))?;
        assert_eq!(away.pitcher().batters_faced(), 820);
        assert_eq!(away.batters().len(), 9);
        Ok(())
    }

    #[test]
    fn test_predict_slate_skips_and_continues() -> Result<()> {
        let book = sample_book();
        let config = SimConfig::default().with_trials(400).with_seed(2020);

        let report = predict_slate(&book, date(), &config)?;

        assert_eq!(report.predictions.len(), 1);
        let skipped: Vec<&str> = report.skipped.iter().map(|s| s.game_id.as_str()).collect();
        assert_eq!(skipped, ["2020-07-29-BAL-TOR", "2020-07-29-CLE-TB"]);

        let prediction = &report.predictions[0];
        assert_eq!(prediction.matchup.home.team, "NYY");
        assert_eq!(prediction.matchup.away.team, "BOS");
        assert_eq!(prediction.matchup.n_trials, 400);
        Ok(())
    }

    #[test]
    fn test_predict_slate_skips_unplayable_matchup() -> Result<()> {
        let mut book = sample_book();
        // hit + walk > 1 only once the sluggers face this starter
        book.insert_pitcher("KC-sp", PitcherStatline::new(600, 500, 0, 1000).unwrap());
        for i in 0..9 {
            let slugger = BatterStatline::builder(format!("DET #{i}"))
                .at_bats(100)
                .hits(90)
                .batting_average(0.9)
                .build()
                .unwrap();
            book.insert_batter(format!("DET-{i}"), slugger);
        }
        book.insert_pitcher("DET-sp", PitcherStatline::new(180, 55, 190, 820).unwrap());
        // KC bats CLE's batters behind its own starter
        let kc = RosterCard {
            team: "KC".to_string(),
            pitcher_id: Some("KC-sp".to_string()),
            batter_ids: (0..9).map(|i| format!("CLE-{i}")).collect(),
        };
        book.add_game(ScheduledGame {
            game_id: "2020-07-29-DET-KC".into(),
            date: date(),
            home: kc,
            away: card("DET", Some("DET-sp"), 9),
        });

        let report = predict_slate(&book, date(), &SimConfig::default().with_trials(100).with_seed(5))?;

        assert_eq!(report.predictions.len(), 1);
        assert_eq!(report.predictions[0].game_id, "2020-07-29-BOS-NYY");
        let skipped = report.skipped.iter().find(|s| s.game_id == "2020-07-29-DET-KC").unwrap();
        assert!(skipped.reason.starts_with("Invalid statline"), "{}", skipped.reason);
        Ok(())
    }

    #[test]
    fn test_predict_slate_is_reproducible() -> Result<()> {
        let book = sample_book();
        let config = SimConfig::default().with_trials(200).with_seed(7);

        let a = predict_slate(&book, date(), &config)?;
        let b = predict_slate(&book, date(), &config)?;
        assert_eq!(serde_json::to_string(&a)?, serde_json::to_string(&b)?);
        Ok(())
    }

    #[test]
    fn test_empty_date() -> Result<()> {
        let book = sample_book();
        let other = NaiveDate::from_ymd_opt(2020, 7, 30).unwrap();
        let report = predict_slate(&book, other, &SimConfig::default().with_trials(10).with_seed(1))?;
        assert!(report.predictions.is_empty());
        assert!(report.skipped.is_empty());
        Ok(())
    }
}
