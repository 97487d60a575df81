//! Season stats tables (CSV) and schedules (JSON) → [`StatBook`]
//!
//! Pitcher CSV columns: `id,hits,walks,strikeouts,batters_faced` (extra columns such as `name` are ignored)
//! Batter CSV columns:  `id,name,at_bats,hits,doubles,triples,home_runs,strikeouts,batting_average`
//!
//! Rows that fail to parse or validate are counted and skipped with a
//! warning; a later row with the same id replaces an earlier one.
//! `batting_average` may be written without the leading zero (`.256`).

use anyhow::{Context, Result};
use bb_core::provider::{ScheduledGame, StatBook};
use bb_core::{BatterStatline, PitcherStatline};
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
}

#[derive(Debug, Deserialize)]
struct PitcherRow {
    id: String,
    hits: u32,
    walks: u32,
    strikeouts: u32,
    batters_faced: u32,
}

#[derive(Debug, Deserialize)]
struct BatterRow {
    id: String,
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

/// Everything [`load_stat_book`] read.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub pitchers: ParseStats,
    pub batters: ParseStats,
    pub games: usize,
}

/// Adds every valid pitcher row of `csv_path` to `book`.
pub fn load_pitchers(csv_path: &Path, book: &mut StatBook) -> Result<ParseStats> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open pitcher CSV: {}", csv_path.display()))?;

    let mut stats = ParseStats::default();
    for (i, row) in reader.deserialize::<PitcherRow>().enumerate() {
        stats.total_rows += 1;
        // +2: 1-based, after the header
        let line = i + 2;

        let row = match row {
            Ok(row) => row,
            Err(e) => {
                stats.failed += 1;
                warn!("{}: line {line} skipped: {e}", csv_path.display());
                continue;
            }
        };

        match PitcherStatline::new(row.hits, row.walks, row.strikeouts, row.batters_faced) {
            Ok(statline) => {
                book.insert_pitcher(row.id, statline);
                stats.parsed += 1;
            }
            Err(e) => {
                stats.failed += 1;
                warn!("{}: line {line} ({}) skipped: {e}", csv_path.display(), row.id);
            }
        }
    }
    Ok(stats)
}

/// Adds every valid batter row of `csv_path` to `book`.
pub fn load_batters(csv_path: &Path, book: &mut StatBook) -> Result<ParseStats> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open batter CSV: {}", csv_path.display()))?;

    let mut stats = ParseStats::default();
    for (i, row) in reader.deserialize::<BatterRow>().enumerate() {
        stats.total_rows += 1;
        let line = i + 2;

        let row = match row {
            Ok(row) => row,
            Err(e) => {
                stats.failed += 1;
                warn!("{}: line {line} skipped: {e}", csv_path.display());
                continue;
            }
        };

        let statline = BatterStatline::builder(row.name)
            .at_bats(row.at_bats)
            .hits(row.hits)
            .extra_base_hits(row.doubles, row.triples, row.home_runs)
            .strikeouts(row.strikeouts)
            .batting_average(row.batting_average)
            .build();

        match statline {
            Ok(statline) => {
                book.insert_batter(row.id, statline);
                stats.parsed += 1;
            }
            Err(e) => {
                stats.failed += 1;
                warn!("{}: line {line} ({}) skipped: {e}", csv_path.display(), row.id);
            }
        }
    }
    Ok(stats)
}

/// Adds the games of a JSON schedule (an array of [`ScheduledGame`]).
pub fn load_schedule(json_path: &Path, book: &mut StatBook) -> Result<usize> {
    let json = fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read schedule: {}", json_path.display()))?;
    let games: Vec<ScheduledGame> =
        serde_json::from_str(&json).with_context(|| format!("Failed to parse schedule: {}", json_path.display()))?;

    let count = games.len();
    for game in games {
        book.add_game(game);
    }
    Ok(count)
}

pub fn load_stat_book(pitchers_csv: &Path, batters_csv: &Path, schedule_json: &Path) -> Result<(StatBook, LoadReport)> {
    let mut book = StatBook::new();
    let report = LoadReport {
        pitchers: load_pitchers(pitchers_csv, &mut book)?,
        batters: load_batters(batters_csv, &mut book)?,
        games: load_schedule(schedule_json, &mut book)?,
    };
    Ok((book, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_core::StatsProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_load_pitchers_skips_bad_rows() -> Result<()> {
        let csv = write_temp(
            "id,name,hits,walks,strikeouts,batters_faced\n\
             p1,Ace,180,50,220,850\n\
             p2,Opener,0,0,0,0\n\
             p3,Typo,abc,1,1,10\n\
             p4, Spaced , 90 , 30 , 80 , 400\n",
        )?;

        let mut book = StatBook::new();
        let stats = load_pitchers(csv.path(), &mut book)?;

        assert_eq!(stats, ParseStats { total_rows: 4, parsed: 2, failed: 2 });
        assert_eq!(book.pitcher("p1").map(|p| p.batters_faced()), Some(850));
        assert!(book.pitcher("p2").is_none());
        assert!(book.pitcher("p4").is_some());
        Ok(())
    }

    #[test]
    fn test_load_batters_accepts_bare_decimal_average() -> Result<()> {
        let csv = write_temp(
            "id,name,at_bats,hits,doubles,triples,home_runs,strikeouts,batting_average\n\
             b1,Contact Hitter,600,180,30,2,20,120,.300\n\
             b2,Impossible,100,10,5,5,5,20,.100\n",
        )?;

        let mut book = StatBook::new();
        let stats = load_batters(csv.path(), &mut book)?;

        assert_eq!(stats.parsed, 1);
        assert_eq!(stats.failed, 1);
        let b1 = book.batter("b1").unwrap();
        assert_eq!(b1.name(), "Contact Hitter");
        assert_eq!(b1.batting_average(), 0.3);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut book = StatBook::new();
        let err = load_pitchers(Path::new("/nonexistent/pitchers.csv"), &mut book).unwrap_err();
        assert!(err.to_string().contains("Failed to open pitcher CSV"));
    }

    #[test]
    fn test_load_schedule() -> Result<()> {
        let json = write_temp(
            r#"[{"game_id": "g1", "date": "2020-07-29",
                 "home": {"team": "NYY", "pitcher_id": "p1", "batter_ids": ["b1"]},
                 "away": {"team": "BOS", "pitcher_id": null}}]"#,
        )?;

        let mut book = StatBook::new();
        assert_eq!(load_schedule(json.path(), &mut book)?, 1);
        assert_eq!(book.games()[0].home.team, "NYY");
        Ok(())
    }
}
