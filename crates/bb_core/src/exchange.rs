//! Plain-text lineup exchange format.
//!
//! ```text
//! H BB SO BF                  <- starting pitcher
//! AB H 2B 3B HR SO BA         <- batter 1
//! ...                         <- exactly nine batter lines
//! ```
//!
//! Fields are whitespace-separated; blank lines are ignored. Counts may be
//! written as integral decimals (`783.0`). Player names are not part of the
//! format, so parsed batters are unnamed.

use std::fmt::Write as _;
use std::{fs, path::Path};

use crate::error::{Result, SimError};
use crate::models::{BatterStatline, Lineup, LineupBuilder, PitcherStatline, BATTING_ORDER_LEN};

const PITCHER_FIELDS: usize = 4;
const BATTER_FIELDS: usize = 7;

/// Serializes `lineup`. `BA` is written in shortest round-trip form, so
/// [`parse_lineup`] restores it bit for bit.
pub fn write_lineup(lineup: &Lineup) -> String {
    let mut out = String::new();
    let p = lineup.pitcher();
    // writing into a String cannot fail
    let _ = writeln!(out, "{} {} {} {}", p.hits(), p.walks(), p.strikeouts(), p.batters_faced());
    for b in lineup.batters() {
        let _ = writeln!(
            out,
            "{} {} {} {} {} {} {}",
            b.at_bats(),
            b.hits(),
            b.doubles(),
            b.triples(),
            b.home_runs(),
            b.strikeouts(),
            b.batting_average()
        );
    }
    out
}

/// Parses one lineup. `name` is not stored in the format and is attached
/// to the result as given.
///
/// # Errors
/// - `Exchange` for malformed lines (with the 1-based line number)
/// - `MissingLineupData` for fewer than nine batter lines
/// - `InvalidStatline` for well-formed but impossible statlines
pub fn parse_lineup_named(text: &str, name: &str) -> Result<Lineup> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((line_no, pitcher_line)) = lines.next() else {
        return Err(SimError::MissingLineupData(format!("{name}: empty lineup file")));
    };
    let [h, bb, so, bf] = fields::<PITCHER_FIELDS>(pitcher_line, line_no)?;
    let pitcher = PitcherStatline::new(
        count(h, line_no)?,
        count(bb, line_no)?,
        count(so, line_no)?,
        count(bf, line_no)?,
    )
    .map_err(|e| at_line(e, line_no))?;

    let mut builder = LineupBuilder::new(name).pitcher(pitcher);
    let mut batters = 0usize;
    for (line_no, line) in lines {
        if batters == BATTING_ORDER_LEN {
            return Err(SimError::Exchange {
                line: line_no,
                message: format!("unexpected line after {BATTING_ORDER_LEN} batters"),
            });
        }
        builder = builder.batter(parse_batter(line, line_no)?);
        batters += 1;
    }

    if batters < BATTING_ORDER_LEN {
        return Err(SimError::MissingLineupData(format!(
            "{name}: expected {BATTING_ORDER_LEN} batter lines, found {batters}"
        )));
    }
    builder.build()
}

pub fn parse_lineup(text: &str) -> Result<Lineup> {
    parse_lineup_named(text, "")
}

/// Reads a lineup file; the file stem becomes the lineup name.
pub fn read_lineup_file(path: impl AsRef<Path>) -> Result<Lineup> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    parse_lineup_named(&text, name)
}

pub fn write_lineup_file(path: impl AsRef<Path>, lineup: &Lineup) -> Result<()> {
    fs::write(path, write_lineup(lineup))?;
    Ok(())
}

fn parse_batter(line: &str, line_no: usize) -> Result<BatterStatline> {
    let [ab, h, doubles, triples, hr, so, ba] = fields::<BATTER_FIELDS>(line, line_no)?;
    let batting_average: f64 = ba.parse().map_err(|_| SimError::Exchange {
        line: line_no,
        message: format!("batting average '{ba}' is not a number"),
    })?;

    BatterStatline::builder("")
        .at_bats(count(ab, line_no)?)
        .hits(count(h, line_no)?)
        .extra_base_hits(count(doubles, line_no)?, count(triples, line_no)?, count(hr, line_no)?)
        .strikeouts(count(so, line_no)?)
        .batting_average(batting_average)
        .build()
        .map_err(|e| at_line(e, line_no))
}

fn fields<const N: usize>(line: &str, line_no: usize) -> Result<[&str; N]> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let found = parts.len();
    parts.try_into().map_err(|_| SimError::Exchange {
        line: line_no,
        message: format!("expected {N} fields, found {found}"),
    })
}

/// Non-negative integer count, also accepted in integral decimal form.
fn count(field: &str, line_no: usize) -> Result<u32> {
    if let Ok(n) = field.parse::<u32>() {
        return Ok(n);
    }
    let bad = || SimError::Exchange { line: line_no, message: format!("'{field}' is not a non-negative integer count") };
    let value: f64 = field.parse().map_err(|_| bad())?;
    if value.fract() != 0.0 || !(0.0..=u32::MAX as f64).contains(&value) {
        return Err(bad());
    }
    Ok(value as u32)
}

fn at_line(err: SimError, line_no: usize) -> SimError {
    match err {
        SimError::InvalidStatline(msg) => SimError::InvalidStatline(format!("line {line_no}: {msg}")),
        other => other,
    }
}
