//! Lineup Builder CLI
//!
//! 두 라인업 파일 → 경기 시뮬레이션
//! Stats CSV + schedule → lineup files / slate predictions

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use bb_core::{MatchupResponse, SimConfig};
#[cfg(feature = "cli")]
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "lineup_builder")]
#[command(about = "Build lineup files and simulate baseball games", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct StatsArgs {
    /// Pitcher CSV (id,hits,walks,strikeouts,batters_faced)
    #[arg(long)]
    pitchers: PathBuf,

    /// Batter CSV (id,name,at_bats,hits,doubles,triples,home_runs,strikeouts,batting_average)
    #[arg(long)]
    batters: PathBuf,

    /// Schedule JSON (array of scheduled games)
    #[arg(long)]
    schedule: PathBuf,

    /// Game date (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct SimArgs {
    /// Config JSON (defaults to $BB_SIM_CONFIG_PATH, then built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of simulated games
    #[arg(long)]
    trials: Option<usize>,

    /// Base seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop early once the home-win standard error reaches this value
    #[arg(long)]
    target_std_error: Option<f64>,

    /// Run trials on a single thread
    #[arg(long, default_value = "false")]
    serial: bool,

    /// Print JSON instead of a summary
    #[arg(long, default_value = "false")]
    json: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Simulate the matchup in two lineup exchange files
    Simulate {
        /// Away lineup file
        #[arg(long)]
        away: PathBuf,

        /// Home lineup file
        #[arg(long)]
        home: PathBuf,

        #[command(flatten)]
        sim: SimArgs,
    },

    /// Write lineup exchange files for every game on a date
    Export {
        #[command(flatten)]
        stats: StatsArgs,

        /// Output directory
        #[arg(long)]
        out: PathBuf,
    },

    /// Predict every game on a date
    Slate {
        #[command(flatten)]
        stats: StatsArgs,

        #[command(flatten)]
        sim: SimArgs,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { away, home, sim } => {
            let config = resolve_config(&sim)?;
            if !sim.json {
                println!("⚾ Simulating matchup...");
                println!("   Away: {}", away.display());
                println!("   Home: {}", home.display());
            }

            let response = lineup_builder::simulate_files(&away, &home, &config)?;

            if sim.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_matchup(&response);
            }
        }

        Commands::Export { stats, out } => {
            println!("🔨 Exporting lineup files...");
            println!("   Date:   {}", stats.date);
            println!("   Output: {}", out.display());

            let book = load_book(&stats)?;
            let report = lineup_builder::export_slate(&book, stats.date, &out)?;

            println!("\n✅ Wrote {} lineup files", report.written.len());
            for path in &report.written {
                println!("   {}", path.display());
            }
            print_skipped(&report.skipped);
        }

        Commands::Slate { stats, sim } => {
            let config = resolve_config(&sim)?;
            let book = load_book(&stats)?;
            let report = lineup_builder::predict_slate(&book, stats.date, &config)?;

            if sim.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("📅 Slate for {} (seed {})", report.date, report.seed);
                for prediction in &report.predictions {
                    println!("\n==> {}", prediction.game_id);
                    print_matchup(&prediction.matchup);
                }
                print_skipped(&report.skipped);
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn resolve_config(args: &SimArgs) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SimConfig::from_env_or_default()?,
    };

    if let Some(trials) = args.trials {
        config.n_trials = trials;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(target) = args.target_std_error {
        config.target_std_error = Some(target);
        config.max_trials = config.max_trials.max(config.n_trials);
    }
    if args.serial {
        config.parallel = false;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(feature = "cli")]
fn load_book(args: &StatsArgs) -> Result<bb_core::StatBook> {
    let (book, report) = lineup_builder::load_stat_book(&args.pitchers, &args.batters, &args.schedule)?;
    log::info!(
        "loaded {} pitchers ({} failed), {} batters ({} failed), {} games",
        report.pitchers.parsed,
        report.pitchers.failed,
        report.batters.parsed,
        report.batters.failed,
        report.games
    );
    Ok(book)
}

#[cfg(feature = "cli")]
fn print_matchup(m: &MatchupResponse) {
    println!("   {:<20} {:>6.2} runs (most likely {})", m.away.team, m.away.expected_runs, m.away.most_probable_runs);
    println!("   {:<20} {:>6.2} runs (most likely {})", m.home.team, m.home.expected_runs, m.home.most_probable_runs);
    if let Some(score) = m.most_probable_score {
        println!("   Most likely score:   {}-{} (away-home)", score.away, score.home);
    }
    println!(
        "   P(home win):         {:.3} ± {:.3} (marginal estimate {:.3})",
        m.home_win_probability, m.home_win_std_error, m.marginal_home_win_probability
    );
    println!("   Extra innings:       {:.1}%", m.extra_inning_rate * 100.0);
    println!("   Trials:              {} (seed {})", m.n_trials, m.seed);
}

#[cfg(feature = "cli")]
fn print_skipped(skipped: &[lineup_builder::SkippedGame]) {
    if skipped.is_empty() {
        return;
    }
    println!("\n⚠️  Skipped {} games", skipped.len());
    for game in skipped {
        println!("   {}: {}", game.game_id, game.reason);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("lineup_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
