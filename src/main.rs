//! Brick Blitz headless runner
//!
//! Plays a seeded game on autopilot at the fixed tick rate and prints the
//! result as JSON. Useful for soak runs and reproducing seeds.

use std::path::PathBuf;

use clap::Parser;

use brick_blitz::consts::*;
use brick_blitz::sim::sound_cues;
use brick_blitz::{ConfigError, Difficulty, HighScores, Session, Settings};

#[derive(Parser, Debug)]
#[command(about = "Run a headless Brick Blitz game on autopilot", version)]
struct Args {
    /// RNG seed for the run
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Maximum ticks to simulate (60 per second of game time)
    #[arg(long, default_value_t = TICK_RATE as u64 * 300)]
    ticks: u64,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the difficulty preset (easy, normal, hard)
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// Player name reported to the leaderboard
    #[arg(long, default_value = "autopilot")]
    user: String,

    /// Leaderboard JSON file to read and update
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Print a full snapshot every N ticks
    #[arg(long)]
    snapshot_every: Option<u64>,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_name(s).ok_or_else(|| format!("unknown difficulty '{s}'"))
}

fn main() -> Result<(), ConfigError> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(difficulty) = args.difficulty {
        settings.difficulty = difficulty;
    }
    settings.validate()?;

    let scores = match &args.scores {
        Some(path) if path.exists() => HighScores::load(path)?,
        _ => HighScores::new(),
    };

    log::info!(
        "Brick Blitz starting: seed {}, {:?}, {} lives, {} levels",
        args.seed,
        settings.difficulty,
        settings.lives,
        settings.max_level
    );

    let mut session = Session::new(args.seed, settings, args.user.clone(), scores);
    session.set_idle_mode(true);

    for n in 0..args.ticks {
        let report = session.step();
        for cue in sound_cues(&report.events) {
            log::trace!("tick {}: {}", n, cue.name());
        }
        if let Some(every) = args.snapshot_every.filter(|every| *every > 0) {
            if n % every == 0 {
                println!("{}", serde_json::to_string(&session.snapshot())?);
            }
        }
        if session.is_finished() {
            break;
        }
    }

    let state = session.state();
    let summary = serde_json::json!({
        "seed": args.seed,
        "user": args.user,
        "phase": state.phase,
        "level": state.level,
        "lives": state.lives,
        "score": state.score,
        "ticks": state.time_ticks,
        "bricks_left": state.bricks.len(),
        "top_score": session.sink().top_score(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(path) = &args.scores {
        session.sink().save(path)?;
    }
    Ok(())
}
