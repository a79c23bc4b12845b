//! Headless tunnel run
//!
//! Plays one leaderboard session at a fixed 60 fps with a scripted shooter and
//! logs the outcome. See `tunnel_sim --help` for options.

mod autopilot;
mod headless;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use tunnel_engine::foundation::logging;
use tunnel_engine::prelude::*;

use autopilot::Autopilot;
use headless::HeadlessScene;

const SAMPLE_ROSTER: &str = include_str!("../assets/sample_players.ron");
const FRAME_TIME: f32 = 1.0 / 60.0;
const MAX_FRAMES: u32 = 60 * 60 * 10;
const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

#[derive(Parser, Debug)]
#[command(name = "tunnel_sim", about = "Plays a leaderboard tunnel session headless with a scripted shooter")]
struct Args {
    /// Single-color variant, shots are clicks cast through the camera
    #[arg(long)]
    ray: bool,

    /// TOML or RON session config, overrides --ray
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// RON roster to play instead of the bundled sample
    #[arg(long, value_name = "FILE")]
    roster: Option<PathBuf>,

    /// Directory avatar paths are resolved against
    #[arg(long, value_name = "DIR")]
    avatars: Option<PathBuf>,

    /// Seed for spawn jitter, color assignment and the shooter
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
}

impl Args {
    fn config(&self) -> Result<TunnelConfig, AppError> {
        let config = match &self.config {
            Some(path) => TunnelConfig::load_validated(path)?,
            None if self.ray => TunnelConfig::ray_variant(),
            None => TunnelConfig::color_variant(),
        };
        Ok(match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        })
    }

    fn roster(&self) -> Result<Roster, AppError> {
        let roster = match &self.roster {
            Some(path) => Roster::from_file(path)?,
            None => Roster::from_ron_str(SAMPLE_ROSTER)?,
        };
        Ok(roster)
    }
}

fn run(args: &Args) -> Result<Scoreboard, AppError> {
    let config = args.config()?;
    let mut roster = args.roster()?;
    if config.hit.strategy == HitStrategy::Proximity {
        let mut rng = config.session.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        assign_colors(&mut roster.players, &mut rng);
    }
    log::info!("Loaded {} players", roster.len());

    let fetcher = args
        .avatars
        .as_ref()
        .map_or_else(FileFetcher::default, FileFetcher::with_root);
    let cache = Arc::new(AvatarCache::new(Arc::new(fetcher)));

    let seed = config.session.seed.unwrap_or(0);
    let mut session = Session::new(config, cache)?;
    session.configure(roster.into_shared());
    let report = session.wait_for_avatars();
    if report.failed > 0 {
        log::warn!("{} avatars unavailable, placeholders will be shown", report.failed);
    }
    session.start();

    let mut autopilot = Autopilot::new(seed, Camera::default(), WINDOW_WIDTH, WINDOW_HEIGHT);
    let mut scene = HeadlessScene::default();
    let mut frames = 0;

    while frames < MAX_FRAMES {
        session.tick(FRAME_TIME);
        autopilot.update(&mut session, FRAME_TIME);
        scene.apply(session.drain_commands());
        frames += 1;

        if session.is_finished() && scene.is_empty() {
            break;
        }
    }

    if !session.is_finished() {
        log::warn!("Stopped after {} frames with targets still in flight", frames);
    }
    log::info!("Simulated {:.1}s over {} frames", session.elapsed(), frames);
    scene.log_summary();
    Ok(*session.scoreboard())
}

fn main() {
    logging::init_with_default("info");

    let args = Args::parse();
    match run(&args) {
        Ok(board) => {
            log::info!(
                "Final score {}: {} hits, {} wrong color, {} missed, {:.0}% accuracy",
                board.score,
                board.hits,
                board.wrong_hits,
                board.misses,
                board.accuracy() * 100.0
            );
        }
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_color_variant() {
        let args = Args::try_parse_from(["tunnel_sim"]).unwrap();
        assert!(!args.ray);
        assert!(args.seed.is_none());
        assert_eq!(args.config().unwrap().hit.strategy, HitStrategy::Proximity);
    }

    #[test]
    fn test_ray_flag_and_seed() {
        let args = Args::try_parse_from(["tunnel_sim", "--ray", "--seed", "42"]).unwrap();
        let config = args.config().unwrap();
        assert_eq!(config.hit.strategy, HitStrategy::Ray);
        assert_eq!(config.session.seed, Some(42));
    }

    #[test]
    fn test_rejects_bad_seed_and_unknown_flags() {
        assert!(Args::try_parse_from(["tunnel_sim", "--seed", "soon"]).is_err());
        assert!(Args::try_parse_from(["tunnel_sim", "--seed"]).is_err());
        assert!(Args::try_parse_from(["tunnel_sim", "--fast"]).is_err());
    }

    #[test]
    fn test_bundled_roster_parses() {
        let args = Args::try_parse_from(["tunnel_sim"]).unwrap();
        assert_eq!(args.roster().unwrap().len(), 12);
    }
}
