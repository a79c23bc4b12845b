//! Session orchestration
//!
//! Thin per-frame driver tying the clock, the target pool and the hit
//! resolver together, plus score bookkeeping. Constructed explicitly; there is
//! no global session.

use std::sync::Arc;

use crate::assets::{AvatarCache, PreloadReport};
use crate::config::{ConfigError, SessionConfig, TunnelConfig};
use crate::data::Player;
use crate::foundation::time::FrameClock;
use crate::render::SceneCommand;

use super::resolver::{Hit, HitResolver, Shot};
use super::target::{TargetPool, TickReport};

/// Running tally for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    /// Current score, never below zero
    pub score: u32,
    /// Hits with the right color
    pub hits: u32,
    /// Hits with the wrong color
    pub wrong_hits: u32,
    /// Targets that passed the camera
    pub misses: u32,
    /// Shots fired
    pub shots: u32,
}

impl Scoreboard {
    /// Fraction of shots that were correct hits
    pub fn accuracy(&self) -> f32 {
        if self.shots == 0 {
            0.0
        } else {
            self.hits as f32 / self.shots as f32
        }
    }

    fn record_hit(&mut self, hit: &Hit, policy: &SessionConfig) {
        if hit.correct {
            self.hits += 1;
            self.score = self.score.saturating_add(policy.correct_points);
        } else {
            self.wrong_hits += 1;
            self.score = self.score.saturating_sub(policy.wrong_color_penalty);
        }
    }
}

/// One play-through of a roster
#[derive(Debug)]
pub struct Session {
    config: TunnelConfig,
    clock: FrameClock,
    pool: TargetPool,
    resolver: HitResolver,
    scoreboard: Scoreboard,
}

impl Session {
    /// Create a session after validating `config`
    pub fn new(config: TunnelConfig, cache: Arc<AvatarCache>) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "Creating session: {:?} strategy, spawn every {}s",
            config.hit.strategy,
            config.spawn.interval
        );

        Ok(Self {
            clock: FrameClock::new(config.session.max_delta),
            pool: TargetPool::new(&config, cache),
            resolver: HitResolver::new(&config.hit),
            scoreboard: Scoreboard::default(),
            config,
        })
    }

    /// Replace the roster and start preloading avatars
    pub fn configure(&mut self, players: Vec<Arc<Player>>) {
        self.pool.configure(players);
    }

    /// Block until the avatar preload settles
    pub fn wait_for_avatars(&self) -> PreloadReport {
        self.pool.wait_for_avatars()
    }

    /// Start or restart from the first player with a clean score
    pub fn start(&mut self) {
        self.pool.start();
        self.clock = FrameClock::new(self.config.session.max_delta);
        self.scoreboard = Scoreboard::default();
    }

    /// Advance the simulation by a raw frame delta
    ///
    /// The delta is capped at `session.max_delta`; negative or NaN deltas
    /// advance nothing.
    pub fn tick(&mut self, raw_delta: f32) -> TickReport {
        let delta = self.clock.advance_by(raw_delta);
        let report = self.pool.advance(delta);
        self.scoreboard.misses += u32::try_from(report.missed.len()).unwrap_or(u32::MAX);
        report
    }

    /// Fire a shot
    ///
    /// Shots of the strategy this session is not configured for are ignored
    /// and not counted.
    pub fn shoot(&mut self, shot: &Shot<'_>) -> Option<Hit> {
        if shot.strategy() != self.config.hit.strategy {
            log::warn!(
                "Ignoring {:?} shot in a {:?} session",
                shot.strategy(),
                self.config.hit.strategy
            );
            return None;
        }

        self.scoreboard.shots += 1;
        let hit = self.resolver.resolve(&mut self.pool, shot)?;
        self.scoreboard.record_hit(&hit, &self.config.session);
        log::info!("{} hit, score {}", hit.player.name, self.scoreboard.score);
        Some(hit)
    }

    /// Current score
    pub fn score(&self) -> u32 {
        self.scoreboard.score
    }

    /// Full tally
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Every player spawned and no target left in flight
    pub fn is_finished(&self) -> bool {
        self.pool.is_exhausted() && self.pool.live_count() == 0
    }

    /// Seconds simulated since `start`
    pub fn elapsed(&self) -> f32 {
        self.clock.total_time()
    }

    /// Active configuration
    pub fn config(&self) -> &TunnelConfig {
        &self.config
    }

    /// Target pool, for reading transforms each frame
    pub fn pool(&self) -> &TargetPool {
        &self.pool
    }

    /// Mutable target pool, for scripted placement
    pub fn pool_mut(&mut self) -> &mut TargetPool {
        &mut self.pool
    }

    /// Take pending scene commands for the renderer
    pub fn drain_commands(&mut self) -> Vec<SceneCommand> {
        self.pool.drain_commands()
    }
}
