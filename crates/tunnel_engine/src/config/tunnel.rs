//! # Tunnel Configuration
//!
//! Tuning for the target pool, hit resolver, feedback popups, avatar
//! preloading and session scoring. Every field has a default so partial
//! TOML/RON files are accepted.
//!
//! Two presets mirror the two shipped game variants:
//! - [`TunnelConfig::ray_variant`]: single-color ray picking, 0.3s waves
//! - [`TunnelConfig::color_variant`]: dual-color proximity shots, 0.5s waves

use serde::{Serialize, Deserialize};

use super::{Config, ConfigError};
use crate::foundation::time::DEFAULT_MAX_DELTA;

/// Which hit-test contract governs scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HitStrategy {
    /// Cast a ray from a screen point; nearest intersected target wins
    Ray,
    /// Distance test against a world position with a required color
    #[default]
    Proximity,
}

/// Wave spawning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seconds between consecutive spawns
    pub interval: f32,
    /// Depth (Z) at which targets appear
    pub depth: f32,
    /// Half-extent of the square spawn window on X and Y
    pub spread: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval: 0.5,
            depth: -150.0,
            spread: 8.0,
        }
    }
}

/// Target motion parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Slowest forward (+Z) speed, units per second
    pub forward_speed_min: f32,
    /// Fastest forward (+Z) speed, units per second
    pub forward_speed_max: f32,
    /// Maximum lateral drift speed on X and Y
    pub lateral_drift: f32,
    /// Depth past which an unhit target counts as missed
    pub pass_depth: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            forward_speed_min: 25.0,
            forward_speed_max: 40.0,
            lateral_drift: 1.5,
            pass_depth: 5.0,
        }
    }
}

/// Hit-test parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HitConfig {
    /// Active strategy
    pub strategy: HitStrategy,
    /// Proximity strategy: shot must land strictly closer than this
    pub hit_radius: f32,
    /// Ray strategy: bounding sphere radius of a target card
    pub target_radius: f32,
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            strategy: HitStrategy::Proximity,
            hit_radius: 3.0,
            target_radius: 2.0,
        }
    }
}

/// Feedback popup parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Total popup lifetime in seconds
    pub lifetime: f32,
    /// Slowest upward drift
    pub rise_min: f32,
    /// Fastest upward drift
    pub rise_max: f32,
    /// Maximum sideways drift on X and Z
    pub side_drift: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            lifetime: 1.5,
            rise_min: 1.5,
            rise_max: 3.0,
            side_drift: 1.0,
        }
    }
}

/// Avatar preloading parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// How many avatars to request eagerly on configure
    pub preload_count: usize,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self { preload_count: 50 }
    }
}

/// Session clock and scoring policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cap on a single frame delta, seconds
    pub max_delta: f32,
    /// Points for a hit with the matching color
    pub correct_points: u32,
    /// Points removed for a hit with the wrong color
    pub wrong_color_penalty: u32,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_delta: DEFAULT_MAX_DELTA,
            correct_points: 100,
            wrong_color_penalty: 50,
            seed: None,
        }
    }
}

/// Complete tunnel configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    /// Wave spawning
    pub spawn: SpawnConfig,
    /// Target motion
    pub motion: MotionConfig,
    /// Hit testing
    pub hit: HitConfig,
    /// Feedback popups
    pub feedback: FeedbackConfig,
    /// Avatar preloading
    pub avatars: AvatarConfig,
    /// Clock and scoring
    pub session: SessionConfig,
}

impl Config for TunnelConfig {}

impl TunnelConfig {
    /// Single-color variant: ray picking, faster waves
    pub fn ray_variant() -> Self {
        let mut config = Self::default();
        config.spawn.interval = 0.3;
        config.hit.strategy = HitStrategy::Ray;
        config
    }

    /// Dual-color variant: proximity shots with a color requirement
    pub fn color_variant() -> Self {
        Self::default()
    }

    /// Pin the RNG seed, for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.session.seed = Some(seed);
        self
    }

    /// Load from a TOML/RON file and validate
    pub fn load_validated(path: &str) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("spawn.interval", self.spawn.interval)?;
        non_negative("spawn.spread", self.spawn.spread)?;
        ordered(
            "motion.forward_speed",
            self.motion.forward_speed_min,
            self.motion.forward_speed_max,
        )?;
        non_negative("motion.lateral_drift", self.motion.lateral_drift)?;
        finite("spawn.depth", self.spawn.depth)?;
        finite("motion.pass_depth", self.motion.pass_depth)?;
        if self.spawn.depth >= self.motion.pass_depth {
            return Err(ConfigError::Invalid {
                field: "spawn.depth",
                reason: format!(
                    "spawn depth {} must lie before pass depth {}",
                    self.spawn.depth, self.motion.pass_depth
                ),
            });
        }
        non_negative("hit.hit_radius", self.hit.hit_radius)?;
        positive("hit.target_radius", self.hit.target_radius)?;
        positive("feedback.lifetime", self.feedback.lifetime)?;
        non_negative("feedback.rise_min", self.feedback.rise_min)?;
        ordered("feedback.rise", self.feedback.rise_min, self.feedback.rise_max)?;
        non_negative("feedback.side_drift", self.feedback.side_drift)?;
        positive("session.max_delta", self.session.max_delta)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("{value} is not a finite number") })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("{value} must be > 0") })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("{value} must be >= 0") })
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("range {min}..{max} is inverted") })
    }
}
