//! # Tunnel Engine
//!
//! Target lifecycle and hit resolution for a leaderboard tunnel shooter.
//! Leaderboard players fly toward the camera as cards; the player shoots them
//! before they pass.
//!
//! ## Features
//!
//! - **Avatar Cache**: memoized, off-thread avatar loading with preloading
//! - **Target Pool**: timed spawning, fixed-velocity motion, miss detection
//! - **Hit Resolution**: ray picking or color-checked proximity shots
//! - **Feedback**: fading popups for every hit
//! - **Renderer Boundary**: scene commands instead of draw calls
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tunnel_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = Arc::new(AvatarCache::new(Arc::new(FileFetcher::default())));
//!     let mut session = Session::new(TunnelConfig::color_variant(), cache)?;
//!     session.configure(Roster::from_file("players.ron")?.into_shared());
//!     session.start();
//!
//!     while !session.is_finished() {
//!         session.tick(1.0 / 60.0);
//!         for command in session.drain_commands() {
//!             // hand to the renderer
//!             let _ = command;
//!         }
//!     }
//!     println!("Final score: {}", session.score());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod data;
pub mod assets;
pub mod physics;
pub mod render;
pub mod input;
pub mod sim;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        foundation::{
            math::Vec3,
            time::FrameClock,
        },
        config::{Config, ConfigError, TunnelConfig, HitStrategy},
        data::{Player, CardColor, Roster, RosterError, assign_colors},
        assets::{AvatarCache, AvatarError, AvatarFetcher, FileFetcher, AvatarImage},
        physics::Ray,
        render::{Camera, SceneCommand, RemovalReason, AvatarVisual},
        input::PointerState,
        sim::{Session, Scoreboard, Shot, Hit, TargetPool, FeedbackPool},
    };
}
