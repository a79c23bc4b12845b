//! Renderer boundary
//!
//! The engine never draws. It owns a [`Camera`] description for picking and
//! hands the renderer a queue of [`SceneCommand`]s describing which visuals to
//! add, upgrade and release.

pub mod camera;
pub mod commands;

pub use camera::Camera;
pub use commands::{SceneCommand, CommandQueue, RemovalReason, AvatarVisual};
