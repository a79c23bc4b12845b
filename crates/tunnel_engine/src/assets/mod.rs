//! Asset management system
//!
//! Avatar images for target cards: fetched off the simulation thread,
//! decoded once, and shared through a URL-keyed cache.

pub mod image_loader;
pub mod fetch;
pub mod avatar_cache;

pub use image_loader::{AvatarImage, NEUTRAL_TINT};
pub use fetch::{AvatarFetcher, FileFetcher, MemoryFetcher};
pub use avatar_cache::{AvatarCache, AvatarRequest, Preload, PreloadReport};

use thiserror::Error;

/// Avatar loading errors
///
/// Always recoverable: the caller falls back to a placeholder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvatarError {
    /// Bytes could not be retrieved
    #[error("Failed to fetch avatar {url}: {reason}")]
    Fetch {
        /// Requested URL
        url: String,
        /// Underlying cause
        reason: String,
    },

    /// Bytes were not a decodable image
    #[error("Failed to decode avatar {url}: {reason}")]
    Decode {
        /// Requested URL
        url: String,
        /// Underlying cause
        reason: String,
    },

    /// The loader thread ended without a result
    #[error("Avatar loader for {0} stopped before finishing")]
    LoaderLost(String),
}
