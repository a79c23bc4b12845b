//! Avatar byte sources
//!
//! The HTTP client lives outside the engine; it plugs in through
//! [`AvatarFetcher`]. Two implementations ship here: [`FileFetcher`] for
//! avatars bundled on disk and [`MemoryFetcher`] for tests and fixtures.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::AvatarError;

/// Blocking source of encoded avatar bytes
///
/// Called from loader threads, never from the simulation tick.
pub trait AvatarFetcher: Send + Sync {
    /// Fetch the encoded image behind `url`
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AvatarError>;
}

/// Resolves avatar URLs as paths on the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    root: Option<PathBuf>,
}

impl FileFetcher {
    /// Resolve relative paths against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }

    fn resolve(&self, url: &str) -> Result<PathBuf, AvatarError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Err(AvatarError::Fetch {
                url: url.to_string(),
                reason: "remote avatars need a network fetcher".to_string(),
            });
        }
        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        Ok(match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        })
    }
}

impl AvatarFetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AvatarError> {
        let path = self.resolve(url)?;
        std::fs::read(&path).map_err(|e| AvatarError::Fetch {
            url: url.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })
    }
}

/// In-memory avatar source that counts requests
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    assets: HashMap<String, Vec<u8>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl MemoryFetcher {
    /// Create an empty fetcher; every URL fails until inserted
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` for `url`
    pub fn with_asset(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.assets.insert(url.into(), bytes);
        self
    }

    /// Sleep this long inside every fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// How many fetches were issued
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AvatarFetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AvatarError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.assets.get(url).cloned().ok_or_else(|| AvatarError::Fetch {
            url: url.to_string(),
            reason: "not found".to_string(),
        })
    }
}
