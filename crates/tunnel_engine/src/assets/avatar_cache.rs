//! Avatar cache for deduplicating concurrent image loads
//!
//! Each URL owns one slot that moves `Pending -> Ready | Failed` exactly
//! once. The first `load` for a URL spawns a loader thread; every later call
//! for the same URL shares that slot, so one URL is fetched at most once per
//! cache lifetime. Failed slots stay failed; the pool renders a placeholder.
//!
//! The simulation never blocks here: it uses [`AvatarCache::get`] and
//! [`AvatarCache::has`], which only peek at the slot state.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use super::fetch::AvatarFetcher;
use super::image_loader::AvatarImage;
use super::AvatarError;

/// Load state of one URL
#[derive(Debug, Clone)]
enum SlotState {
    Pending,
    Ready(Arc<AvatarImage>),
    Failed(AvatarError),
}

/// Shared settle-once cell; waiters park on the condvar
#[derive(Debug)]
struct Slot {
    state: Mutex<SlotState>,
    settled: Condvar,
}

impl Slot {
    fn pending() -> Self {
        Self {
            state: Mutex::new(SlotState::Pending),
            settled: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// First settle wins; later calls are ignored
    fn settle(&self, result: Result<AvatarImage, AvatarError>) {
        let mut state = self.lock();
        if matches!(*state, SlotState::Pending) {
            *state = match result {
                Ok(image) => SlotState::Ready(Arc::new(image)),
                Err(err) => SlotState::Failed(err),
            };
            self.settled.notify_all();
        }
    }

    fn peek(&self) -> Option<Result<Arc<AvatarImage>, AvatarError>> {
        match &*self.lock() {
            SlotState::Pending => None,
            SlotState::Ready(image) => Some(Ok(Arc::clone(image))),
            SlotState::Failed(err) => Some(Err(err.clone())),
        }
    }

    fn wait(&self) -> Result<Arc<AvatarImage>, AvatarError> {
        let mut state = self.lock();
        loop {
            match &*state {
                SlotState::Ready(image) => return Ok(Arc::clone(image)),
                SlotState::Failed(err) => return Err(err.clone()),
                SlotState::Pending => {
                    state = self.settled.wait(state).unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }
}

/// Settles its slot as failed if the loader thread unwinds before finishing
struct LoaderGuard {
    url: String,
    slot: Arc<Slot>,
}

impl Drop for LoaderGuard {
    fn drop(&mut self) {
        self.slot.settle(Err(AvatarError::LoaderLost(self.url.clone())));
    }
}

/// Handle to one in-flight or finished avatar load
#[derive(Debug, Clone)]
pub struct AvatarRequest {
    url: String,
    slot: Arc<Slot>,
}

impl AvatarRequest {
    /// URL this request is for
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Block until the load settles
    pub fn wait(&self) -> Result<Arc<AvatarImage>, AvatarError> {
        self.slot.wait()
    }

    /// Non-blocking result; `None` while pending
    pub fn try_get(&self) -> Option<Result<Arc<AvatarImage>, AvatarError>> {
        self.slot.peek()
    }

    /// Whether the load finished, successfully or not
    pub fn is_settled(&self) -> bool {
        self.slot.peek().is_some()
    }

    /// Whether two requests share the same underlying load
    pub fn same_load(&self, other: &AvatarRequest) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

/// Outcome of a preload batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadReport {
    /// Avatars decoded successfully
    pub loaded: usize,
    /// Avatars that failed to fetch or decode
    pub failed: usize,
}

/// A batch of eager avatar loads
#[derive(Debug, Clone, Default)]
pub struct Preload {
    requests: Vec<AvatarRequest>,
}

impl Preload {
    /// Number of avatars in the batch
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Whether every load in the batch has settled
    pub fn is_ready(&self) -> bool {
        self.requests.iter().all(AvatarRequest::is_settled)
    }

    /// Block until every attempt settles
    ///
    /// Individual failures are logged and counted, never returned.
    pub fn wait(&self) -> PreloadReport {
        let mut report = PreloadReport::default();
        for request in &self.requests {
            match request.wait() {
                Ok(_) => report.loaded += 1,
                Err(err) => {
                    log::warn!("Avatar preload failed: {}", err);
                    report.failed += 1;
                }
            }
        }
        log::info!(
            "Avatar preload ready: {} loaded, {} failed",
            report.loaded,
            report.failed
        );
        report
    }
}

/// Memoized avatar loader keyed by URL
pub struct AvatarCache {
    fetcher: Arc<dyn AvatarFetcher>,
    slots: Mutex<HashMap<String, Arc<Slot>>>,
}

impl AvatarCache {
    /// Create an empty cache backed by `fetcher`
    pub fn new(fetcher: Arc<dyn AvatarFetcher>) -> Self {
        Self {
            fetcher,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Arc<Slot>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start loading `url`, or join the load already under way
    pub fn load(&self, url: &str) -> AvatarRequest {
        let (slot, is_new) = {
            let mut slots = self.slots();
            match slots.get(url) {
                Some(slot) => (Arc::clone(slot), false),
                None => {
                    let slot = Arc::new(Slot::pending());
                    slots.insert(url.to_string(), Arc::clone(&slot));
                    (slot, true)
                }
            }
        };

        if is_new {
            self.spawn_loader(url, Arc::clone(&slot));
        }

        AvatarRequest {
            url: url.to_string(),
            slot,
        }
    }

    fn spawn_loader(&self, url: &str, slot: Arc<Slot>) {
        if url.is_empty() {
            slot.settle(Err(AvatarError::Fetch {
                url: String::new(),
                reason: "empty avatar url".to_string(),
            }));
            return;
        }

        log::trace!("Loading avatar {}", url);
        let fetcher = Arc::clone(&self.fetcher);
        let guard = LoaderGuard {
            url: url.to_string(),
            slot: Arc::clone(&slot),
        };
        let spawned = std::thread::Builder::new()
            .name("avatar-loader".to_string())
            .spawn(move || {
                let result = fetcher
                    .fetch(&guard.url)
                    .and_then(|bytes| AvatarImage::from_bytes(&guard.url, &bytes));
                if let Err(err) = &result {
                    log::debug!("{}", err);
                }
                guard.slot.settle(result);
            });

        if let Err(err) = spawned {
            log::error!("Could not start avatar loader for {}: {}", url, err);
            slot.settle(Err(AvatarError::LoaderLost(url.to_string())));
        }
    }

    /// Decoded avatar if already loaded
    pub fn get(&self, url: &str) -> Option<Arc<AvatarImage>> {
        let slot = self.slots().get(url).map(Arc::clone)?;
        match slot.peek() {
            Some(Ok(image)) => Some(image),
            _ => None,
        }
    }

    /// Whether `url` finished loading successfully
    pub fn has(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    /// Whether a load for `url` was ever requested
    pub fn is_requested(&self, url: &str) -> bool {
        self.slots().contains_key(url)
    }

    /// Eagerly request up to `limit` avatars
    pub fn preload<'a, I>(&self, urls: I, limit: usize) -> Preload
    where
        I: IntoIterator<Item = &'a str>,
    {
        let requests = urls
            .into_iter()
            .take(limit)
            .map(|url| self.load(url))
            .collect::<Vec<_>>();
        log::debug!("Preloading {} avatars", requests.len());
        Preload { requests }
    }

    /// Number of URLs tracked
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    /// Whether the cache tracks no URLs
    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    /// Forget every entry; loads in flight finish into detached slots
    pub fn clear(&self) {
        self.slots().clear();
    }
}

impl std::fmt::Debug for AvatarCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
