//! Target pool
//!
//! Owns the player cards flying down the tunnel: when they spawn, where they
//! are, and when they leave. Each `advance` call runs one simulation tick:
//!
//! 1. accumulate the spawn timer
//! 2. spawn at most one target once the interval has elapsed
//! 3. integrate every live target by its fixed velocity
//! 4. retire targets that crossed the pass depth as misses
//! 5. step the feedback popups
//!
//! Players are consumed through a cursor and never replayed; a retired target
//! is never revived. Retired targets stay in the map, flagged dead, until the
//! end of the next tick so stale handles still resolve to "dead".

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::assets::{AvatarCache, AvatarImage, Preload, PreloadReport, NEUTRAL_TINT};
use crate::config::{AvatarConfig, MotionConfig, SpawnConfig, TunnelConfig};
use crate::data::{CardColor, Player};
use crate::foundation::collections::{TargetId, TargetMap};
use crate::foundation::math::Vec3;
use crate::physics::BoundingSphere;
use crate::render::{AvatarVisual, CommandQueue, RemovalReason, SceneCommand};

use super::feedback::FeedbackPool;

/// A single flying player card
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Player shown on the card
    pub player: Arc<Player>,
    /// Current world position
    pub position: Vec3,
    /// Velocity fixed at spawn
    pub velocity: Vec3,
    /// False once hit or missed
    pub alive: bool,
    /// Avatar texture, once loaded
    pub avatar: Option<Arc<AvatarImage>>,
    /// Session time at spawn, seconds
    pub spawned_at: f32,
}

impl Target {
    /// Color the card must be shot with
    pub fn color(&self) -> Option<CardColor> {
        self.player.color
    }

    /// Picking bounds
    pub fn bounds(&self, radius: f32) -> BoundingSphere {
        BoundingSphere::new(self.position, radius)
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Target spawned this tick, if any
    pub spawned: Option<TargetId>,
    /// Players whose targets passed the camera this tick
    pub missed: Vec<Arc<Player>>,
}

/// Spawns, moves and retires targets
#[derive(Debug)]
pub struct TargetPool {
    spawn: SpawnConfig,
    motion: MotionConfig,
    avatars: AvatarConfig,
    cache: Arc<AvatarCache>,
    rng: StdRng,

    players: Vec<Arc<Player>>,
    cursor: usize,
    spawn_timer: f32,
    elapsed: f32,

    targets: TargetMap<Target>,
    order: Vec<TargetId>,
    feedback: FeedbackPool,
    commands: CommandQueue,
    preload: Preload,
    placeholders: [Arc<AvatarImage>; 3],
}

impl TargetPool {
    /// Create an empty pool
    ///
    /// Seeded from `config.session.seed` when set, from entropy otherwise.
    pub fn new(config: &TunnelConfig, cache: Arc<AvatarCache>) -> Self {
        let mut rng = match config.session.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let feedback_rng = StdRng::seed_from_u64(rng.gen());

        Self {
            spawn: config.spawn.clone(),
            motion: config.motion.clone(),
            avatars: config.avatars.clone(),
            cache,
            rng,
            players: Vec::new(),
            cursor: 0,
            spawn_timer: 0.0,
            elapsed: 0.0,
            targets: TargetMap::with_key(),
            order: Vec::new(),
            feedback: FeedbackPool::new(config.feedback.clone(), feedback_rng),
            commands: CommandQueue::new(),
            preload: Preload::default(),
            placeholders: [NEUTRAL_TINT, CardColor::Red.rgba(), CardColor::Blue.rgba()]
                .map(|tint| Arc::new(AvatarImage::placeholder(tint))),
        }
    }

    /// Replace the player source and start preloading avatars
    ///
    /// Does not restart the session; call [`TargetPool::start`] for that.
    pub fn configure(&mut self, players: Vec<Arc<Player>>) {
        self.preload = self.cache.preload(
            players.iter().map(|p| p.avatar_url.as_str()),
            self.avatars.preload_count,
        );
        log::info!(
            "Configured {} players, preloading {} avatars",
            players.len(),
            self.preload.len()
        );
        self.players = players;
    }

    /// Whether every preloaded avatar has settled
    pub fn avatars_ready(&self) -> bool {
        self.preload.is_ready()
    }

    /// Block until the preload batch settles
    pub fn wait_for_avatars(&self) -> PreloadReport {
        self.preload.wait()
    }

    /// Reset cursor, timers and discard every live target and popup
    pub fn start(&mut self) {
        for &id in &self.order {
            if self.targets.get(id).is_some_and(|t| t.alive) {
                self.commands.push(SceneCommand::RemoveTarget {
                    id,
                    reason: RemovalReason::Reset,
                });
            }
        }
        self.targets.clear();
        self.order.clear();
        self.feedback.clear();
        self.cursor = 0;
        self.spawn_timer = 0.0;
        self.elapsed = 0.0;
        log::info!("Session started with {} players", self.players.len());
    }

    /// Run one simulation tick of `delta` seconds
    ///
    /// Never fails. Negative or non-finite deltas are treated as zero.
    pub fn advance(&mut self, delta: f32) -> TickReport {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let mut report = TickReport::default();

        self.elapsed += delta;
        self.spawn_timer += delta;

        if self.spawn_timer >= self.spawn.interval && self.cursor < self.players.len() {
            report.spawned = Some(self.spawn_next());
            self.spawn_timer = 0.0;
        }

        let pass_depth = self.motion.pass_depth;
        let mut passed = Vec::new();
        for &id in &self.order {
            let Some(target) = self.targets.get_mut(id) else { continue };
            if !target.alive {
                continue;
            }

            target.position += target.velocity * delta;

            if target.avatar.is_none() {
                if let Some(image) = self.cache.get(&target.player.avatar_url) {
                    target.avatar = Some(Arc::clone(&image));
                    self.commands.push(SceneCommand::AttachAvatar { id, image });
                }
            }

            if target.position.z > pass_depth {
                passed.push(id);
            }
        }

        for id in passed {
            if let Some(player) = self.retire(id, RemovalReason::Missed) {
                log::debug!("Missed {}", player.name);
                report.missed.push(player);
            }
        }

        self.feedback.advance(delta);
        self.sweep();

        log::trace!(
            "Tick {:.3}s: {} live, cursor {}/{}",
            delta,
            self.live_count(),
            self.cursor,
            self.players.len()
        );
        report
    }

    fn spawn_next(&mut self) -> TargetId {
        let player = Arc::clone(&self.players[self.cursor]);
        self.cursor += 1;

        let spread = self.spawn.spread;
        let drift = self.motion.lateral_drift;
        let position = Vec3::new(
            self.rng.gen_range(-spread..=spread),
            self.rng.gen_range(-spread..=spread),
            self.spawn.depth,
        );
        let velocity = Vec3::new(
            self.rng.gen_range(-drift..=drift),
            self.rng.gen_range(-drift..=drift),
            self.rng
                .gen_range(self.motion.forward_speed_min..=self.motion.forward_speed_max),
        );

        // Joins the preload if already requested
        self.cache.load(&player.avatar_url);
        if let Some(next) = self.players.get(self.cursor) {
            self.cache.load(&next.avatar_url);
        }

        let id = self.insert(player, position, velocity);
        log::debug!(
            "Spawned {:?} ({}) at {:?}",
            id,
            self.targets[id].player.name,
            position
        );
        id
    }

    /// Place a target at an exact position and velocity
    ///
    /// Bypasses the spawn timer and the player cursor; used for scripted
    /// sequences and tests.
    pub fn place_target(&mut self, player: Arc<Player>, position: Vec3, velocity: Vec3) -> TargetId {
        self.insert(player, position, velocity)
    }

    fn insert(&mut self, player: Arc<Player>, position: Vec3, velocity: Vec3) -> TargetId {
        let avatar = self.cache.get(&player.avatar_url);
        let visual = match &avatar {
            Some(image) => AvatarVisual::Image(Arc::clone(image)),
            None => AvatarVisual::Placeholder(self.placeholder(player.color)),
        };

        let id = self.targets.insert(Target {
            player: Arc::clone(&player),
            position,
            velocity,
            alive: true,
            avatar,
            spawned_at: self.elapsed,
        });
        self.order.push(id);
        self.commands.push(SceneCommand::AddTarget {
            id,
            player,
            position,
            avatar: visual,
        });
        id
    }

    /// Shared placeholder tile for a card color
    fn placeholder(&self, color: Option<CardColor>) -> Arc<AvatarImage> {
        let index = match color {
            None => 0,
            Some(CardColor::Red) => 1,
            Some(CardColor::Blue) => 2,
        };
        Arc::clone(&self.placeholders[index])
    }

    /// Mark a live target dead and release its visual
    ///
    /// Returns the player when the target was alive, `None` if it was
    /// already retired or unknown.
    pub(crate) fn retire(&mut self, id: TargetId, reason: RemovalReason) -> Option<Arc<Player>> {
        let target = self.targets.get_mut(id).filter(|t| t.alive)?;
        target.alive = false;
        self.commands.push(SceneCommand::RemoveTarget { id, reason });
        Some(Arc::clone(&target.player))
    }

    /// Drop dead targets from storage
    fn sweep(&mut self) {
        let targets = &mut self.targets;
        self.order.retain(|&id| {
            let alive = targets.get(id).is_some_and(|t| t.alive);
            if !alive {
                targets.remove(id);
            }
            alive
        });
    }

    /// Live targets in spawn order
    pub fn targets(&self) -> impl Iterator<Item = (TargetId, &Target)> {
        self.order
            .iter()
            .filter_map(|&id| self.targets.get(id).map(|t| (id, t)))
            .filter(|(_, t)| t.alive)
    }

    /// Look up a target, dead or alive
    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.get(id)
    }

    /// Number of live targets
    pub fn live_count(&self) -> usize {
        self.targets.values().filter(|t| t.alive).count()
    }

    /// Index of the next player to spawn
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Seconds accumulated toward the next spawn
    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    /// Seconds since `start`
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Players not yet spawned
    pub fn remaining_players(&self) -> usize {
        self.players.len().saturating_sub(self.cursor)
    }

    /// Whether every player has been spawned
    pub fn is_exhausted(&self) -> bool {
        self.remaining_players() == 0
    }

    /// Configured players
    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    /// Popups spawned by hits
    pub fn feedback(&self) -> &FeedbackPool {
        &self.feedback
    }

    /// Mutable access to the popups
    pub fn feedback_mut(&mut self) -> &mut FeedbackPool {
        &mut self.feedback
    }

    /// Take pending scene commands from targets and popups
    pub fn drain_commands(&mut self) -> Vec<SceneCommand> {
        let mut commands = self.commands.drain();
        commands.extend(self.feedback.drain_commands());
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryFetcher;
    use crate::config::HitConfig;
    use crate::sim::resolver::HitResolver;

    fn cache() -> Arc<AvatarCache> {
        Arc::new(AvatarCache::new(Arc::new(MemoryFetcher::new())))
    }

    fn players(n: usize) -> Vec<Arc<Player>> {
        (0..n)
            .map(|i| Arc::new(Player::new(format!("p{i}")).with_avatar(format!("mem://{i}"))))
            .collect()
    }

    fn pool(players_count: usize) -> TargetPool {
        let config = TunnelConfig::color_variant().with_seed(42);
        let mut pool = TargetPool::new(&config, cache());
        pool.configure(players(players_count));
        pool.start();
        pool
    }

    #[test]
    fn test_three_players_three_spawns_then_exhausted() {
        let mut pool = pool(3);
        for _ in 0..3 {
            assert!(pool.advance(0.5).spawned.is_some());
        }
        assert_eq!(pool.cursor(), 3);
        assert!(pool.is_exhausted());
        assert_eq!(pool.live_count(), 3);

        assert!(pool.advance(0.5).spawned.is_none());
        assert_eq!(pool.live_count(), 3);
    }

    #[test]
    fn test_at_most_one_spawn_per_advance() {
        let mut pool = pool(10);
        let report = pool.advance(5.0);
        assert!(report.spawned.is_some());
        assert_eq!(pool.cursor(), 1);
        assert_eq!(pool.spawn_timer(), 0.0);
    }

    #[test]
    fn test_spawn_waits_for_interval() {
        let mut pool = pool(2);
        assert!(pool.advance(0.2).spawned.is_none());
        assert!(pool.advance(0.2).spawned.is_none());
        assert!(pool.advance(0.1).spawned.is_some());
        assert_eq!(pool.cursor(), 1);
    }

    #[test]
    fn test_spawned_velocity_within_bounds() {
        let mut pool = pool(20);
        for _ in 0..20 {
            pool.advance(0.5);
        }
        let motion = MotionConfig::default();
        let spawn = SpawnConfig::default();
        for (_, target) in pool.targets() {
            assert!(target.velocity.x.abs() <= motion.lateral_drift);
            assert!(target.velocity.y.abs() <= motion.lateral_drift);
            assert!(target.velocity.z >= motion.forward_speed_min);
            assert!(target.velocity.z <= motion.forward_speed_max);
            assert!(target.position.x.abs() <= spawn.spread + motion.lateral_drift * 10.0);
        }
    }

    #[test]
    fn test_position_integrates_exactly() {
        let mut pool = pool(0);
        let velocity = Vec3::new(0.5, -0.25, 30.0);
        let start = Vec3::new(1.0, 2.0, -100.0);
        let id = pool.place_target(players(1).remove(0), start, velocity);

        pool.advance(0.016);
        let expected = start + velocity * 0.016;
        assert_eq!(pool.get(id).unwrap().position, expected);

        pool.advance(0.05);
        assert_eq!(pool.get(id).unwrap().position, expected + velocity * 0.05);
        assert_eq!(pool.get(id).unwrap().velocity, velocity);
    }

    #[test]
    fn test_target_passing_camera_is_missed() {
        let mut pool = pool(0);
        let pass = MotionConfig::default().pass_depth;
        let id = pool.place_target(
            players(1).remove(0),
            Vec3::new(0.0, 0.0, pass - 0.1),
            Vec3::new(0.0, 0.0, 20.0),
        );
        pool.drain_commands();
        assert_eq!(pool.live_count(), 1);

        let report = pool.advance(1.0);
        assert_eq!(report.missed.len(), 1);
        assert_eq!(pool.live_count(), 0);
        assert!(pool.feedback().is_empty());
        assert!(pool.get(id).is_none());

        let commands = pool.drain_commands();
        assert_eq!(
            commands,
            vec![SceneCommand::RemoveTarget { id, reason: RemovalReason::Missed }]
        );
    }

    #[test]
    fn test_start_resets_everything() {
        let mut pool = pool(5);
        pool.advance(0.5);
        pool.advance(0.5);
        pool.advance(0.2);
        pool.drain_commands();

        pool.start();
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.cursor(), 0);
        assert_eq!(pool.spawn_timer(), 0.0);
        assert_eq!(pool.elapsed(), 0.0);
        let resets = pool
            .drain_commands()
            .into_iter()
            .filter(|c| matches!(c, SceneCommand::RemoveTarget { reason: RemovalReason::Reset, .. }))
            .count();
        assert_eq!(resets, 2);

        pool.start();
        assert_eq!(pool.live_count(), 0);
        assert!(pool.drain_commands().is_empty());
    }

    #[test]
    fn test_start_discards_live_popups() {
        let mut pool = pool(0);
        let player = Arc::new(Player::new("hit").with_color(CardColor::Red));
        pool.place_target(player, Vec3::new(0.0, 0.0, -20.0), Vec3::zeros());
        let hit = HitResolver::new(&HitConfig::default())
            .resolve_proximity(&mut pool, Vec3::new(0.0, 0.0, -20.0), CardColor::Red);
        assert!(hit.is_some());
        pool.advance(0.1);
        assert_eq!(pool.feedback().len(), 1);
        let (popup, _) = pool.feedback().iter().next().unwrap();
        pool.drain_commands();

        pool.start();
        assert!(pool.feedback().is_empty());
        assert_eq!(pool.drain_commands(), vec![SceneCommand::RemovePopup { id: popup }]);
    }

    #[test]
    fn test_retire_is_once_only() {
        let mut pool = pool(1);
        let id = pool.advance(0.5).spawned.unwrap();
        assert!(pool.retire(id, RemovalReason::Hit).is_some());
        assert!(pool.retire(id, RemovalReason::Hit).is_none());
        assert_eq!(pool.live_count(), 0);
        assert!(pool.targets().next().is_none());
    }

    #[test]
    fn test_spawn_requests_lookahead_avatar() {
        let cache = cache();
        let mut config = TunnelConfig::color_variant().with_seed(1);
        config.avatars.preload_count = 0;
        let mut pool = TargetPool::new(&config, Arc::clone(&cache));
        pool.configure(players(3));
        pool.start();
        assert!(!cache.is_requested("mem://1"));

        pool.advance(0.5);
        assert!(cache.is_requested("mem://0"));
        assert!(cache.is_requested("mem://1"));
        assert!(!cache.is_requested("mem://2"));
    }

    #[test]
    fn test_missing_avatar_spawns_placeholder() {
        let mut pool = pool(1);
        pool.wait_for_avatars();
        pool.advance(0.5);
        let commands = pool.drain_commands();
        let [SceneCommand::AddTarget { avatar: AvatarVisual::Placeholder(tile), .. }] = commands.as_slice()
        else {
            panic!("expected one placeholder card, got {commands:?}");
        };
        assert_eq!(&tile.data[..4], &NEUTRAL_TINT);
    }

    #[test]
    fn test_placeholder_is_tinted_by_card_color() {
        let mut pool = pool(0);
        let red = Arc::new(Player::new("r").with_color(CardColor::Red));
        let blue = Arc::new(Player::new("b").with_color(CardColor::Blue));
        pool.place_target(Arc::clone(&red), Vec3::zeros(), Vec3::zeros());
        pool.place_target(Arc::clone(&red), Vec3::zeros(), Vec3::zeros());
        pool.place_target(blue, Vec3::zeros(), Vec3::zeros());

        let tiles: Vec<Arc<AvatarImage>> = pool
            .drain_commands()
            .into_iter()
            .filter_map(|c| match c {
                SceneCommand::AddTarget { avatar: AvatarVisual::Placeholder(tile), .. } => Some(tile),
                _ => None,
            })
            .collect();
        assert_eq!(tiles.len(), 3);
        assert_eq!(&tiles[0].data[..4], &CardColor::Red.rgba());
        assert_eq!(&tiles[2].data[..4], &CardColor::Blue.rgba());
        assert!(Arc::ptr_eq(&tiles[0], &tiles[1]));
    }

    #[test]
    fn test_seeded_pools_spawn_identically() {
        let mut a = pool(4);
        let mut b = pool(4);
        for _ in 0..4 {
            a.advance(0.5);
            b.advance(0.5);
        }
        let a_pos: Vec<_> = a.targets().map(|(_, t)| t.position).collect();
        let b_pos: Vec<_> = b.targets().map(|(_, t)| t.position).collect();
        assert_eq!(a_pos, b_pos);
    }
}
