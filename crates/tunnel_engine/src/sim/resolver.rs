//! Hit resolution
//!
//! Two strategies select a candidate from the live targets, then a single
//! commit step retires it and spawns its popup:
//!
//! - **Ray**: cast from a screen point (or an explicit ray), nearest
//!   intersected bounding sphere wins. Single-color, so every hit is correct.
//! - **Proximity**: first live target in spawn order strictly closer than the
//!   hit radius to a world position. Correct when the target's color equals
//!   the shot color. A wrong-color hit still consumes the target.
//!
//! At most one target is retired per call, and a retired target can never be
//! selected again.

use std::sync::Arc;

use crate::config::{HitConfig, HitStrategy};
use crate::data::{CardColor, Player};
use crate::foundation::collections::TargetId;
use crate::foundation::math::Vec3;
use crate::physics::Ray;
use crate::render::{Camera, RemovalReason};

use super::target::TargetPool;

/// A shot fired by the player
#[derive(Debug, Clone, Copy)]
pub enum Shot<'a> {
    /// Click in NDC through the given camera
    Screen {
        /// NDC X in [-1, 1]
        x: f32,
        /// NDC Y in [-1, 1], +Y up
        y: f32,
        /// Camera the click was made through
        camera: &'a Camera,
    },
    /// Explicit world-space ray
    Ray(Ray),
    /// World position with the laser color used
    Proximity {
        /// Where the shot landed
        position: Vec3,
        /// Laser color
        color: CardColor,
    },
}

impl Shot<'_> {
    /// Strategy this shot belongs to
    pub fn strategy(&self) -> HitStrategy {
        match self {
            Shot::Screen { .. } | Shot::Ray(_) => HitStrategy::Ray,
            Shot::Proximity { .. } => HitStrategy::Proximity,
        }
    }
}

/// A resolved hit
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Retired target
    pub target: TargetId,
    /// Player on the card
    pub player: Arc<Player>,
    /// Where the card was when hit
    pub position: Vec3,
    /// Whether the shot color matched the card
    pub correct: bool,
}

/// Selected but not yet committed
#[derive(Debug, Clone, Copy)]
struct Candidate {
    id: TargetId,
    correct: bool,
}

/// Resolves shots against a target pool
#[derive(Debug, Clone)]
pub struct HitResolver {
    hit_radius: f32,
    target_radius: f32,
}

impl HitResolver {
    /// Create a resolver from hit settings
    pub fn new(config: &HitConfig) -> Self {
        Self {
            hit_radius: config.hit_radius,
            target_radius: config.target_radius,
        }
    }

    /// Resolve any shot kind
    pub fn resolve(&self, pool: &mut TargetPool, shot: &Shot<'_>) -> Option<Hit> {
        match *shot {
            Shot::Screen { x, y, camera } => self.resolve_screen(pool, camera, x, y),
            Shot::Ray(ray) => self.resolve_ray(pool, &ray),
            Shot::Proximity { position, color } => self.resolve_proximity(pool, position, color),
        }
    }

    /// Ray strategy from a click in NDC
    pub fn resolve_screen(&self, pool: &mut TargetPool, camera: &Camera, x: f32, y: f32) -> Option<Hit> {
        let Some(ray) = camera.screen_to_world_ray(x, y) else {
            log::warn!("Camera cannot unproject ({}, {}); shot ignored", x, y);
            return None;
        };
        self.resolve_ray(pool, &ray)
    }

    /// Ray strategy: nearest intersected live target
    pub fn resolve_ray(&self, pool: &mut TargetPool, ray: &Ray) -> Option<Hit> {
        let candidate = self.pick_nearest(pool, ray)?;
        Self::commit(pool, candidate)
    }

    /// Proximity strategy: first live target inside the hit radius
    pub fn resolve_proximity(&self, pool: &mut TargetPool, position: Vec3, color: CardColor) -> Option<Hit> {
        let candidate = self.pick_within_radius(pool, position, color)?;
        Self::commit(pool, candidate)
    }

    fn pick_nearest(&self, pool: &TargetPool, ray: &Ray) -> Option<Candidate> {
        pool.targets()
            .filter_map(|(id, target)| {
                target
                    .bounds(self.target_radius)
                    .intersect_ray(ray)
                    .map(|t| (id, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| Candidate { id, correct: true })
    }

    fn pick_within_radius(&self, pool: &TargetPool, position: Vec3, color: CardColor) -> Option<Candidate> {
        pool.targets()
            .find(|(_, target)| target.bounds(self.hit_radius).contains_point(&position))
            .map(|(id, target)| Candidate {
                id,
                correct: target.color() == Some(color),
            })
    }

    fn commit(pool: &mut TargetPool, candidate: Candidate) -> Option<Hit> {
        let position = pool.get(candidate.id)?.position;
        let player = pool.retire(candidate.id, RemovalReason::Hit)?;
        pool.feedback_mut().spawn_popup(&player, position);

        log::debug!(
            "Hit {} ({})",
            player.name,
            if candidate.correct { "correct" } else { "wrong color" }
        );

        Some(Hit {
            target: candidate.id,
            player,
            position,
            correct: candidate.correct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AvatarCache, MemoryFetcher};
    use crate::config::TunnelConfig;
    use crate::render::SceneCommand;

    fn empty_pool() -> TargetPool {
        let cache = Arc::new(AvatarCache::new(Arc::new(MemoryFetcher::new())));
        let mut pool = TargetPool::new(&TunnelConfig::default().with_seed(5), cache);
        pool.start();
        pool
    }

    fn player(name: &str, color: CardColor) -> Arc<Player> {
        Arc::new(Player::new(name).with_color(color))
    }

    fn still(pool: &mut TargetPool, name: &str, color: CardColor, position: Vec3) -> TargetId {
        pool.place_target(player(name, color), position, Vec3::zeros())
    }

    fn resolver() -> HitResolver {
        HitResolver::new(&HitConfig::default())
    }

    #[test]
    fn test_proximity_inside_radius_is_correct_hit() {
        let mut pool = empty_pool();
        let id = still(&mut pool, "a", CardColor::Red, Vec3::new(2.9, 0.0, -20.0));

        let hit = resolver()
            .resolve_proximity(&mut pool, Vec3::new(0.0, 0.0, -20.0), CardColor::Red)
            .unwrap();
        assert_eq!(hit.target, id);
        assert_eq!(hit.player.name, "a");
        assert!(hit.correct);
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn test_proximity_outside_radius_misses() {
        let mut pool = empty_pool();
        still(&mut pool, "a", CardColor::Red, Vec3::new(3.1, 0.0, -20.0));

        let hit = resolver().resolve_proximity(&mut pool, Vec3::new(0.0, 0.0, -20.0), CardColor::Red);
        assert!(hit.is_none());
        assert_eq!(pool.live_count(), 1);
        assert!(pool.feedback().is_empty());
    }

    #[test]
    fn test_wrong_color_still_consumes_target() {
        let mut pool = empty_pool();
        still(&mut pool, "a", CardColor::Blue, Vec3::new(0.0, 1.0, -20.0));

        let hit = resolver()
            .resolve_proximity(&mut pool, Vec3::new(0.0, 0.0, -20.0), CardColor::Red)
            .unwrap();
        assert!(!hit.correct);
        assert_eq!(pool.live_count(), 0);

        // Popup shows the card's own color, not the shot's
        let (_, popup) = pool.feedback().iter().next().unwrap();
        assert_eq!(popup.color, Some(CardColor::Blue));
    }

    #[test]
    fn test_proximity_first_in_spawn_order_wins() {
        let mut pool = empty_pool();
        let first = still(&mut pool, "far", CardColor::Red, Vec3::new(2.5, 0.0, -20.0));
        still(&mut pool, "near", CardColor::Red, Vec3::new(0.1, 0.0, -20.0));

        let hit = resolver()
            .resolve_proximity(&mut pool, Vec3::new(0.0, 0.0, -20.0), CardColor::Red)
            .unwrap();
        assert_eq!(hit.target, first);
        assert_eq!(pool.live_count(), 1);
    }

    #[test]
    fn test_same_query_cannot_hit_same_target_twice() {
        let mut pool = empty_pool();
        let id = still(&mut pool, "a", CardColor::Red, Vec3::new(0.0, 0.0, -20.0));
        let shot = Shot::Proximity { position: Vec3::new(0.0, 0.0, -20.0), color: CardColor::Red };
        let resolver = resolver();

        assert_eq!(resolver.resolve(&mut pool, &shot).map(|h| h.target), Some(id));
        assert!(resolver.resolve(&mut pool, &shot).is_none());
        assert_eq!(pool.feedback().len(), 1);
    }

    #[test]
    fn test_ray_hits_nearest_target() {
        let mut pool = empty_pool();
        still(&mut pool, "back", CardColor::Red, Vec3::new(0.0, 0.0, -60.0));
        let front = still(&mut pool, "front", CardColor::Red, Vec3::new(0.0, 0.0, -30.0));

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let hit = resolver().resolve_ray(&mut pool, &ray).unwrap();
        assert_eq!(hit.target, front);
        assert!(hit.correct);
        assert_eq!(pool.live_count(), 1);

        let hit = resolver().resolve_ray(&mut pool, &ray).unwrap();
        assert_eq!(hit.player.name, "back");
        assert!(resolver().resolve_ray(&mut pool, &ray).is_none());
    }

    #[test]
    fn test_screen_shot_through_camera() {
        let mut pool = empty_pool();
        let id = still(&mut pool, "a", CardColor::Blue, Vec3::new(0.0, 0.0, -40.0));
        let camera = Camera::perspective(Vec3::zeros(), 60.0, 1.0, 0.1, 500.0);

        let miss = Shot::Screen { x: 0.9, y: 0.9, camera: &camera };
        assert!(resolver().resolve(&mut pool, &miss).is_none());

        let hit = Shot::Screen { x: 0.0, y: 0.0, camera: &camera };
        assert_eq!(resolver().resolve(&mut pool, &hit).map(|h| h.target), Some(id));
    }

    #[test]
    fn test_hit_emits_remove_and_popup() {
        let mut pool = empty_pool();
        let id = still(&mut pool, "a", CardColor::Red, Vec3::new(0.0, 0.0, -20.0));
        pool.drain_commands();

        resolver().resolve_proximity(&mut pool, Vec3::new(0.0, 0.0, -20.0), CardColor::Red);
        let commands = pool.drain_commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], SceneCommand::RemoveTarget { id, reason: RemovalReason::Hit });
        assert!(matches!(commands[1], SceneCommand::AddPopup { .. }));
    }

    #[test]
    fn test_shot_strategy() {
        let camera = Camera::default();
        assert_eq!(Shot::Screen { x: 0.0, y: 0.0, camera: &camera }.strategy(), HitStrategy::Ray);
        assert_eq!(
            Shot::Proximity { position: Vec3::zeros(), color: CardColor::Red }.strategy(),
            HitStrategy::Proximity
        );
    }
}
