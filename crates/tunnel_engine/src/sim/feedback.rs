//! Feedback popups
//!
//! Short-lived floating labels acknowledging a hit. Purely cosmetic: nothing
//! here flows back into the target pool or the score.

use rand::Rng;
use rand::rngs::StdRng;

use crate::config::FeedbackConfig;
use crate::data::{CardColor, Player};
use crate::foundation::collections::{PopupId, PopupMap};
use crate::foundation::math::Vec3;
use crate::render::{CommandQueue, SceneCommand};

/// One floating popup
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackPopup {
    /// Text shown, player name and score
    pub label: String,
    /// Tint of the hit target
    pub color: Option<CardColor>,
    /// Current position
    pub position: Vec3,
    /// Drift per second
    pub velocity: Vec3,
    /// Seconds left before removal
    pub remaining: f32,
    /// Total lifetime the popup started with
    pub duration: f32,
    /// Current opacity in [0, 1]
    pub opacity: f32,
}

impl FeedbackPopup {
    /// Opacity for a given remaining lifetime
    fn fade(remaining: f32, duration: f32) -> f32 {
        (remaining / duration).clamp(0.0, 1.0)
    }

    /// Step drift and decay; returns `false` once expired
    fn advance(&mut self, delta: f32) -> bool {
        self.position += self.velocity * delta;
        self.remaining -= delta;
        self.opacity = Self::fade(self.remaining, self.duration);
        self.remaining > 0.0
    }
}

/// Owns every live popup
#[derive(Debug)]
pub struct FeedbackPool {
    config: FeedbackConfig,
    rng: StdRng,
    popups: PopupMap<FeedbackPopup>,
    commands: CommandQueue,
}

impl FeedbackPool {
    /// Create an empty pool
    pub fn new(config: FeedbackConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            popups: PopupMap::with_key(),
            commands: CommandQueue::new(),
        }
    }

    /// Spawn a popup for `player` at `position`
    ///
    /// Drift is random but always upward.
    pub fn spawn_popup(&mut self, player: &Player, position: Vec3) -> PopupId {
        let side = self.config.side_drift;
        let velocity = Vec3::new(
            self.rng.gen_range(-side..=side),
            self.rng.gen_range(self.config.rise_min..=self.config.rise_max),
            self.rng.gen_range(-side..=side),
        );
        let popup = FeedbackPopup {
            label: player.popup_label(),
            color: player.color,
            position,
            velocity,
            remaining: self.config.lifetime,
            duration: self.config.lifetime,
            opacity: 1.0,
        };

        let label = popup.label.clone();
        let color = popup.color;
        let id = self.popups.insert(popup);
        self.commands.push(SceneCommand::AddPopup { id, label, color, position });
        log::trace!("Popup {:?} for {}", id, player.name);
        id
    }

    /// Drift, fade and expire popups
    pub fn advance(&mut self, delta: f32) {
        let commands = &mut self.commands;
        self.popups.retain(|id, popup| {
            let alive = popup.advance(delta);
            if !alive {
                commands.push(SceneCommand::RemovePopup { id });
            }
            alive
        });
    }

    /// Drop every popup, releasing their visuals
    pub fn clear(&mut self) {
        for id in self.popups.keys() {
            self.commands.push(SceneCommand::RemovePopup { id });
        }
        self.popups.clear();
    }

    /// Look up a popup
    pub fn get(&self, id: PopupId) -> Option<&FeedbackPopup> {
        self.popups.get(id)
    }

    /// Live popups
    pub fn iter(&self) -> impl Iterator<Item = (PopupId, &FeedbackPopup)> {
        self.popups.iter()
    }

    /// Number of live popups
    pub fn len(&self) -> usize {
        self.popups.len()
    }

    /// Whether no popup is live
    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }

    /// Take pending scene commands
    pub fn drain_commands(&mut self) -> Vec<SceneCommand> {
        self.commands.drain()
    }
}
