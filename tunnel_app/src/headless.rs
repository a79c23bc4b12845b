//! Renderer stand-in that mirrors scene commands as counters

use std::collections::HashSet;

use tunnel_engine::foundation::collections::{PopupId, TargetId};
use tunnel_engine::render::{AvatarVisual, RemovalReason, SceneCommand};

/// Tracks which visuals a real renderer would currently hold
#[derive(Debug, Default)]
pub struct HeadlessScene {
    cards: HashSet<TargetId>,
    popups: HashSet<PopupId>,
    placeholders: usize,
    upgrades: usize,
    peak_cards: usize,
}

impl HeadlessScene {
    /// Apply one frame's worth of commands
    pub fn apply(&mut self, commands: Vec<SceneCommand>) {
        for command in commands {
            match command {
                SceneCommand::AddTarget { id, player, avatar, .. } => {
                    if matches!(avatar, AvatarVisual::Placeholder(_)) {
                        self.placeholders += 1;
                        log::debug!("Card for {} uses a placeholder", player.name);
                    }
                    self.cards.insert(id);
                    self.peak_cards = self.peak_cards.max(self.cards.len());
                }
                SceneCommand::AttachAvatar { id, image } => {
                    self.upgrades += 1;
                    log::debug!("Card {:?} upgraded to {}x{} avatar", id, image.width, image.height);
                }
                SceneCommand::RemoveTarget { id, reason } => {
                    if !self.cards.remove(&id) {
                        log::warn!("Renderer asked to release unknown card {:?}", id);
                    }
                    if reason == RemovalReason::Reset {
                        log::debug!("Card {:?} discarded by restart", id);
                    }
                }
                SceneCommand::AddPopup { id, label, .. } => {
                    log::debug!("Popup: {}", label);
                    self.popups.insert(id);
                }
                SceneCommand::RemovePopup { id } => {
                    self.popups.remove(&id);
                }
            }
        }
    }

    /// Whether nothing is left on screen
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.popups.is_empty()
    }

    /// Log a summary of what was drawn
    pub fn log_summary(&self) {
        log::info!(
            "Scene: peak {} cards, {} placeholders, {} late avatars",
            self.peak_cards,
            self.placeholders,
            self.upgrades
        );
    }
}
