//! Scene command queue
//!
//! Pools record what the renderer must create or release; the renderer
//! drains the queue once per frame. Per-frame transforms and opacity are not
//! queued, the renderer reads them from the pools directly.

use std::sync::Arc;

use crate::assets::AvatarImage;
use crate::data::{CardColor, Player};
use crate::foundation::collections::{PopupId, TargetId};
use crate::foundation::math::Vec3;

/// Why a target visual is being released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Resolved by a shot
    Hit,
    /// Passed the camera unhit
    Missed,
    /// Discarded by a session restart
    Reset,
}

/// Texture a target card starts with
#[derive(Debug, Clone, PartialEq)]
pub enum AvatarVisual {
    /// Avatar was already cached at spawn
    Image(Arc<AvatarImage>),
    /// Avatar missing, pending or failed; a flat tile in the card's color
    Placeholder(Arc<AvatarImage>),
}

/// One instruction for the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Create a card visual
    AddTarget {
        /// Target handle
        id: TargetId,
        /// Player shown on the card
        player: Arc<Player>,
        /// Spawn position
        position: Vec3,
        /// Initial texture
        avatar: AvatarVisual,
    },
    /// Swap a placeholder card texture for the loaded avatar
    AttachAvatar {
        /// Target handle
        id: TargetId,
        /// Decoded avatar
        image: Arc<AvatarImage>,
    },
    /// Release a card visual
    RemoveTarget {
        /// Target handle
        id: TargetId,
        /// Why it goes away
        reason: RemovalReason,
    },
    /// Create a floating popup
    AddPopup {
        /// Popup handle
        id: PopupId,
        /// Text to show
        label: String,
        /// Tint, taken from the hit target
        color: Option<CardColor>,
        /// Start position
        position: Vec3,
    },
    /// Release a popup visual
    RemovePopup {
        /// Popup handle
        id: PopupId,
    },
}

/// FIFO of pending scene commands
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<SceneCommand>,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&mut self, command: SceneCommand) {
        self.commands.push(command);
    }

    /// Take every pending command in order
    pub fn drain(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Pending commands, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &SceneCommand> {
        self.commands.iter()
    }

    /// Number of pending commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
