//! Tunnel simulation
//!
//! - **TargetPool**: spawning, motion and retirement of player cards
//! - **FeedbackPool**: floating popups acknowledging hits
//! - **HitResolver**: ray and proximity matching of shots to targets
//! - **Session**: per-frame orchestration and scoring

pub mod target;
pub mod feedback;
pub mod resolver;
pub mod session;

pub use target::{Target, TargetPool, TickReport};
pub use feedback::{FeedbackPool, FeedbackPopup};
pub use resolver::{Hit, HitResolver, Shot};
pub use session::{Scoreboard, Session};
