//! Player data supplied by the leaderboard collaborator

pub mod player;

pub use player::{Player, CardColor, Roster, RosterError, assign_colors};
