//! Player records and roster ingestion
//!
//! Players arrive once per session from the leaderboard fetch (or its bundled
//! fallback) and are shared read-only as `Arc<Player>` from then on.

use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use serde::{Serialize, Deserialize};

/// Laser color a card must be shot with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColor {
    /// Red laser
    Red,
    /// Blue laser
    Blue,
}

impl CardColor {
    /// Both colors, in a fixed order
    pub const ALL: [CardColor; 2] = [CardColor::Red, CardColor::Blue];

    /// The other color
    pub fn opposite(self) -> Self {
        match self {
            CardColor::Red => CardColor::Blue,
            CardColor::Blue => CardColor::Red,
        }
    }

    /// RGBA tint for placeholder cards
    pub fn rgba(self) -> [u8; 4] {
        match self {
            CardColor::Red => [235, 64, 82, 255],
            CardColor::Blue => [64, 146, 235, 255],
        }
    }
}

/// One leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Display name
    pub name: String,
    /// Global rank
    #[serde(default)]
    pub rank: u32,
    /// ISO-3166 alpha-2 country code
    #[serde(default)]
    pub country_code: String,
    /// Performance score, already formatted for display
    #[serde(default)]
    pub score: String,
    /// Rank within the country
    #[serde(default)]
    pub country_rank: u32,
    /// Avatar image location
    #[serde(default)]
    pub avatar_url: String,
    /// Required shot color, when the variant uses colors
    #[serde(default)]
    pub color: Option<CardColor>,
}

impl Player {
    /// Create a player with only a name; other fields take defaults
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rank: 0,
            country_code: String::new(),
            score: String::new(),
            country_rank: 0,
            avatar_url: String::new(),
            color: None,
        }
    }

    /// Set the rank
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = rank;
        self
    }

    /// Set the formatted score
    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.score = score.into();
        self
    }

    /// Set the avatar URL
    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = url.into();
        self
    }

    /// Set the required color
    pub fn with_color(mut self, color: CardColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Line shown on a hit popup, e.g. `"nightowl  29,144pp"`
    pub fn popup_label(&self) -> String {
        if self.score.is_empty() {
            self.name.clone()
        } else {
            format!("{}  {}", self.name, self.score)
        }
    }
}

/// Tag every untagged player with a random color
///
/// Already tagged players keep their color.
pub fn assign_colors<R: Rng + ?Sized>(players: &mut [Player], rng: &mut R) {
    for player in players.iter_mut().filter(|p| p.color.is_none()) {
        player.color = Some(CardColor::ALL[rng.gen_range(0..CardColor::ALL.len())]);
    }
}

/// Roster loading errors
#[derive(thiserror::Error, Debug)]
pub enum RosterError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported format
    #[error("Unsupported roster format: {0}")]
    UnsupportedFormat(String),
}

/// Ordered list of players, as fetched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    /// Players in leaderboard order
    pub players: Vec<Player>,
}

impl Roster {
    /// Parse a RON roster
    pub fn from_ron_str(source: &str) -> Result<Self, RosterError> {
        ron::from_str(source).map_err(|e| RosterError::Parse(e.to_string()))
    }

    /// Parse a TOML roster (`[[players]]` tables)
    pub fn from_toml_str(source: &str) -> Result<Self, RosterError> {
        toml::from_str(source).map_err(|e| RosterError::Parse(e.to_string()))
    }

    /// Load a roster file, dispatching on extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::from_ron_str(&contents),
            Some("toml") => Self::from_toml_str(&contents),
            _ => Err(RosterError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Number of players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Freeze into shared handles for the target pool
    pub fn into_shared(self) -> Vec<Arc<Player>> {
        self.players.into_iter().map(Arc::new).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_ron_roster_defaults_optional_fields() {
        let roster = Roster::from_ron_str(
            r#"(players: [
                (name: "alpha", rank: 1, score: "20,000pp", color: Some(red)),
                (name: "beta"),
            ])"#,
        )
        .unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.players[0].color, Some(CardColor::Red));
        assert_eq!(roster.players[1].rank, 0);
        assert_eq!(roster.players[1].color, None);
        assert!(roster.players[1].avatar_url.is_empty());
    }

    #[test]
    fn test_toml_roster() {
        let roster = Roster::from_toml_str(
            "[[players]]\nname = \"gamma\"\ncountry_code = \"FI\"\ncolor = \"blue\"\n",
        )
        .unwrap();
        assert_eq!(roster.players[0].country_code, "FI");
        assert_eq!(roster.players[0].color, Some(CardColor::Blue));
    }

    #[test]
    fn test_assign_colors_keeps_existing() {
        let mut players = vec![
            Player::new("a").with_color(CardColor::Blue),
            Player::new("b"),
            Player::new("c"),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        assign_colors(&mut players, &mut rng);
        assert_eq!(players[0].color, Some(CardColor::Blue));
        assert!(players.iter().all(|p| p.color.is_some()));
    }

    #[test]
    fn test_popup_label() {
        assert_eq!(Player::new("x").popup_label(), "x");
        assert_eq!(Player::new("x").with_score("1pp").popup_label(), "x  1pp");
    }

    #[test]
    fn test_opposite_color() {
        assert_eq!(CardColor::Red.opposite(), CardColor::Blue);
        assert_eq!(CardColor::Blue.opposite(), CardColor::Red);
    }
}
