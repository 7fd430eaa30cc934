//! Token kinds and grid cell contents

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// Token kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Car,
    Bus,
    Bike,
    Scooter,
    Train,
}

impl TokenKind {
    /// Every kind, in declaration order
    pub const ALL: [TokenKind; 5] = [
        TokenKind::Car,
        TokenKind::Bus,
        TokenKind::Bike,
        TokenKind::Scooter,
        TokenKind::Train,
    ];

    /// Draw a kind uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Lowercase name, also used as the asset key by renderers
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Car => "car",
            TokenKind::Bus => "bus",
            TokenKind::Bike => "bike",
            TokenKind::Scooter => "scooter",
            TokenKind::Train => "train",
        }
    }

    /// Single-letter tag for compact text boards
    pub fn symbol(&self) -> char {
        match self {
            TokenKind::Car => 'C',
            TokenKind::Bus => 'B',
            TokenKind::Bike => 'K',
            TokenKind::Scooter => 'S',
            TokenKind::Train => 'T',
        }
    }
}

impl std::str::FromStr for TokenKind {
    type Err = BoardError;

    /// Parse from a name or symbol (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "car" | "c" => Ok(TokenKind::Car),
            "bus" | "b" => Ok(TokenKind::Bus),
            "bike" | "k" => Ok(TokenKind::Bike),
            "scooter" | "s" => Ok(TokenKind::Scooter),
            "train" | "t" => Ok(TokenKind::Train),
            _ => Err(BoardError::UnknownTokenKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of one occupied cell
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Free-form tag owned by the caller (selection highlight and the like)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Self { kind, status: None }
    }

    pub fn with_status(kind: TokenKind, status: impl Into<String>) -> Self {
        Self {
            kind,
            status: Some(status.into()),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(TokenKind::random(rng))
    }
}

impl From<TokenKind> for Token {
    fn from(kind: TokenKind) -> Self {
        Token::new(kind)
    }
}

/// A grid cell: `None` is empty
pub type Cell = Option<Token>;
