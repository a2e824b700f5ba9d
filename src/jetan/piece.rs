use std::ops::Neg;

use serde::{Deserialize, Serialize};

use crate::jetan::coords::Square;

/// The two armies. Orange moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Orange,
    Black,
}

impl Color {
    /// Lowercase name, as used in seat and result identifiers.
    pub fn name(&self) -> &'static str {
        match self {
            Color::Orange => "orange",
            Color::Black => "black",
        }
    }

    /// Single-letter code for compact board rendering and piece ids.
    pub fn code(&self) -> char {
        match self {
            Color::Orange => 'o',
            Color::Black => 'b',
        }
    }
}

impl Neg for Color {
    type Output = Color;
    fn neg(self) -> Self::Output {
        match self {
            Color::Orange => Color::Black,
            Color::Black => Color::Orange,
        }
    }
}

/// The eight Jetan piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Panthan,
    Chief,
    Princess,
    Padwar,
    Warrior,
    Thoat,
    Dwar,
    Flier,
}

impl PieceType {
    /// Single-letter code for compact board rendering and piece ids.
    pub fn code(&self) -> char {
        match self {
            PieceType::Panthan => 'p',
            PieceType::Chief => 'C',
            PieceType::Princess => 'Q',
            PieceType::Padwar => 'P',
            PieceType::Warrior => 'W',
            PieceType::Thoat => 'T',
            PieceType::Dwar => 'D',
            PieceType::Flier => 'F',
        }
    }
}

/// A live piece: stable identity, kind, owner, and current square.
///
/// `has_escape` is meaningful only for the Princess; it starts true and is
/// cleared once her escape move is used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PieceType,
    pub color: Color,
    pub square: Square,
    #[serde(
        rename = "hasEscape",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub has_escape: bool,
}

impl Piece {
    pub fn new(id: impl Into<String>, kind: PieceType, color: Color, square: Square) -> Piece {
        Piece {
            id: id.into(),
            kind,
            color,
            square,
            has_escape: kind == PieceType::Princess,
        }
    }
}
