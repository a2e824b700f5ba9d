use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::jetan::prelude::*;

/// The structural delta one applied move makes to the board: enough, applied
/// in version order against the opening setup, to rebuild any position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Diff {
    pub added: Vec<Piece>,
    pub removed: Vec<String>,
    pub moved: Vec<MovedPiece>,
    #[serde(default)]
    pub flags: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovedPiece {
    pub id: String,
    pub to: Square,
}

impl Diff {
    /// Records the consumption of a Princess's escape.
    pub fn flag_escape(&mut self, color: Color) {
        self.flags.insert(escape_flag_name(color).into(), Value::Bool(true));
    }

    /// Replays this diff onto a piece list, the way a syncing client would.
    pub fn replay(&self, pieces: &mut Vec<Piece>) {
        pieces.retain(|piece| !self.removed.contains(&piece.id));
        for moved in &self.moved {
            for piece in pieces.iter_mut().filter(|p| p.id == moved.id) {
                piece.square = moved.to;
            }
        }
        pieces.extend(self.added.iter().cloned());
        for color in [Color::Orange, Color::Black] {
            if self.flags.get(escape_flag_name(color)).is_some_and(|v| v == &Value::Bool(true)) {
                for piece in pieces.iter_mut().filter(|p| p.kind == PieceType::Princess && p.color == color) {
                    piece.has_escape = false;
                }
            }
        }
    }
}

pub fn escape_flag_name(color: Color) -> &'static str {
    match color {
        Color::Orange => "princessEscapedOrange",
        Color::Black => "princessEscapedBlack",
    }
}

/// Append-only record of something that happened to a game. `v` is the
/// record's version immediately after the event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub payload: Value,
    pub v: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Move,
    Resign,
    PrincessEscape,
    Timeout,
}
