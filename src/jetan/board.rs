use crate::jetan::prelude::*;

/// The set of live pieces in one game.
///
/// At most one piece occupies a square; positional lookups are linear scans,
/// which is fine at forty pieces or fewer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Board {
    pieces: Vec<Piece>,
}

/// The structural outcome of one applied move, ready to be folded into a
/// version diff.
#[derive(Clone, Debug)]
pub struct AppliedMove {
    pub mover_id: String,
    pub captured: Option<Piece>,
    pub escape_used: bool,
}

impl Board {
    /// Returns a board holding the standard opening setup.
    pub fn new() -> Board {
        Board { pieces: initial_board() }
    }

    /// Returns a board holding an arbitrary position.
    pub fn with_pieces(pieces: Vec<Piece>) -> Board {
        Board { pieces }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Finds the piece occupying a square, if any.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.square == square)
    }

    /// Applies a move, validating it first. Removes any captured enemy,
    /// advances the mover, and consumes the Princess's escape flag when the
    /// move is only reachable as her escape.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<AppliedMove> {
        let Some(piece) = self.piece_at(from).cloned() else {
            return Err(anyhow!("no piece at {from}"));
        };
        if !rules::validate_move(&piece, to, self) {
            return Err(anyhow!("this move is illegal: {from} to {to}"));
        }

        let escape_used = rules::is_escape_move(&piece, to, self);
        let captured = self.piece_at(to).cloned();

        for mover in self.pieces.iter_mut().filter(|p| p.id == piece.id) {
            mover.square = to;
            if escape_used {
                mover.has_escape = false;
            }
        }
        if let Some(prey) = &captured {
            self.pieces.retain(|p| p.id != prey.id);
        }

        Ok(AppliedMove { mover_id: piece.id, captured, escape_used })
    }

    /// Every square an enemy of `color` could reach in one move. The enemy
    /// Princess contributes nothing: she cannot capture.
    pub fn threatened_squares(&self, color: Color) -> BTreeSet<Square> {
        self.pieces
            .iter()
            .filter(|piece| piece.color != color && piece.kind != PieceType::Princess)
            .flat_map(|piece| rules::destinations(piece, self))
            .collect()
    }

    /// Renders the position as a ten-line grid for logs.
    pub fn pretty(&self) -> String {
        (0..BOARD_SIZE)
            .map(|row| {
                (0..BOARD_SIZE)
                    .map(|col| match self.piece_at(Square::at(row, col)) {
                        Some(piece) => format!("{}{}", piece.color.code(), piece.kind.code()),
                        None => "--".into(),
                    })
                    .join(" ")
            })
            .join("\n")
    }
}
