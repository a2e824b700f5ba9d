use serde::Serialize;

use crate::jetan::prelude::*;

/// Enumerates every path available to a piece across all of its capabilities.
pub fn paths<'a>(piece: &'a Piece, board: &'a Board) -> impl Iterator<Item = Path> + 'a {
    capabilities::for_piece(piece.kind, piece.color)
        .iter()
        .flat_map(move |capability| capability.paths(piece, board))
}

/// The deduplicated landing squares across all capabilities.
pub fn destinations(piece: &Piece, board: &Board) -> BTreeSet<Square> {
    capabilities::for_piece(piece.kind, piece.color)
        .iter()
        .flat_map(|capability| capability.destinations(piece, board))
        .collect()
}

/// Landing squares reachable without the Princess's escape.
pub fn standard_destinations(piece: &Piece, board: &Board) -> BTreeSet<Square> {
    capabilities::for_piece(piece.kind, piece.color)
        .iter()
        .filter(|capability| !matches!(capability, Capability::PrincessEscape))
        .flat_map(|capability| capability.destinations(piece, board))
        .collect()
}

/// A move is legal when some capability lands on its target, and a Princess
/// additionally never steps into a square her enemies could take next move.
pub fn validate_move(piece: &Piece, to: Square, board: &Board) -> bool {
    if !destinations(piece, board).contains(&to) {
        return false;
    }
    if piece.kind == PieceType::Princess && board.threatened_squares(piece.color).contains(&to) {
        return false;
    }
    true
}

/// True when a validated Princess target is reachable only as her escape.
pub fn is_escape_move(piece: &Piece, to: Square, board: &Board) -> bool {
    piece.kind == PieceType::Princess
        && piece.has_escape
        && !standard_destinations(piece, board).contains(&to)
}

/// The destinations a client may actually submit from a square: the threat
/// rule is applied here so `validate_move` never contradicts the listing.
pub fn legal_destinations(piece: &Piece, board: &Board) -> Vec<Square> {
    let mut targets = destinations(piece, board);
    if piece.kind == PieceType::Princess {
        let threatened = board.threatened_squares(piece.color);
        targets.retain(|square| !threatened.contains(square));
    }
    targets.into_iter().collect()
}

/// How a finished game ended. Capture results carry the winner, resignation
/// and timeout carry the loser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    ChiefCapture(Color),
    PrincessCapture(Color),
    Resign(Color),
    Timeout(Color),
}

impl GameResult {
    pub fn winner(&self) -> Color {
        match *self {
            GameResult::ChiefCapture(winner) | GameResult::PrincessCapture(winner) => winner,
            GameResult::Resign(loser) | GameResult::Timeout(loser) => -loser,
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            GameResult::ChiefCapture(winner) => write!(f, "chief_capture_{}", winner.name()),
            GameResult::PrincessCapture(winner) => write!(f, "princess_capture_{}", winner.name()),
            GameResult::Resign(loser) => write!(f, "resign_{}", loser.name()),
            GameResult::Timeout(loser) => write!(f, "timeout_{}", loser.name()),
        }
    }
}

impl Serialize for GameResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Whether taking `captured` ends the game on the spot.
pub fn capture_result(captured: &Piece, mover: Color) -> Option<GameResult> {
    match captured.kind {
        PieceType::Chief => Some(GameResult::ChiefCapture(mover)),
        PieceType::Princess => Some(GameResult::PrincessCapture(mover)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destinations_stay_on_the_board_and_off_friends() {
        let board = Board::new();
        for piece in board.pieces() {
            for target in destinations(piece, &board) {
                assert!(target.row() < BOARD_SIZE && target.col() < BOARD_SIZE);
                let friendly = board.piece_at(target).is_some_and(|b| b.color == piece.color);
                assert!(!friendly, "{} may not land on its own side at {target}", piece.id);
            }
        }
    }

    #[test]
    fn validation_matches_the_listing() {
        let board = Board::new();
        let panthan = board.piece_at(Square::at(8, 4)).unwrap();
        assert!(validate_move(panthan, Square::at(7, 4), &board));
        assert!(validate_move(panthan, Square::at(7, 3), &board));
        // Backward for Orange, and occupied by a friend respectively.
        assert!(!validate_move(panthan, Square::at(7, 5), &board));
        assert!(!validate_move(panthan, Square::at(9, 4), &board));
    }

    #[test]
    fn terminal_captures() {
        let chief = Piece::new("bC0", PieceType::Chief, Color::Black, Square::at(0, 5));
        let princess = Piece::new("bQ0", PieceType::Princess, Color::Black, Square::at(0, 4));
        let pawn = Piece::new("bp0", PieceType::Panthan, Color::Black, Square::at(1, 1));

        assert_eq!(
            capture_result(&chief, Color::Orange),
            Some(GameResult::ChiefCapture(Color::Orange))
        );
        assert_eq!(
            capture_result(&princess, Color::Orange),
            Some(GameResult::PrincessCapture(Color::Orange))
        );
        assert_eq!(capture_result(&pawn, Color::Orange), None);
    }

    #[test]
    fn result_identifiers() {
        assert_eq!(GameResult::ChiefCapture(Color::Orange).to_string(), "chief_capture_orange");
        assert_eq!(GameResult::PrincessCapture(Color::Black).to_string(), "princess_capture_black");
        assert_eq!(GameResult::Resign(Color::Orange).to_string(), "resign_orange");
        assert_eq!(GameResult::Timeout(Color::Black).to_string(), "timeout_black");

        assert_eq!(GameResult::Resign(Color::Orange).winner(), Color::Black);
        assert_eq!(GameResult::ChiefCapture(Color::Orange).winner(), Color::Orange);
    }
}
