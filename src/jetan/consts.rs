use crate::jetan::coords::Square;
use crate::jetan::piece::{Color, Piece, PieceType};
use crate::utils::prelude::*;

pub const BOARD_SIZE: usize = 10;
pub const PIECES_PER_SIDE: usize = 20;

/// Default clock budget per side, in seconds.
pub const DEFAULT_CLOCK_SECS: u64 = 600;

use PieceType::*;

const BACK_RANK: [PieceType; BOARD_SIZE] =
    [Warrior, Padwar, Dwar, Flier, Princess, Chief, Flier, Dwar, Padwar, Warrior];

const SECOND_RANK: [PieceType; BOARD_SIZE] =
    [Thoat, Panthan, Panthan, Panthan, Panthan, Panthan, Panthan, Panthan, Panthan, Thoat];

/// The standard 40-piece opening setup: Black occupies rows 0 and 1,
/// Orange rows 9 and 8. Piece ids are stable across games so that diff
/// streams replay against any fresh board.
pub fn initial_board() -> Vec<Piece> {
    let mut pieces = army(Color::Black, 0, 1);
    pieces.extend(army(Color::Orange, 9, 8));
    pieces
}

fn army(color: Color, back_row: usize, second_row: usize) -> Vec<Piece> {
    let mut counts: HashMap<PieceType, usize> = HashMap::new();
    let ranks = [(back_row, BACK_RANK), (second_row, SECOND_RANK)];
    ranks
        .iter()
        .flat_map(|&(row, rank)| {
            rank.into_iter().enumerate().map(move |(col, kind)| (row, col, kind))
        })
        .map(|(row, col, kind)| {
            let seq = counts.entry(kind).or_default();
            let id = format!("{}{}{}", color.code(), kind.code(), *seq);
            *seq += 1;
            Piece::new(id, kind, color, Square::at(row, col))
        })
        .collect()
}
