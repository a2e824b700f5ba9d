use crate::jetan::board::Board;
use crate::jetan::consts::BOARD_SIZE;
use crate::jetan::coords::{
    ALL_MOVES, DIAGONAL_MOVES, Delta, ORTHO_MOVES, PANTHAN_MOVES_BLACK, PANTHAN_MOVES_ORANGE,
    Square,
};
use crate::jetan::piece::{Color, Piece, PieceType};
use crate::utils::prelude::*;

/// An ordered sequence of squares traversed by a single move. The first
/// element is the mover's square, the last is the destination.
pub type Path = Vec<Square>;

/// A movement rule: given a piece and a board, produces the paths the piece
/// may take. The full piece repertoire composes from five kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Walks `max_steps` single steps; every intermediate square must be empty.
    Stepper { dirs: &'static [Delta], max_steps: usize },
    /// Walks `max_steps` single steps; intermediate occupancy is ignored.
    Jumper { dirs: &'static [Delta], max_steps: usize },
    /// Jumper whose landing square must additionally be empty.
    JumperNoCapture { dirs: &'static [Delta], max_steps: usize },
    /// One orthogonal step followed by one diagonal step.
    Thoat,
    /// Once per game, the Princess may fly to any empty square.
    PrincessEscape,
}

impl Capability {
    /// Enumerates the paths this capability grants `piece` on `board`.
    pub fn paths<'a>(&self, piece: &Piece, board: &'a Board) -> CapabilityPaths<'a> {
        match *self {
            Capability::Stepper { dirs, max_steps } => {
                CapabilityPaths::Walk(PathWalker::new(board, piece, dirs, max_steps, WalkMode::Stepper))
            },
            Capability::Jumper { dirs, max_steps } => {
                CapabilityPaths::Walk(PathWalker::new(board, piece, dirs, max_steps, WalkMode::Jumper))
            },
            Capability::JumperNoCapture { dirs, max_steps } => {
                CapabilityPaths::Walk(PathWalker::new(board, piece, dirs, max_steps, WalkMode::JumperNoCapture))
            },
            Capability::Thoat => CapabilityPaths::Fixed(thoat_paths(piece, board).into_iter()),
            Capability::PrincessEscape => CapabilityPaths::Fixed(escape_paths(piece, board).into_iter()),
        }
    }

    /// The deduplicated landing squares of every path.
    pub fn destinations(&self, piece: &Piece, board: &Board) -> BTreeSet<Square> {
        self.paths(piece, board).filter_map(|path| path.last().copied()).collect()
    }
}

/// Paths produced by one capability; the DFS kinds stream lazily, the fixed
/// kinds are enumerated up front.
pub enum CapabilityPaths<'a> {
    Walk(PathWalker<'a>),
    Fixed(std::vec::IntoIter<Path>),
}

impl Iterator for CapabilityPaths<'_> {
    type Item = Path;
    fn next(&mut self) -> Option<Path> {
        match self {
            CapabilityPaths::Walk(walker) => walker.next(),
            CapabilityPaths::Fixed(paths) => paths.next(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WalkMode {
    Stepper,
    Jumper,
    JumperNoCapture,
}

/// Depth-first walk over the step tree, driven as an iterator with an
/// explicit cursor stack. `cursors[d]` is the next direction to try from
/// `path[d]`; a cursor running off the end of `dirs` pops the frame.
///
/// Yielded paths are exactly `max_steps` segments long, never revisit a
/// square, and land on an empty square or (capture kinds only) an enemy.
pub struct PathWalker<'a> {
    board: &'a Board,
    color: Color,
    dirs: &'static [Delta],
    max_steps: usize,
    mode: WalkMode,
    path: Path,
    cursors: Vec<usize>,
}

impl<'a> PathWalker<'a> {
    fn new(
        board: &'a Board,
        piece: &Piece,
        dirs: &'static [Delta],
        max_steps: usize,
        mode: WalkMode,
    ) -> PathWalker<'a> {
        PathWalker {
            board,
            color: piece.color,
            dirs,
            max_steps,
            mode,
            path: vec![piece.square],
            cursors: vec![0],
        }
    }
}

impl Iterator for PathWalker<'_> {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        loop {
            let depth = self.cursors.len().checked_sub(1)?;
            if self.cursors[depth] == self.dirs.len() {
                self.cursors.pop();
                self.path.pop();
                continue;
            }

            let dir = self.dirs[self.cursors[depth]];
            self.cursors[depth] += 1;

            let Some(next) = self.path[depth].step(dir) else { continue };
            if self.path.contains(&next) {
                continue; // no revisits within a move
            }

            let steps_left = self.max_steps - depth;
            let blocker = self.board.piece_at(next);

            if steps_left == 1 {
                let lands = match self.mode {
                    WalkMode::JumperNoCapture => blocker.is_none(),
                    _ => blocker.map_or(true, |b| b.color != self.color),
                };
                if lands {
                    let mut path = self.path.clone();
                    path.push(next);
                    return Some(path);
                }
                continue;
            }

            let passes = match self.mode {
                WalkMode::Stepper => blocker.is_none(),
                _ => true,
            };
            if passes {
                self.path.push(next);
                self.cursors.push(0);
            }
        }
    }
}

/// The Thoat's fixed two-segment L: the orthogonal intermediate only has to
/// be on the board, the diagonal landing must not hold a friendly piece.
fn thoat_paths(piece: &Piece, board: &Board) -> Vec<Path> {
    let mut paths = vec![];
    for first in ORTHO_MOVES {
        let Some(middle) = piece.square.step(first) else { continue };
        for second in DIAGONAL_MOVES {
            let Some(landing) = middle.step(second) else { continue };
            if board.piece_at(landing).is_some_and(|b| b.color == piece.color) {
                continue;
            }
            paths.push(vec![piece.square, middle, landing]);
        }
    }
    paths
}

/// Every empty square is a one-shot refuge while the escape flag holds.
fn escape_paths(piece: &Piece, board: &Board) -> Vec<Path> {
    if !piece.has_escape {
        return vec![];
    }
    let mut paths = vec![];
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let square = Square::at(row, col);
            if square != piece.square && board.piece_at(square).is_none() {
                paths.push(vec![piece.square, square]);
            }
        }
    }
    paths
}

/// The static movement table, keyed by kind and color. Only the Panthan
/// distinguishes its colors: each side loses the offsets retreating toward
/// its own edge of the column axis.
pub fn for_piece(kind: PieceType, color: Color) -> &'static [Capability] {
    match (kind, color) {
        (PieceType::Panthan, Color::Black) => &PANTHAN_BLACK,
        (PieceType::Panthan, Color::Orange) => &PANTHAN_ORANGE,
        (PieceType::Chief, _) => &CHIEF,
        (PieceType::Princess, _) => &PRINCESS,
        (PieceType::Padwar, _) => &PADWAR,
        (PieceType::Warrior, _) => &WARRIOR,
        (PieceType::Thoat, _) => &THOAT,
        (PieceType::Dwar, _) => &DWAR,
        (PieceType::Flier, _) => &FLIER,
    }
}

static PANTHAN_BLACK: [Capability; 1] =
    [Capability::Stepper { dirs: &PANTHAN_MOVES_BLACK, max_steps: 1 }];
static PANTHAN_ORANGE: [Capability; 1] =
    [Capability::Stepper { dirs: &PANTHAN_MOVES_ORANGE, max_steps: 1 }];
static CHIEF: [Capability; 1] = [Capability::Stepper { dirs: &ALL_MOVES, max_steps: 3 }];
static WARRIOR: [Capability; 1] = [Capability::Stepper { dirs: &ORTHO_MOVES, max_steps: 2 }];
static PADWAR: [Capability; 1] = [Capability::Stepper { dirs: &DIAGONAL_MOVES, max_steps: 2 }];
static DWAR: [Capability; 1] = [Capability::Stepper { dirs: &ORTHO_MOVES, max_steps: 3 }];
static FLIER: [Capability; 1] = [Capability::Jumper { dirs: &DIAGONAL_MOVES, max_steps: 3 }];
static THOAT: [Capability; 1] = [Capability::Thoat];
static PRINCESS: [Capability; 2] = [
    Capability::JumperNoCapture { dirs: &ALL_MOVES, max_steps: 3 },
    Capability::PrincessEscape,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_board() -> Board {
        Board::with_pieces(vec![])
    }

    fn count_paths(kind: PieceType, color: Color, square: Square, board: &Board) -> usize {
        let piece = Piece::new("test", kind, color, square);
        crate::jetan::rules::paths(&piece, board).count()
    }

    #[test]
    fn path_counts_on_an_empty_board() {
        let board = empty_board();
        let cases = [
            (PieceType::Panthan, Square::at(5, 5), 5),
            (PieceType::Panthan, Square::at(5, 9), 2),
            (PieceType::Panthan, Square::at(9, 9), 1),
            (PieceType::Chief, Square::at(5, 5), 368),
            (PieceType::Warrior, Square::at(5, 5), 12),
            (PieceType::Padwar, Square::at(5, 5), 12),
            (PieceType::Dwar, Square::at(5, 5), 36),
            (PieceType::Flier, Square::at(5, 5), 36),
            (PieceType::Flier, Square::at(0, 0), 5),
            (PieceType::Thoat, Square::at(5, 5), 16),
            (PieceType::Thoat, Square::at(0, 0), 4),
            (PieceType::Princess, Square::at(5, 5), 467),
        ];
        for (kind, square, expected) in cases {
            let counted = count_paths(kind, Color::Black, square, &board);
            assert_eq!(counted, expected, "{kind:?} at {square}");
        }
    }

    #[test]
    fn stepper_is_blocked_by_any_piece() {
        // A friendly piece on an adjacent square kills the three paths
        // passing through it.
        let board = Board::with_pieces(vec![Piece::new(
            "block",
            PieceType::Panthan,
            Color::Orange,
            Square::at(5, 6),
        )]);
        let count = count_paths(PieceType::Warrior, Color::Orange, Square::at(5, 5), &board);
        assert_eq!(count, 9);

        // An enemy there blocks passage just the same; it is not on a path
        // terminus, so no capture path appears either.
        let board = Board::with_pieces(vec![Piece::new(
            "block",
            PieceType::Panthan,
            Color::Black,
            Square::at(5, 6),
        )]);
        let count = count_paths(PieceType::Warrior, Color::Orange, Square::at(5, 5), &board);
        assert_eq!(count, 9);
    }

    #[test]
    fn stepper_captures_only_at_the_terminus() {
        let board = Board::with_pieces(vec![Piece::new(
            "prey",
            PieceType::Panthan,
            Color::Black,
            Square::at(3, 5),
        )]);
        let warrior = Piece::new("oW0", PieceType::Warrior, Color::Orange, Square::at(5, 5));
        let capability = Capability::Stepper { dirs: &ORTHO_MOVES, max_steps: 2 };

        // (5,5) -> (4,5) -> (3,5) lands on the enemy, so the path survives
        // and the enemy square is a destination.
        assert_eq!(capability.paths(&warrior, &board).count(), 12);
        assert!(capability.destinations(&warrior, &board).contains(&Square::at(3, 5)));
    }

    #[test]
    fn jumper_ignores_intermediate_occupancy() {
        let fence = |color: Color| {
            DIAGONAL_MOVES
                .iter()
                .enumerate()
                .map(|(i, &d)| {
                    let square = Square::at(5, 5).step(d).unwrap();
                    Piece::new(format!("fence{i}"), PieceType::Panthan, color, square)
                })
                .collect()
        };

        // Fully fence in a Flier with enemies: every empty-board path either
        // jumps clean over the fence or terminates on it as a capture.
        let board = Board::with_pieces(fence(Color::Black));
        let count = count_paths(PieceType::Flier, Color::Orange, Square::at(5, 5), &board);
        assert_eq!(count, 36);

        // A friendly fence still gets jumped, but the eight paths that curl
        // back onto a fence square lose their landing.
        let board = Board::with_pieces(fence(Color::Orange));
        let count = count_paths(PieceType::Flier, Color::Orange, Square::at(5, 5), &board);
        assert_eq!(count, 28);
    }

    #[test]
    fn jumper_no_capture_requires_an_empty_landing() {
        let princess = Piece::new("oQ0", PieceType::Princess, Color::Orange, Square::at(5, 5));
        let capability = Capability::JumperNoCapture { dirs: &ALL_MOVES, max_steps: 3 };

        let open = empty_board();
        let reachable = capability.destinations(&princess, &open);
        assert!(reachable.contains(&Square::at(2, 5)));

        // An enemy parked on a landing square removes it without affecting
        // travel through it.
        let board = Board::with_pieces(vec![Piece::new(
            "bW0",
            PieceType::Warrior,
            Color::Black,
            Square::at(2, 5),
        )]);
        let reachable = capability.destinations(&princess, &board);
        assert!(!reachable.contains(&Square::at(2, 5)));
        assert!(reachable.contains(&Square::at(2, 4)));
    }

    #[test]
    fn thoat_may_capture_but_not_stack() {
        // Both targets sit one orthogonal-plus-diagonal hop from (5,5),
        // through the (4,5) intermediate.
        let blocker = Piece::new("oW0", PieceType::Warrior, Color::Orange, Square::at(3, 4));
        let prey = Piece::new("bW0", PieceType::Warrior, Color::Black, Square::at(3, 6));
        let board = Board::with_pieces(vec![blocker, prey]);
        let thoat = Piece::new("oT0", PieceType::Thoat, Color::Orange, Square::at(5, 5));

        let reachable = Capability::Thoat.destinations(&thoat, &board);
        assert!(!reachable.contains(&Square::at(3, 4)));
        assert!(reachable.contains(&Square::at(3, 6)));
    }

    #[test]
    fn panthans_never_retreat() {
        let board = empty_board();
        let orange = Piece::new("op0", PieceType::Panthan, Color::Orange, Square::at(5, 5));
        let reachable: BTreeSet<_> = for_piece(PieceType::Panthan, Color::Orange)
            .iter()
            .flat_map(|c| c.destinations(&orange, &board))
            .collect();
        let expected: BTreeSet<_> = [
            Square::at(4, 5),
            Square::at(4, 4),
            Square::at(5, 4),
            Square::at(6, 4),
            Square::at(6, 5),
        ]
        .into_iter()
        .collect();
        assert_eq!(reachable, expected);
    }

    #[test]
    fn escape_consumes_with_the_flag() {
        let board = empty_board();
        let mut princess = Piece::new("oQ0", PieceType::Princess, Color::Orange, Square::at(5, 5));
        assert_eq!(Capability::PrincessEscape.paths(&princess, &board).count(), 99);

        princess.has_escape = false;
        assert_eq!(Capability::PrincessEscape.paths(&princess, &board).count(), 0);
    }
}
