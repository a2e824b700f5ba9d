/*
 *  A server-authoritative implementation of Jetan (Martian chess) in Rust.
 */

pub(crate) mod board;
pub mod capabilities;
pub(crate) mod consts;
pub mod coords;
pub(crate) mod piece;
pub mod rules;

pub mod prelude {
    pub(crate) use crate::utils::prelude::*;

    pub use super::{
        board::{AppliedMove, Board},
        capabilities::{self, Capability, Path},
        consts::*,
        coords::{self, *},
        piece::{Color, Piece, PieceType},
        rules::{self, GameResult},
    };
}
