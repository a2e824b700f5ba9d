use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::jetan::prelude::*;
use crate::service::diff::{Diff, Event};

/// Clock configuration for a new game. `increment_sec` is accepted on the
/// wire but no increment is ever applied.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeControl {
    #[serde(default = "TimeControl::default_initial")]
    pub initial_sec: u64,
    #[serde(default)]
    pub increment_sec: u64,
}

impl TimeControl {
    const fn default_initial() -> u64 {
        DEFAULT_CLOCK_SECS
    }
}

impl Default for TimeControl {
    fn default() -> TimeControl {
        TimeControl { initial_sec: DEFAULT_CLOCK_SECS, increment_sec: 0 }
    }
}

/// Naive seconds-remaining accounting, one budget per side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Clocks {
    pub orange: u64,
    pub black: u64,
}

impl Clocks {
    fn get_mut(&mut self, color: Color) -> &mut u64 {
        match color {
            Color::Orange => &mut self.orange,
            Color::Black => &mut self.black,
        }
    }
}

/// Seat occupancy; occupants are opaque identifiers handed out at join time.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Seats {
    pub orange: Option<String>,
    pub black: Option<String>,
}

impl Seats {
    pub fn occupant_mut(&mut self, color: Color) -> &mut Option<String> {
        match color {
            Color::Orange => &mut self.orange,
            Color::Black => &mut self.black,
        }
    }
}

/// Game-level flags surfaced in every snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateFlags {
    pub princess_escaped_orange: bool,
    pub princess_escaped_black: bool,
}

impl StateFlags {
    pub fn set_escaped(&mut self, color: Color) {
        match color {
            Color::Orange => self.princess_escaped_orange = true,
            Color::Black => self.princess_escaped_black = true,
        }
    }
}

/// A point-in-time copy of the visible game state.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    pub pieces: Vec<Piece>,
    pub to_move: Color,
    pub result: Option<GameResult>,
    pub flags: StateFlags,
}

/// Everything a successful move hands back to the caller; also the unit the
/// idempotency cache replays.
#[derive(Clone, Debug, Serialize)]
pub struct MoveOutcome {
    pub applied: bool,
    pub version: u64,
    pub diff: Diff,
    pub events: Vec<Event>,
    pub clocks: Clocks,
}

const IDEMPOTENCY_CAPACITY: usize = 128;

/// Bounded key -> outcome store; oldest entries fall out first.
#[derive(Debug, Default)]
pub(crate) struct IdempotencyCache {
    entries: Vec<(String, MoveOutcome)>,
}

impl IdempotencyCache {
    pub fn get(&self, key: &str) -> Option<&MoveOutcome> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, outcome)| outcome)
    }

    pub fn put(&mut self, key: &str, outcome: MoveOutcome) {
        if self.entries.len() == IDEMPOTENCY_CAPACITY {
            self.entries.remove(0);
        }
        self.entries.push((key.into(), outcome));
    }
}

/// The authoritative, in-memory record of one game. Mutated only by the
/// coordinator while holding the record's lock.
#[derive(Debug)]
pub struct GameRecord {
    pub game_id: String,
    pub version: u64,
    pub board: Board,
    pub to_move: Color,
    pub result: Option<GameResult>,
    pub flags: StateFlags,
    pub seats: Seats,
    pub clocks: Clocks,
    pub last_turn_started_at: Instant,
    pub diffs: Vec<Diff>,
    pub events: Vec<Event>,
    pub(crate) idempotency: IdempotencyCache,
}

impl GameRecord {
    pub fn new(game_id: String, time: &TimeControl) -> GameRecord {
        GameRecord {
            game_id,
            version: 0,
            board: Board::new(),
            to_move: Color::Orange,
            result: None,
            flags: StateFlags::default(),
            seats: Seats::default(),
            clocks: Clocks { orange: time.initial_sec, black: time.initial_sec },
            last_turn_started_at: Instant::now(),
            diffs: vec![],
            events: vec![],
            idempotency: IdempotencyCache::default(),
        }
    }

    pub fn state(&self) -> StateView {
        StateView {
            pieces: self.board.pieces().to_vec(),
            to_move: self.to_move,
            result: self.result,
            flags: self.flags,
        }
    }

    /// Deducts the whole seconds elapsed since the turn started from the
    /// side to move, flooring at zero. Returns the remaining budget.
    pub fn tick_clock(&mut self) -> u64 {
        let elapsed = self.last_turn_started_at.elapsed().as_secs();
        let remaining = self.clocks.get_mut(self.to_move);
        *remaining = remaining.saturating_sub(elapsed);
        *remaining
    }
}
