mod diff;
mod errors;
mod record;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use diff::{Diff, Event, EventKind, MovedPiece, escape_flag_name};
pub use errors::{ServiceError, ServiceResult};
pub use record::{Clocks, GameRecord, MoveOutcome, Seats, StateFlags, StateView, TimeControl};

use crate::jetan::prelude::*;

/// A move submission, shape-validated by the boundary; the coordinator
/// enforces the semantics.
#[derive(Clone, Debug, Deserialize)]
pub struct MoveRequest {
    pub action: String,
    pub from: Square,
    pub to: Square,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Control actions recognized at the boundary. Only resignation resolves;
/// draw negotiation has no semantics here yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Resign,
    OfferDraw,
    AcceptDraw,
    DeclineDraw,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct ControlOutcome {
    pub result: GameResult,
    pub winner: Color,
}

#[derive(Clone, Debug)]
pub struct CreatedGame {
    pub game_id: String,
    pub version: u64,
    pub state: StateView,
}

#[derive(Clone, Debug, Serialize)]
pub struct LegalMoves {
    pub from: Square,
    pub destinations: Vec<Square>,
    pub version: u64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffPage {
    pub from_version: u64,
    pub to_version: u64,
    pub diffs: Vec<Diff>,
}

/// The authoritative game coordinator. The table lock only guards insert
/// and lookup; every mutation of a game happens under that record's own
/// lock, so games never contend with each other.
pub struct GameService {
    games: RwLock<HashMap<String, Arc<Mutex<GameRecord>>>>,
}

impl Default for GameService {
    fn default() -> GameService {
        GameService::new()
    }
}

impl GameService {
    pub fn new() -> GameService {
        GameService { games: RwLock::new(HashMap::new()) }
    }

    /// Allocates a fresh game on the standard setup. The requested seats are
    /// accepted but both start unoccupied; `incrementSec` is recorded nowhere.
    pub fn create_game(&self, variant: &str, time: &TimeControl) -> CreatedGame {
        let game_id = format!("g_{}", &Uuid::new_v4().simple().to_string()[..8]);
        let record = GameRecord::new(game_id.clone(), time);
        let created = CreatedGame { game_id: game_id.clone(), version: record.version, state: record.state() };
        log::debug!("game {game_id} opens as:\n{}", record.board.pretty());

        self.games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(game_id.clone(), Arc::new(Mutex::new(record)));

        log::info!("created game {game_id} (variant {variant}, {}s clocks)", time.initial_sec);
        created
    }

    pub fn get_snapshot(&self, game_id: &str) -> ServiceResult<(u64, StateView)> {
        let record = self.must(game_id)?;
        let record = lock(&record);
        Ok((record.version, record.state()))
    }

    /// Claims a seat. Joining with no seat is a spectator no-op.
    pub fn join_game(&self, game_id: &str, seat: Option<&str>) -> ServiceResult<Option<Color>> {
        let record = self.must(game_id)?;
        let Some(seat) = seat else {
            return Ok(None);
        };
        let color = match seat.to_ascii_lowercase().as_str() {
            "orange" => Color::Orange,
            "black" => Color::Black,
            _ => return Err(ServiceError::Seat(format!("invalid seat {seat}"))),
        };

        let mut record = lock(&record);
        if record.result.is_some() {
            return Err(ServiceError::Finished);
        }
        let occupant = record.seats.occupant_mut(color);
        if occupant.is_some() {
            return Err(ServiceError::Seat("seat taken".into()));
        }
        *occupant = Some(format!("anon-{}", &Uuid::new_v4().simple().to_string()[..6]));

        log::info!("game {game_id}: {} seat claimed", color.name());
        Ok(Some(color))
    }

    /// Resolves a control action. Only resignation is implemented; the draw
    /// actions are recognized and refused.
    pub fn apply_control(&self, game_id: &str, action: ControlAction) -> ServiceResult<ControlOutcome> {
        let record = self.must(game_id)?;
        let mut record = lock(&record);
        if record.result.is_some() {
            return Err(ServiceError::Finished);
        }

        match action {
            ControlAction::Resign => {
                let loser = record.to_move;
                let result = GameResult::Resign(loser);
                record.result = Some(result);
                let event = Event {
                    kind: EventKind::Resign,
                    payload: serde_json::json!({"side": loser}),
                    v: record.version,
                };
                record.events.push(event);

                log::info!("game {game_id}: {result}");
                Ok(ControlOutcome { result, winner: result.winner() })
            },
            _ => Err(ServiceError::BadAction("unsupported control action".into())),
        }
    }

    /// Lists the destinations of the piece on a square, or nothing when the
    /// square is empty. The version comes along for optimistic use.
    pub fn legal_destinations(&self, game_id: &str, from: Square) -> ServiceResult<LegalMoves> {
        let record = self.must(game_id)?;
        let record = lock(&record);
        let destinations = match record.board.piece_at(from) {
            Some(piece) => rules::legal_destinations(piece, &record.board),
            None => vec![],
        };
        Ok(LegalMoves { from, destinations, version: record.version })
    }

    /// Applies a move under optimistic concurrency:
    /// replay a cached idempotency key, guard the result and version, tick
    /// the mover's clock, validate, commit diff + event atomically.
    pub fn apply_move(
        &self,
        game_id: &str,
        expected_version: u64,
        request: &MoveRequest,
        idem_key: Option<&str>,
    ) -> ServiceResult<MoveOutcome> {
        let record = self.must(game_id)?;
        let mut record = lock(&record);

        let idem_key = idem_key.filter(|key| !key.is_empty());
        if let Some(cached) = idem_key.and_then(|key| record.idempotency.get(key)) {
            return Ok(cached.clone());
        }

        if record.result.is_some() {
            return Err(ServiceError::Finished);
        }
        if record.version != expected_version {
            return Err(ServiceError::stale_version(expected_version, record.version));
        }

        // Naive time accounting: the side to move pays for its thinking time
        // at submission, and a drained clock ends the game on the spot.
        if record.tick_clock() == 0 {
            let loser = record.to_move;
            let result = GameResult::Timeout(loser);
            record.result = Some(result);
            let event = Event {
                kind: EventKind::Timeout,
                payload: serde_json::json!({"side": loser}),
                v: record.version,
            };
            record.events.push(event);
            log::info!("game {game_id}: {result}");
            return Err(ServiceError::Finished);
        }

        if request.action != "move" {
            return Err(ServiceError::BadAction("only 'move' is supported".into()));
        }
        let mover = record
            .board
            .piece_at(request.from)
            .ok_or_else(|| ServiceError::BadAction("no piece at source".into()))?;
        if mover.color != record.to_move {
            return Err(ServiceError::BadAction(format!(
                "it is {}'s turn to move",
                record.to_move.name()
            )));
        }
        let mover_color = mover.color;

        let applied = record
            .board
            .apply_move(request.from, request.to)
            .map_err(|reason| ServiceError::BadAction(reason.to_string()))?;

        let mut diff = Diff::default();
        if let Some(captured) = &applied.captured {
            diff.removed.push(captured.id.clone());
        }
        diff.moved.push(MovedPiece { id: applied.mover_id.clone(), to: request.to });
        if applied.escape_used {
            diff.flag_escape(mover_color);
            record.flags.set_escaped(mover_color);
        }

        let result = applied.captured.as_ref().and_then(|prey| rules::capture_result(prey, mover_color));

        // Commit: bump the version, append the diff and event, flip the turn
        // unless the game just ended, and restart the mover's clock.
        record.version += 1;
        let event = Event {
            kind: if applied.escape_used { EventKind::PrincessEscape } else { EventKind::Move },
            payload: serde_json::json!({"from": request.from, "to": request.to}),
            v: record.version,
        };
        record.diffs.push(diff.clone());
        record.events.push(event.clone());
        match result {
            Some(result) => {
                record.result = Some(result);
                log::info!("game {game_id}: {result}");
            },
            None => record.to_move = -record.to_move,
        }
        record.last_turn_started_at = Instant::now();

        let outcome = MoveOutcome {
            applied: true,
            version: record.version,
            diff,
            events: vec![event],
            clocks: record.clocks,
        };
        if let Some(key) = idem_key {
            record.idempotency.put(key, outcome.clone());
        }

        debug_assert_eq!(record.diffs.len() as u64, record.version);
        log::debug!("game {game_id}: v{} {} -> {}", record.version, request.from, request.to);
        Ok(outcome)
    }

    /// Returns the ordered diff slice from `since` up to the current
    /// version; an out-of-range cursor demands a fresh snapshot.
    pub fn get_diffs(&self, game_id: &str, since: i64) -> ServiceResult<DiffPage> {
        let record = self.must(game_id)?;
        let record = lock(&record);
        let current = record.version;
        if since < 0 || since as u64 > current {
            return Err(ServiceError::resnapshot(since, current));
        }
        let since = since as u64;
        Ok(DiffPage {
            from_version: since,
            to_version: current,
            diffs: record.diffs[since as usize..current as usize].to_vec(),
        })
    }

    fn must(&self, game_id: &str) -> ServiceResult<Arc<Mutex<GameRecord>>> {
        self.games
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(game_id)
            .cloned()
            .ok_or_else(|| ServiceError::BadAction(format!("unknown game {game_id}")))
    }
}

fn lock(record: &Arc<Mutex<GameRecord>>) -> MutexGuard<'_, GameRecord> {
    record.lock().unwrap_or_else(PoisonError::into_inner)
}
