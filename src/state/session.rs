//! Game session: the board and turn state of one game, and the single entry
//! point that applies synchronization messages to them.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::board::{Board, CellChange, PlacementRejected, Position, Stone};
use super::config::{ReanchorPolicy, SessionConfig};
use super::geometry::{BoardGeometry, SquareBoardGeometry};
use super::protocol::Message;
use super::turn::{InvalidTransition, TurnEvent, TurnPhase, TurnState};
use super::win::{find_winning_run, WinningRun};

/// What the presentation layer shows after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "stone", rename_all = "snake_case")]
pub enum Status {
    AwaitingAnchor,
    NextToMove(Stone),
    Winner(Stone),
}

impl From<TurnPhase> for Status {
    fn from(phase: TurnPhase) -> Self {
        match phase {
            TurnPhase::AwaitingFirstAnchor => Self::AwaitingAnchor,
            TurnPhase::InProgress { next } => Self::NextToMove(next),
            TurnPhase::Finished { winner } => Self::Winner(winner),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingAnchor => write!(f, "Please set the board"),
            Self::NextToMove(stone) => write!(f, "Current turn: {stone}"),
            Self::Winner(stone) => write!(f, "Winner: {stone}"),
        }
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// The cell written by an accepted placement
    pub delta: Option<CellChange>,
    /// Board was (re)initialized; redraw the whole grid
    pub reset: bool,
    pub status: Status,
}

impl Outcome {
    /// True if the event changed nothing.
    pub fn is_noop(&self) -> bool {
        self.delta.is_none() && !self.reset
    }
}

/// Why a placement was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error(transparent)]
    Turn(#[from] InvalidTransition),

    #[error(transparent)]
    Board(#[from] PlacementRejected),
}

/// State of one game as seen by one peer.
#[derive(Debug, Clone)]
pub struct GameSession<G = SquareBoardGeometry> {
    config: SessionConfig,
    geometry: G,
    board: Board,
    turn: TurnState,
    moves: Vec<CellChange>,
    winning_run: Option<WinningRun>,
    /// When the board was last anchored (local clock)
    pub anchored_at: Option<chrono::DateTime<chrono::Utc>>,
    /// When a winner was first detected (local clock)
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl<G: BoardGeometry> GameSession<G> {
    /// Create a session awaiting its first anchor.
    pub fn new(config: SessionConfig, geometry: G) -> Self {
        let turn = if config.reject_after_finish {
            TurnState::strict()
        } else {
            TurnState::new()
        };

        Self {
            config,
            geometry,
            board: Board::new(),
            turn,
            moves: Vec::new(),
            winning_run: None,
            anchored_at: None,
            finished_at: None,
        }
    }

    /// Apply a synchronization message.
    ///
    /// Invalid input (out-of-range point, occupied cell, placement before
    /// anchoring) is inert: the returned outcome has no delta.
    #[instrument(level = "debug", skip(self), fields(kind = message.as_str()))]
    pub fn apply(&mut self, message: &Message) -> Outcome {
        match *message {
            Message::AnchorBoard(point) => {
                if !self.accepts_anchor() {
                    warn!(%point, "board already anchored; ignoring anchor");
                    return self.current();
                }
                self.geometry.anchor(point);
                let size = self.geometry.board_size();
                self.anchor(size)
            }
            Message::PlaceStone(point) => match self.geometry.locate(point) {
                Some(pos) => self.place_at(pos),
                None => {
                    debug!(%point, "placement before anchor ignored");
                    self.current()
                }
            },
        }
    }

    /// Initialize an `size`×`size` board and start with Black to move.
    pub fn anchor(&mut self, size: usize) -> Outcome {
        if !self.accepts_anchor() {
            warn!(size, "board already anchored; ignoring anchor");
            return self.current();
        }
        if self.turn.is_anchored() {
            warn!(
                discarded_moves = self.moves.len(),
                "re-anchoring discards the game in progress"
            );
        }

        self.board.initialize(size);
        // Anchor is valid from every phase
        let _ = self.turn.apply_mut(TurnEvent::Anchor);
        self.moves.clear();
        self.winning_run = None;
        self.anchored_at = Some(chrono::Utc::now());
        self.finished_at = None;
        info!(size, "board anchored");

        Outcome {
            delta: None,
            reset: true,
            status: self.status(),
        }
    }

    /// Place the next stone at `pos`; invalid placements are ignored.
    pub fn place_at(&mut self, pos: Position) -> Outcome {
        match self.try_place_at(pos) {
            Ok(change) => Outcome {
                delta: Some(change),
                reset: false,
                status: self.status(),
            },
            Err(err) => {
                debug!(%pos, %err, "placement ignored");
                self.current()
            }
        }
    }

    /// Place the next stone at `pos`, reporting why it was not applied.
    pub fn try_place_at(&mut self, pos: Position) -> Result<CellChange, MoveError> {
        let stone = self.turn.stone_to_place()?;
        let change = self.board.try_place(pos, stone)?;

        let run = find_winning_run(&self.board, self.config.win_length);
        let was_finished = self.turn.is_finished();
        self.turn.apply_mut(TurnEvent::Place {
            stone,
            winner: run.map(|r| r.stone),
        })?;
        self.moves.push(change);
        debug!(%pos, %stone, "stone placed");

        if let Some(run) = run {
            if !was_finished {
                info!(winner = %run.stone, start = %run.start, direction = ?run.direction, "game won");
                self.finished_at = Some(chrono::Utc::now());
            }
            self.winning_run = Some(run);
        }

        Ok(change)
    }

    fn accepts_anchor(&self) -> bool {
        !(self.turn.is_anchored() && self.config.reanchor == ReanchorPolicy::Ignore)
    }

    /// Outcome describing the current state, with no change.
    pub fn current(&self) -> Outcome {
        Outcome {
            delta: None,
            reset: false,
            status: self.status(),
        }
    }

    pub fn status(&self) -> Status {
        self.turn.phase().into()
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase()
    }

    pub fn is_anchored(&self) -> bool {
        self.turn.is_anchored()
    }

    pub fn winner(&self) -> Option<Stone> {
        self.turn.winner()
    }

    pub fn winning_run(&self) -> Option<&WinningRun> {
        self.winning_run.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Accepted placements in the order they were applied.
    pub fn moves(&self) -> &[CellChange] {
        &self.moves
    }

    /// Compare the game state with another peer's, ignoring geometry and
    /// local timestamps.
    pub fn same_state<H>(&self, other: &GameSession<H>) -> bool {
        self.board == other.board
            && self.turn == other.turn
            && self.moves == other.moves
    }

    /// Convert to JSON snapshot for presentation.
    pub fn to_json(&self) -> serde_json::Value {
        let (next, winner) = match self.phase() {
            TurnPhase::AwaitingFirstAnchor => (None, None),
            TurnPhase::InProgress { next } => (Some(next.as_str()), None),
            TurnPhase::Finished { winner } => (None, Some(winner.as_str())),
        };

        serde_json::json!({
            "size": self.board.size(),
            "grid": self.board.to_json(),
            "status": self.phase().as_str(),
            "label": self.status().to_string(),
            "next": next,
            "winner": winner,
            "winning_run": self.winning_run.map(|r| r.to_json()),
            "move_count": self.moves.len()
        })
    }
}

impl Default for GameSession<SquareBoardGeometry> {
    /// Default configuration on a 5×5 board with unit cells.
    fn default() -> Self {
        Self::new(
            SessionConfig::default(),
            SquareBoardGeometry::with_size(5, 1.0),
        )
    }
}
