//! Turn state machine.
//!
//! Tracks whose turn it is and whether the game has a winner.
//!
//! # State Diagram
//!
//! ```text
//! ┌─────────────────────┐
//! │ AwaitingFirstAnchor │
//! └──────────┬──────────┘
//!            │ anchor
//!            ▼
//! ┌─────────────────────┐  place (no win)
//! │ InProgress(next)    │───────────────┐
//! │                     │◀──────────────┘  next = other(next)
//! └──────────┬──────────┘
//!            │ place (win)
//!            ▼
//! ┌─────────────────────┐
//! │ Finished(winner)    │
//! └─────────────────────┘
//! ```
//!
//! `anchor` from any anchored state restarts at `InProgress(Black)`.
//!
//! `Finished` is terminal for input, but by default the machine itself still
//! accepts placements there: the input producer is what stops sending them.
//! Construct with [`TurnState::strict`] to reject them here as well.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::board::Stone;

/// Externally visible phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TurnPhase {
    /// Board not anchored yet
    AwaitingFirstAnchor,
    /// Game running, `next` moves
    InProgress { next: Stone },
    /// A color has a winning run
    Finished { winner: Stone },
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingFirstAnchor => "awaiting_first_anchor",
            Self::InProgress { .. } => "in_progress",
            Self::Finished { .. } => "finished",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingFirstAnchor => write!(f, "AwaitingFirstAnchor"),
            Self::InProgress { next } => write!(f, "InProgress({next})"),
            Self::Finished { winner } => write!(f, "Finished({winner})"),
        }
    }
}

/// State transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEvent {
    /// Board anchored (or re-anchored)
    Anchor,
    /// `stone` was written to the board; `winner` is the win detector's
    /// verdict on the board after the write.
    Place {
        stone: Stone,
        winner: Option<Stone>,
    },
}

/// Error when a state transition is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid transition from {from} via {event:?}: {reason}")]
pub struct InvalidTransition {
    pub from: TurnPhase,
    pub event: TurnEvent,
    pub reason: &'static str,
}

/// Turn state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    anchored: bool,
    next: Stone,
    winner: Option<Stone>,
    reject_after_finish: bool,
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnState {
    /// Create a state awaiting its first anchor.
    pub fn new() -> Self {
        Self {
            anchored: false,
            next: Stone::Black,
            winner: None,
            reject_after_finish: false,
        }
    }

    /// Create a state that refuses placements once a winner is known.
    pub fn strict() -> Self {
        Self {
            reject_after_finish: true,
            ..Self::new()
        }
    }

    pub fn phase(&self) -> TurnPhase {
        match (self.anchored, self.winner) {
            (false, _) => TurnPhase::AwaitingFirstAnchor,
            (true, Some(winner)) => TurnPhase::Finished { winner },
            (true, None) => TurnPhase::InProgress { next: self.next },
        }
    }

    /// Color the next accepted placement will write.
    pub fn next(&self) -> Stone {
        self.next
    }

    pub fn winner(&self) -> Option<Stone> {
        self.winner
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Color to write for a placement right now, or why none is allowed.
    pub fn stone_to_place(&self) -> Result<Stone, InvalidTransition> {
        let event = TurnEvent::Place {
            stone: self.next,
            winner: None,
        };
        self.transition(&event).map(|_| self.next)
    }

    /// Apply an event, returning the new state or an error.
    pub fn apply(&self, event: TurnEvent) -> Result<Self, InvalidTransition> {
        self.transition(&event)
    }

    /// Apply an event in place, returning error if invalid.
    pub fn apply_mut(&mut self, event: TurnEvent) -> Result<(), InvalidTransition> {
        *self = self.transition(&event)?;
        Ok(())
    }

    fn transition(&self, event: &TurnEvent) -> Result<Self, InvalidTransition> {
        let invalid = |reason: &'static str| InvalidTransition {
            from: self.phase(),
            event: *event,
            reason,
        };

        match (self.phase(), *event) {
            // Anchor: any -> InProgress(Black)
            (_, TurnEvent::Anchor) => Ok(Self {
                anchored: true,
                next: Stone::Black,
                winner: None,
                reject_after_finish: self.reject_after_finish,
            }),

            (TurnPhase::AwaitingFirstAnchor, TurnEvent::Place { .. }) => {
                Err(invalid("Board is not anchored"))
            }
            (TurnPhase::Finished { .. }, TurnEvent::Place { .. }) if self.reject_after_finish => {
                Err(invalid("Game is already finished"))
            }
            (_, TurnEvent::Place { stone, .. }) if stone != self.next => {
                Err(invalid("Not this color's turn"))
            }

            // Place: InProgress(c) -> InProgress(other(c)) | Finished(c)
            (_, TurnEvent::Place { stone, winner }) => Ok(Self {
                anchored: true,
                next: stone.other(),
                winner,
                reject_after_finish: self.reject_after_finish,
            }),
        }
    }
}
