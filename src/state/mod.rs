//! State management module for two-player Gomoku.
//!
//! This module provides the core state types:
//!
//! - `board` - The N×N grid of cells
//! - `win` - Run detection over the grid
//! - `turn` - Turn state machine (whose move, who won)
//! - `protocol` - The two synchronization messages and their wire codec
//! - `geometry` - World point to board cell conversion
//! - `config` - Session configuration
//! - `session` - One game: board + turn, driven by messages
//! - `peer` - Input producer, dispatch and broadcast transport
//!
//! # Architecture
//!
//! ```text
//!  local hit (Point3)
//!        │
//!        ▼
//! ┌──────────────┐ AnchorBoard / PlaceStone ┌────────────────────┐
//! │ Peer         │─────────────────────────▶│ Transport          │
//! │ handle_input │        Envelope          │ (reliable, ordered,│
//! └──────────────┘                          │  send-to-self)     │
//!                                           └─────────┬──────────┘
//!                       ┌─────────────────────────────┴───────┐
//!                       ▼                                     ▼
//!              ┌─────────────────┐                   ┌─────────────────┐
//!              │ Peer A receive  │                   │ Peer B receive  │
//!              │                 │                   │                 │
//!              │  GameSession    │                   │  GameSession    │
//!              │  ├─ Board       │                   │  ├─ Board       │
//!              │  ├─ TurnState   │                   │  ├─ TurnState   │
//!              │  └─ win scan    │                   │  └─ win scan    │
//!              └────────┬────────┘                   └────────┬────────┘
//!                       ▼                                     ▼
//!                 Outcome (delta, status)              Outcome (delta, status)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use gomoku_state::state::{GameSession, Message, Point3, Position};
//!
//! let mut session = GameSession::default();
//! session.apply(&Message::AnchorBoard(Point3::default()));
//! let outcome = session.place_at(Position::new(2, 2));
//! println!("{}", outcome.status);
//! ```

pub mod board;
pub mod config;
pub mod geometry;
pub mod peer;
pub mod protocol;
pub mod session;
pub mod turn;
pub mod win;

// Re-export commonly used types
pub use board::{Board, Cell, CellChange, PlacementRejected, Position, Stone};
pub use config::{ConfigError, ReanchorPolicy, SessionConfig};
pub use geometry::{BoardGeometry, SquareBoardGeometry};
pub use peer::{Delivery, LoopbackChannel, Peer, PeerId, PeerRole, Transport};
pub use protocol::{Envelope, Message, Point3, ProtocolError, TAG_ANCHOR_BOARD, TAG_PLACE_STONE};
pub use session::{GameSession, MoveError, Outcome, Status};
pub use turn::{InvalidTransition, TurnEvent, TurnPhase, TurnState};
pub use win::{check_winner, find_winning_run, Direction, WinningRun, DEFAULT_WIN_LENGTH};
