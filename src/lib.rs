//! Gomoku State Library
//!
//! This crate provides the authoritative game logic for a two-player,
//! networked "N in a row" board game.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Board Grid** - An N×N matrix of empty/black/white cells, sized once
//!   when the board is anchored.
//!
//! - **Win Detection** - A full-board scan for K consecutive stones of one
//!   color in any line direction (K = 3 by default).
//!
//! - **Turn State Machine** - Black moves first, colors alternate on every
//!   accepted placement, a win finishes the game.
//!
//! - **Peer Synchronization** - Two messages (anchor the board, place a stone)
//!   broadcast to every peer including the sender and applied identically.
//!
//! # Design Principles
//!
//! 1. **One code path** - Local input is never applied directly; it is
//!    broadcast and comes back like any remote message.
//!
//! 2. **Invalid input is inert** - Out-of-range and occupied placements are
//!    ignored, not reported to the presentation layer.
//!
//! 3. **No networking** - The transport is a trait; this crate is pure state.
//!
//! 4. **Serialization-ready** - Messages, outcomes and snapshots convert to JSON.
//!
//! # Example
//!
//! ```rust
//! use gomoku_state::state::{
//!     GameSession, LoopbackChannel, Peer, PeerRole, Point3, SessionConfig,
//!     SquareBoardGeometry, Status, Stone,
//! };
//!
//! let session = || GameSession::new(SessionConfig::default(), SquareBoardGeometry::with_size(5, 1.0));
//! let mut peers = vec![
//!     Peer::new(1, PeerRole::Host, session()),
//!     Peer::new(2, PeerRole::Guest, session()),
//! ];
//! let mut channel = LoopbackChannel::new();
//!
//! // First tap anchors the board for everyone
//! peers[0].handle_input(Point3::new(0.0, 0.0, 0.0), &mut channel).unwrap();
//! channel.deliver(&mut peers);
//!
//! // Guest places a stone on cell (1, 2)
//! peers[1].handle_input(Point3::new(2.0, 0.0, -1.0), &mut channel).unwrap();
//! channel.deliver(&mut peers);
//!
//! assert!(peers[0].session().same_state(peers[1].session()));
//! assert_eq!(peers[0].session().status(), Status::NextToMove(Stone::White));
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
