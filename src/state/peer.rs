//! Peer-side synchronization.
//!
//! A peer never mutates its session directly from local input. Input is turned
//! into a [`Message`], encoded and broadcast to every participant, the sender
//! included; all peers then apply it through [`Peer::receive`]. Given a
//! transport that delivers every envelope to everyone in send order, all
//! sessions go through the same transitions in the same order.
//!
//! The transport is trusted for delivery and ordering. Nothing here retries,
//! acknowledges or reorders; a dropped or reordered envelope leaves peers
//! permanently out of sync.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, instrument, warn};

use super::geometry::BoardGeometry;
use super::protocol::{Envelope, Message, Point3, ProtocolError};
use super::session::{GameSession, Outcome};

/// Peer identifier within one game.
pub type PeerId = u32;

/// Host or guest of the networking session. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerRole {
    Host,
    Guest,
}

impl PeerRole {
    /// Label shown to the player.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Host => "[Host]",
            Self::Guest => "[Guest]",
        }
    }
}

/// Broadcast channel to all participants, the sender included.
///
/// Implementations must deliver every envelope to every peer, reliably and in
/// send order.
pub trait Transport {
    fn broadcast(&mut self, from: PeerId, envelope: Envelope);
}

/// One participant's view of the game.
#[derive(Debug, Clone)]
pub struct Peer<G> {
    pub id: PeerId,
    pub role: PeerRole,
    session: GameSession<G>,
    received: u64,
}

impl<G: BoardGeometry> Peer<G> {
    pub fn new(id: PeerId, role: PeerRole, session: GameSession<G>) -> Self {
        Self {
            id,
            role,
            session,
            received: 0,
        }
    }

    pub fn session(&self) -> &GameSession<G> {
        &self.session
    }

    /// Envelopes received so far, including ignored ones.
    pub fn received_count(&self) -> u64 {
        self.received
    }

    /// Message a local hit at `point` should produce, if any.
    ///
    /// Nothing once the game has a winner. Otherwise an anchor if this peer's
    /// board is not anchored yet, else a placement.
    pub fn intent_for(&self, point: Point3) -> Option<Message> {
        if self.session.winner().is_some() {
            return None;
        }
        if self.session.is_anchored() {
            Some(Message::PlaceStone(point))
        } else {
            Some(Message::AnchorBoard(point))
        }
    }

    /// Handle a local hit: encode the resulting message and broadcast it.
    ///
    /// The local session is not touched here; it changes when the broadcast
    /// comes back through [`Peer::receive`].
    #[instrument(level = "debug", skip(self, transport), fields(peer = self.id))]
    pub fn handle_input<T: Transport>(
        &self,
        point: Point3,
        transport: &mut T,
    ) -> Result<Option<Message>, ProtocolError> {
        let Some(message) = self.intent_for(point) else {
            debug!("game finished; input ignored");
            return Ok(None);
        };

        let envelope = message.encode()?;
        transport.broadcast(self.id, envelope);
        Ok(Some(message))
    }

    /// Decode and apply a received envelope.
    ///
    /// Unknown tags and undecodable payloads are ignored.
    pub fn receive(&mut self, envelope: &Envelope) -> Outcome {
        self.received += 1;
        match Message::decode(envelope) {
            Ok(message) => self.session.apply(&message),
            Err(err) => {
                warn!(peer = self.id, tag = envelope.tag, %err, "ignoring envelope");
                self.session.current()
            }
        }
    }
}

impl<G> fmt::Display for Peer<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} peer {}", self.role.label(), self.id)
    }
}

/// A queued broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub seq: u64,
    pub from: PeerId,
    pub envelope: Envelope,
}

/// In-process reliable, ordered broadcast with send-to-self.
///
/// Broadcasts are queued in send order; [`LoopbackChannel::deliver`] hands each
/// one to every peer before moving to the next.
#[derive(Debug, Default)]
pub struct LoopbackChannel {
    queue: VecDeque<Delivery>,
    send_seq: u64,
}

impl LoopbackChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued, undelivered broadcasts.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Take the oldest queued broadcast without delivering it.
    pub fn pop(&mut self) -> Option<Delivery> {
        self.queue.pop_front()
    }

    /// Deliver all queued broadcasts to every peer, in order.
    /// Returns the number of broadcasts delivered.
    pub fn deliver<G: BoardGeometry>(&mut self, peers: &mut [Peer<G>]) -> usize {
        let mut delivered = 0;
        while let Some(delivery) = self.queue.pop_front() {
            for peer in peers.iter_mut() {
                peer.receive(&delivery.envelope);
            }
            delivered += 1;
        }
        delivered
    }
}

impl Transport for LoopbackChannel {
    fn broadcast(&mut self, from: PeerId, envelope: Envelope) {
        self.send_seq += 1;
        debug!(seq = self.send_seq, from, tag = envelope.tag, "broadcast queued");
        self.queue.push_back(Delivery {
            seq: self.send_seq,
            from,
            envelope,
        });
    }
}
