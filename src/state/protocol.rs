//! Peer synchronization messages and their wire codec.
//!
//! There are two message kinds, each carrying the world-space point the
//! sending peer's hit test produced. Every peer converts that point to a board
//! coordinate itself, so both sides must share the same board geometry.
//!
//! On the wire a message is an [`Envelope`]: the numeric tag plus the
//! JSON-encoded point.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag for [`Message::AnchorBoard`].
pub const TAG_ANCHOR_BOARD: u32 = 0;

/// Tag for [`Message::PlaceStone`].
pub const TAG_PLACE_STONE: u32 = 1;

/// A world-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(&self, dx: f32, dy: f32, dz: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Synchronization message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "point", rename_all = "snake_case")]
pub enum Message {
    /// Fix the board origin at this point and start a fresh game
    AnchorBoard(Point3),
    /// Place the next stone on the cell containing this point
    PlaceStone(Point3),
}

impl Message {
    pub fn tag(&self) -> u32 {
        match self {
            Self::AnchorBoard(_) => TAG_ANCHOR_BOARD,
            Self::PlaceStone(_) => TAG_PLACE_STONE,
        }
    }

    pub fn point(&self) -> Point3 {
        match self {
            Self::AnchorBoard(p) | Self::PlaceStone(p) => *p,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnchorBoard(_) => "anchor_board",
            Self::PlaceStone(_) => "place_stone",
        }
    }

    /// Encode for the wire.
    pub fn encode(&self) -> Result<Envelope, ProtocolError> {
        let data = serde_json::to_vec(&self.point()).map_err(ProtocolError::Encode)?;
        Ok(Envelope {
            tag: self.tag(),
            data,
        })
    }

    /// Decode a received envelope.
    pub fn decode(envelope: &Envelope) -> Result<Self, ProtocolError> {
        let point = || -> Result<Point3, ProtocolError> {
            serde_json::from_slice(&envelope.data).map_err(ProtocolError::Decode)
        };

        match envelope.tag {
            TAG_ANCHOR_BOARD => Ok(Self::AnchorBoard(point()?)),
            TAG_PLACE_STONE => Ok(Self::PlaceStone(point()?)),
            other => Err(ProtocolError::UnknownTag(other)),
        }
    }
}

/// A tagged, encoded message as handed to and received from the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub tag: u32,
    pub data: Vec<u8>,
}

impl Envelope {
    pub fn new(tag: u32, data: Vec<u8>) -> Self {
        Self { tag, data }
    }
}

/// Wire codec errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown message tag: {0}")]
    UnknownTag(u32),

    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode payload: {0}")]
    Decode(#[source] serde_json::Error),
}
