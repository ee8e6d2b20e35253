//! Session wire messages.
//!
//! Frames carry a per-session sequence number so consumers can drop frames
//! that arrive out of order or that predate a reset.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{FrameResult, Landmark, SessionSummary};

/// Unique identifier for an analysis session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Messages sent by the client side of a session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Landmarks extracted from one camera frame
    Frame {
        seq: u64,
        /// Capture time in milliseconds since the session started
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp_ms: Option<u64>,
        #[serde(default)]
        landmarks: Vec<Landmark>,
    },

    /// Zero counters and start a new set
    Reset,
}

/// Messages sent back to the client.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Analysis for one accepted frame
    Analysis { seq: u64, result: FrameResult },

    /// Frame was dropped because it was out of order or predates a reset
    Stale { seq: u64, baseline: u64 },

    /// Reset applied; frames below `baseline` will be ignored
    ResetAck {
        baseline: u64,
        timestamp: DateTime<Utc>,
    },

    /// End-of-session statistics
    Summary { summary: SessionSummary },
}

impl ServerMessage {
    /// Create a reset acknowledgement stamped with the current time.
    pub fn reset_ack(baseline: u64) -> Self {
        ServerMessage::ResetAck {
            baseline,
            timestamp: Utc::now(),
        }
    }

    /// Message type tag as it appears on the wire.
    pub fn type_str(&self) -> &'static str {
        match self {
            ServerMessage::Analysis { .. } => "analysis",
            ServerMessage::Stale { .. } => "stale",
            ServerMessage::ResetAck { .. } => "reset_ack",
            ServerMessage::Summary { .. } => "summary",
        }
    }
}
