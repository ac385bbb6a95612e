// src/types.rs
use serde::{Deserialize, Serialize};

/// Stable participant identifier, assigned by the joining layer.
pub type ParticipantId = u64;

/// Breakout room identifier. Id 0 is reserved as the unassignment sentinel.
pub type RoomId = u64;

/// Moving a participant "to" this room id removes them from any breakout room
/// without placing them anywhere else.
pub const UNASSIGNED: RoomId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Participant,
}

impl Role {
    pub fn is_host(&self) -> bool {
        matches!(self, Role::Host)
    }
}

/// Externally supplied network quality sample. The model stores the latest
/// sample as-is; no smoothing or aggregation (last write wins).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualitySample {
    pub bitrate_kbps: u32,
    pub packet_loss_pct: f32,
    pub participant_count: usize,
    /// Overall score in [0, 100], as reported by the collaborator.
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    Hd,
    Sd,
    Low,
}

impl QualityTier {
    pub fn from_score(score: u8) -> Self {
        if score > 80 {
            QualityTier::Hd
        } else if score > 50 {
            QualityTier::Sd
        } else {
            QualityTier::Low
        }
    }
}
