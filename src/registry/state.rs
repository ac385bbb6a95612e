use serde::{Deserialize, Serialize};

use crate::types::{ParticipantId, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub role: Role,
    pub is_muted: bool,
    pub is_video_off: bool,
    pub is_pinned: bool,
    pub is_screen_sharing: bool,
    pub is_speaking: bool,
    pub hand_raised: bool,
    /// Advisory level in [0, 1], not guaranteed monotonic.
    pub audio_level: f32,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            is_muted: false,
            is_video_off: false,
            is_pinned: false,
            is_screen_sharing: false,
            is_speaking: false,
            hand_raised: false,
            audio_level: 0.0,
        }
    }
}
