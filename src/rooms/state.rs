use serde::Serialize;
use std::collections::BTreeSet;

use crate::types::{ParticipantId, RoomId};

/// Allowed bounds for an explicit room capacity.
pub const MIN_ROOM_CAPACITY: usize = 2;
pub const MAX_ROOM_CAPACITY: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct BreakoutRoom {
    pub id: RoomId,
    pub name: String,
    pub max_participants: Option<usize>,
    pub participants: BTreeSet<ParticipantId>,
}

impl BreakoutRoom {
    pub fn new(id: RoomId, name: impl Into<String>, max_participants: Option<usize>) -> Self {
        Self {
            id,
            name: name.into(),
            max_participants,
            participants: BTreeSet::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        match self.max_participants {
            Some(max) => self.participants.len() >= max,
            None => false,
        }
    }
}
