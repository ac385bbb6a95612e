use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

use crate::types::ParticipantId;

#[derive(Debug, Clone, Serialize)]
pub struct HandRaiseEntry {
    pub participant_id: ParticipantId,
    pub raised_at: DateTime<Utc>,
}

/// FIFO queue of participants signaling for attention. A participant appears
/// at most once; lowering removes their entry regardless of position.
#[derive(Debug, Default)]
pub struct HandRaiseQueue {
    entries: VecDeque<HandRaiseEntry>,
}

impl HandRaiseQueue {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Appends the participant, returning false if they were already queued.
    pub fn raise(&mut self, participant_id: ParticipantId) -> bool {
        if self.contains(participant_id) {
            return false;
        }
        self.entries.push_back(HandRaiseEntry {
            participant_id,
            raised_at: Utc::now(),
        });
        true
    }

    /// Removes the participant's entry, returning false if they were not queued.
    pub fn lower(&mut self, participant_id: ParticipantId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.participant_id != participant_id);
        self.entries.len() != before
    }

    pub fn contains(&self, participant_id: ParticipantId) -> bool {
        self.entries.iter().any(|e| e.participant_id == participant_id)
    }

    /// Longest-waiting participant, if any.
    pub fn front(&self) -> Option<&HandRaiseEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> Vec<HandRaiseEntry> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_is_idempotent() {
        let mut queue = HandRaiseQueue::new();
        assert!(queue.raise(1));
        assert!(!queue.raise(1));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn lower_removes_regardless_of_position() {
        let mut queue = HandRaiseQueue::new();
        queue.raise(1);
        queue.raise(2);
        queue.raise(3);

        assert!(queue.lower(2));
        assert!(!queue.lower(2));

        let order: Vec<_> = queue.entries().iter().map(|e| e.participant_id).collect();
        assert_eq!(order, vec![1, 3]);
    }

    #[test]
    fn fifo_order_is_preserved() {
        let mut queue = HandRaiseQueue::new();
        for id in [4, 2, 9] {
            queue.raise(id);
        }
        assert_eq!(queue.front().map(|e| e.participant_id), Some(4));
        queue.lower(4);
        assert_eq!(queue.front().map(|e| e.participant_id), Some(2));
    }
}
