use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::types::{ParticipantId, RoomId};

/// A change notification emitted after a successful command. Purely advisory:
/// the model is the source of truth, events only tell subscribers to re-read.
#[derive(Debug, Clone, Serialize)]
pub struct SessionEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    ParticipantJoined { id: ParticipantId, name: String },
    ParticipantLeft { id: ParticipantId },
    MuteChanged { id: ParticipantId, is_muted: bool },
    VideoChanged { id: ParticipantId, is_video_off: bool },
    PinChanged { pinned: Option<ParticipantId> },
    ScreenShareChanged { sharer: Option<ParticipantId> },
    HandRaised { id: ParticipantId },
    HandLowered { id: ParticipantId },
    /// Ephemeral by design: reactions are broadcast and never stored.
    Reaction { id: ParticipantId, emoji: String },
    RoomCreated { room_id: RoomId, name: String },
    RoomDeleted { room_id: RoomId },
    RoomRenamed { room_id: RoomId, name: String },
    ParticipantMoved { id: ParticipantId, room_id: Option<RoomId> },
    RecordingStarted,
    RecordingStopped,
    ChatMessage { message_id: Uuid, sender: ParticipantId },
    SessionEnded,
}

/// Fan-out of session events to any number of subscribers (the rendering
/// layer, typically). Lossy: slow or absent subscribers never block a command.
pub struct EventBroadcaster {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBroadcaster {
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn broadcast(&self, kind: EventKind) {
        let event = SessionEvent {
            timestamp: Utc::now(),
            kind,
        };
        if let Err(e) = self.sender.send(event) {
            // No subscribers; nothing is listening yet.
            debug!("Dropped session event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_without_subscribers_does_not_panic() {
        let broadcaster = EventBroadcaster::new(8);
        broadcaster.broadcast(EventKind::RecordingStarted);
    }

    #[test]
    fn subscribers_receive_events_in_order() {
        let broadcaster = EventBroadcaster::new(8);
        let mut rx = broadcaster.subscribe();
        broadcaster.broadcast(EventKind::HandRaised { id: 1 });
        broadcaster.broadcast(EventKind::HandLowered { id: 1 });

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert!(matches!(first.kind, EventKind::HandRaised { id: 1 }));
        assert!(matches!(second.kind, EventKind::HandLowered { id: 1 }));
    }
}
