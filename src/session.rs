use bytes::Bytes;
use log::{info, warn};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::panels::chat::{Attachment, ChatLog, ChatMessage};
use crate::panels::notes::MeetingNotes;
use crate::panels::polls::{Poll, PollBoard};
use crate::recording::{RecordingArtifact, RecordingController};
use crate::registry::{Participant, ParticipantRegistry};
use crate::rooms::{BreakoutRoom, RoomAssignmentTable};
use crate::signals::hand_raise::{HandRaiseEntry, HandRaiseQueue};
use crate::signals::{EventBroadcaster, EventKind, SessionEvent};
use crate::stats::{SessionClock, SessionStats};
use crate::types::{ParticipantId, QualitySample, QualityTier, RoomId, UNASSIGNED};
use crate::utils::{Error, Result};

/// Host-toggleable feature gates. A gated command invoked by a non-host while
/// its gate is off fails with `PermissionDenied` and changes nothing.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MeetingControls {
    pub allow_chat: bool,
    pub allow_reactions: bool,
    pub allow_screen_share: bool,
    pub allow_hand_raise: bool,
}

impl Default for MeetingControls {
    fn default() -> Self {
        Self {
            allow_chat: true,
            allow_reactions: true,
            allow_screen_share: true,
            allow_hand_raise: true,
        }
    }
}

/// Point-in-time view of the model for the rendering layer.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub title: String,
    pub duration: String,
    pub participants: Vec<Participant>,
    pub rooms: Vec<BreakoutRoom>,
    pub hand_raise_queue: Vec<HandRaiseEntry>,
    pub controls: MeetingControls,
    pub quality: Option<QualitySample>,
    pub quality_tier: Option<QualityTier>,
    pub is_recording: bool,
    pub recorded_chunks: usize,
    pub chat_messages: usize,
    pub ended: bool,
}

/// Shared handle for embedders. Operations never suspend mid-mutation, so a
/// synchronous lock is sufficient.
pub type SharedSession = Arc<RwLock<Session>>;

/// One classroom meeting's entire in-memory state: roster, breakout rooms,
/// hand-raise queue, timer/stats, recording, and the side panels. All
/// commands are synchronous and atomic: they either fully succeed or fail
/// with no observable partial mutation.
pub struct Session {
    id: Uuid,
    title: String,
    ended: bool,
    registry: ParticipantRegistry,
    rooms: RoomAssignmentTable,
    hand_raise: HandRaiseQueue,
    clock: SessionClock,
    stats: SessionStats,
    recording: RecordingController,
    controls: MeetingControls,
    chat: ChatLog,
    polls: PollBoard,
    notes: MeetingNotes,
    events: EventBroadcaster,
    default_room_capacity: Option<usize>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let id = Uuid::new_v4();
        info!("Session {} ({:?}) created", id, config.title);
        Self {
            id,
            title: config.title,
            ended: false,
            registry: ParticipantRegistry::new(),
            rooms: RoomAssignmentTable::new(),
            hand_raise: HandRaiseQueue::new(),
            clock: SessionClock::new(),
            stats: SessionStats::new(),
            recording: RecordingController::new(config.recording_mime_type),
            controls: MeetingControls::default(),
            chat: ChatLog::new(),
            polls: PollBoard::new(),
            notes: MeetingNotes::new(),
            events: EventBroadcaster::new(config.event_buffer),
            default_room_capacity: config.default_room_capacity,
        }
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // --- roster ---

    pub fn add_participant(&mut self, participant: Participant) -> Result<()> {
        self.ensure_active()?;
        let (id, name) = (participant.id, participant.name.clone());
        self.registry.add(participant)?;
        self.events.broadcast(EventKind::ParticipantJoined { id, name });
        Ok(())
    }

    /// Idempotent. Cascades: clears room membership, the hand-raise entry and
    /// (implicitly, since the record is gone) the pin.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<()> {
        self.ensure_active()?;
        if self.registry.remove(id).is_none() {
            return Ok(());
        }
        self.rooms.unassign(id);
        self.hand_raise.lower(id);
        self.events.broadcast(EventKind::ParticipantLeft { id });
        Ok(())
    }

    pub fn participant(&self, id: ParticipantId) -> Result<&Participant> {
        self.registry.get(id)
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.registry.roster()
    }

    pub fn participant_count(&self) -> usize {
        self.registry.len()
    }

    // --- interaction signals ---

    pub fn toggle_mute(&mut self, id: ParticipantId) -> Result<bool> {
        self.ensure_active()?;
        let is_muted = self.registry.toggle_muted(id)?;
        self.events.broadcast(EventKind::MuteChanged { id, is_muted });
        Ok(is_muted)
    }

    pub fn toggle_video(&mut self, id: ParticipantId) -> Result<bool> {
        self.ensure_active()?;
        let is_video_off = self.registry.toggle_video_off(id)?;
        self.events
            .broadcast(EventKind::VideoChanged { id, is_video_off });
        Ok(is_video_off)
    }

    pub fn toggle_pin(&mut self, id: ParticipantId) -> Result<bool> {
        self.ensure_active()?;
        let pinned = self.registry.toggle_pinned(id)?;
        self.events.broadcast(EventKind::PinChanged {
            pinned: self.registry.pinned().map(|p| p.id),
        });
        Ok(pinned)
    }

    pub fn toggle_screen_share(&mut self, id: ParticipantId) -> Result<bool> {
        self.ensure_active()?;
        self.check_gate(id, self.controls.allow_screen_share, "screen sharing")?;
        let sharing = self.registry.toggle_screen_sharing(id)?;
        self.events.broadcast(EventKind::ScreenShareChanged {
            sharer: self.registry.screen_sharer().map(|p| p.id),
        });
        Ok(sharing)
    }

    /// Appends to the hand-raise queue. Idempotent: a raised hand stays where
    /// it is in the queue.
    pub fn raise_hand(&mut self, id: ParticipantId) -> Result<()> {
        self.ensure_active()?;
        self.check_gate(id, self.controls.allow_hand_raise, "hand raising")?;
        if self.hand_raise.raise(id) {
            self.registry.set_hand_raised(id, true)?;
            self.events.broadcast(EventKind::HandRaised { id });
        }
        Ok(())
    }

    /// Removes the queue entry regardless of its position.
    pub fn lower_hand(&mut self, id: ParticipantId) -> Result<()> {
        self.ensure_active()?;
        self.registry.get(id)?;
        if self.hand_raise.lower(id) {
            self.registry.set_hand_raised(id, false)?;
            self.events.broadcast(EventKind::HandLowered { id });
        }
        Ok(())
    }

    /// Fire-and-forget: validated, broadcast, never stored.
    pub fn send_reaction(&mut self, id: ParticipantId, emoji: &str) -> Result<()> {
        self.ensure_active()?;
        self.check_gate(id, self.controls.allow_reactions, "reactions")?;
        self.events.broadcast(EventKind::Reaction {
            id,
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    pub fn hand_raise_queue(&self) -> Vec<HandRaiseEntry> {
        self.hand_raise.entries()
    }

    // --- breakout rooms ---

    pub fn create_room(&mut self, name: &str, max_participants: Option<usize>) -> Result<RoomId> {
        self.ensure_active()?;
        let capacity = max_participants.or(self.default_room_capacity);
        let room_id = self.rooms.create_room(name, capacity)?;
        self.events.broadcast(EventKind::RoomCreated {
            room_id,
            name: name.trim().to_string(),
        });
        Ok(room_id)
    }

    /// Returns the now-unassigned former members.
    pub fn delete_room(&mut self, room_id: RoomId) -> Result<Vec<ParticipantId>> {
        self.ensure_active()?;
        let freed = self.rooms.delete_room(room_id)?;
        self.events.broadcast(EventKind::RoomDeleted { room_id });
        Ok(freed)
    }

    pub fn rename_room(&mut self, room_id: RoomId, new_name: &str) -> Result<()> {
        self.ensure_active()?;
        self.rooms.rename_room(room_id, new_name)?;
        self.events.broadcast(EventKind::RoomRenamed {
            room_id,
            name: new_name.trim().to_string(),
        });
        Ok(())
    }

    /// Moves a known participant into `destination`, or out of every room when
    /// `destination` is `UNASSIGNED`.
    pub fn move_participant(&mut self, id: ParticipantId, destination: RoomId) -> Result<()> {
        self.ensure_active()?;
        self.registry.get(id)?;
        self.rooms.move_participant(id, destination)?;
        self.events.broadcast(EventKind::ParticipantMoved {
            id,
            room_id: (destination != UNASSIGNED).then_some(destination),
        });
        Ok(())
    }

    pub fn rooms(&self) -> Vec<BreakoutRoom> {
        self.rooms.rooms()
    }

    pub fn room_of(&self, id: ParticipantId) -> Option<RoomId> {
        self.rooms.room_of(id)
    }

    // --- timer & stats ---

    pub fn start(&mut self) {
        self.clock.start();
    }

    pub fn tick(&mut self) -> Duration {
        self.clock.tick()
    }

    pub fn elapsed_display(&self) -> String {
        self.clock.formatted()
    }

    /// Completion callback from the quality-probe collaborator. A no-op once
    /// the session has ended.
    pub fn update_quality(&mut self, sample: QualitySample) {
        if self.ended {
            return;
        }
        self.stats.update(sample);
    }

    pub fn quality(&self) -> Option<&QualitySample> {
        self.stats.latest()
    }

    /// Completion callback from the audio-level analyser. No-ops once ended
    /// or when the participant is already gone.
    pub fn set_audio_level(&mut self, id: ParticipantId, level: f32) {
        if self.ended {
            return;
        }
        let _ = self.registry.set_audio_level(id, level);
    }

    pub fn set_speaking(&mut self, id: ParticipantId, speaking: bool) {
        if self.ended {
            return;
        }
        let _ = self.registry.set_speaking(id, speaking);
    }

    // --- recording ---

    pub fn start_recording(&mut self) -> Result<Uuid> {
        self.ensure_active()?;
        let id = self.recording.start()?;
        self.events.broadcast(EventKind::RecordingStarted);
        Ok(id)
    }

    pub fn stop_recording(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.recording.stop()?;
        self.events.broadcast(EventKind::RecordingStopped);
        Ok(())
    }

    /// Completion callback from the media-capture collaborator. A no-op once
    /// the session has ended.
    pub fn append_recording_chunk(&mut self, data: Bytes) -> Result<()> {
        if self.ended {
            return Ok(());
        }
        self.recording.append_chunk(data)
    }

    pub fn export_recording(&mut self) -> Result<RecordingArtifact> {
        self.recording.export()
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_recording()
    }

    // --- panels ---

    pub fn post_chat(
        &mut self,
        sender: ParticipantId,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Result<Uuid> {
        self.ensure_active()?;
        self.check_gate(sender, self.controls.allow_chat, "chat")?;
        let sender_name = self.registry.get(sender)?.name.clone();
        let message_id = self.chat.post(sender, &sender_name, text, attachment)?;
        self.events
            .broadcast(EventKind::ChatMessage { message_id, sender });
        Ok(message_id)
    }

    pub fn chat_messages(&self) -> &[ChatMessage] {
        self.chat.messages()
    }

    pub fn create_poll(
        &mut self,
        actor: ParticipantId,
        question: &str,
        options: Vec<String>,
    ) -> Result<Uuid> {
        self.ensure_active()?;
        self.require_host(actor, "create polls")?;
        self.polls.create(question, options)
    }

    pub fn vote_poll(
        &mut self,
        participant: ParticipantId,
        poll_id: Uuid,
        option_index: usize,
    ) -> Result<()> {
        self.ensure_active()?;
        self.registry.get(participant)?;
        self.polls.vote(poll_id, participant, option_index)
    }

    pub fn close_poll(&mut self, actor: ParticipantId, poll_id: Uuid) -> Result<()> {
        self.ensure_active()?;
        self.require_host(actor, "close polls")?;
        self.polls.close(poll_id)
    }

    pub fn polls(&self) -> &[Poll] {
        self.polls.polls()
    }

    pub fn notes(&self) -> &MeetingNotes {
        &self.notes
    }

    pub fn update_notes(&mut self, content: impl Into<String>) -> Result<()> {
        self.ensure_active()?;
        self.notes.set_content(content);
        Ok(())
    }

    pub fn save_notes(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.notes.save();
        Ok(())
    }

    pub fn controls(&self) -> MeetingControls {
        self.controls
    }

    pub fn configure_controls(
        &mut self,
        actor: ParticipantId,
        controls: MeetingControls,
    ) -> Result<()> {
        self.ensure_active()?;
        self.require_host(actor, "change meeting controls")?;
        self.controls = controls;
        Ok(())
    }

    // --- lifecycle ---

    /// Tears the session down. Active recordings are stopped (already captured
    /// chunks remain exportable); later collaborator callbacks become no-ops.
    pub fn end(&mut self) {
        if self.ended {
            return;
        }
        if self.recording.is_recording() {
            warn!("Session {} ended with an active recording", self.id);
            let _ = self.recording.stop();
        }
        self.ended = true;
        self.events.broadcast(EventKind::SessionEnded);
        info!("Session {} ended after {}", self.id, self.clock.formatted());
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            title: self.title.clone(),
            duration: self.clock.formatted(),
            participants: self.registry.roster(),
            rooms: self.rooms.rooms(),
            hand_raise_queue: self.hand_raise.entries(),
            controls: self.controls,
            quality: self.stats.latest().copied(),
            quality_tier: self.stats.tier(),
            is_recording: self.recording.is_recording(),
            recorded_chunks: self.recording.chunk_count(),
            chat_messages: self.chat.len(),
            ended: self.ended,
        }
    }

    // --- internal ---

    fn ensure_active(&self) -> Result<()> {
        if self.ended {
            return Err(Error::InvalidState("session has ended".to_string()));
        }
        Ok(())
    }

    /// Hosts bypass meeting-control gates; everyone must at least exist.
    fn check_gate(&self, actor: ParticipantId, allowed: bool, what: &str) -> Result<()> {
        let participant = self.registry.get(actor)?;
        if !allowed && !participant.role.is_host() {
            return Err(Error::PermissionDenied(format!(
                "{} is disabled by the host",
                what
            )));
        }
        Ok(())
    }

    fn require_host(&self, actor: ParticipantId, what: &str) -> Result<()> {
        let participant = self.registry.get(actor)?;
        if !participant.role.is_host() {
            return Err(Error::PermissionDenied(format!(
                "only the host can {}",
                what
            )));
        }
        Ok(())
    }
}
