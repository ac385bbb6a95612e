use super::state::Participant;
use crate::types::ParticipantId;
use crate::utils::{Error, Result};
use log::debug;
use std::collections::HashMap;

/// Single source of truth for participant existence and per-participant flags.
///
/// All mutations are synchronous and immediately visible to readers. The pin
/// and screen-share flags are exclusive: setting either on one participant
/// clears it on every other.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    participants: HashMap<ParticipantId, Participant>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self {
            participants: HashMap::new(),
        }
    }

    pub fn add(&mut self, participant: Participant) -> Result<()> {
        if self.participants.contains_key(&participant.id) {
            return Err(Error::DuplicateId(participant.id));
        }
        debug!("Participant {} ({}) joined", participant.id, participant.name);
        self.participants.insert(participant.id, participant);
        Ok(())
    }

    /// Idempotent: removing an unknown id is a no-op. Cross-component cleanup
    /// (rooms, hand-raise queue) is coordinated by the owning session.
    pub fn remove(&mut self, id: ParticipantId) -> Option<Participant> {
        let removed = self.participants.remove(&id);
        if let Some(p) = &removed {
            debug!("Participant {} ({}) removed", p.id, p.name);
        }
        removed
    }

    pub fn get(&self, id: ParticipantId) -> Result<&Participant> {
        self.participants
            .get(&id)
            .ok_or(Error::ParticipantNotFound(id))
    }

    fn get_mut(&mut self, id: ParticipantId) -> Result<&mut Participant> {
        self.participants
            .get_mut(&id)
            .ok_or(Error::ParticipantNotFound(id))
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.participants.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    /// Participants ordered by id, for stable display.
    pub fn roster(&self) -> Vec<Participant> {
        let mut roster: Vec<Participant> = self.participants.values().cloned().collect();
        roster.sort_by_key(|p| p.id);
        roster
    }

    pub fn pinned(&self) -> Option<&Participant> {
        self.participants.values().find(|p| p.is_pinned)
    }

    pub fn screen_sharer(&self) -> Option<&Participant> {
        self.participants.values().find(|p| p.is_screen_sharing)
    }

    /// Flips the mute flag, returning the new value.
    pub fn toggle_muted(&mut self, id: ParticipantId) -> Result<bool> {
        let p = self.get_mut(id)?;
        p.is_muted = !p.is_muted;
        Ok(p.is_muted)
    }

    /// Flips the video-off flag, returning the new value.
    pub fn toggle_video_off(&mut self, id: ParticipantId) -> Result<bool> {
        let p = self.get_mut(id)?;
        p.is_video_off = !p.is_video_off;
        Ok(p.is_video_off)
    }

    /// Flips the pin flag. Pinning clears every other participant's pin so at
    /// most one participant is pinned at any time.
    pub fn toggle_pinned(&mut self, id: ParticipantId) -> Result<bool> {
        let was_pinned = self.get(id)?.is_pinned;
        for p in self.participants.values_mut() {
            p.is_pinned = p.id == id && !was_pinned;
        }
        Ok(!was_pinned)
    }

    /// Flips the screen-share flag with the same exclusivity as pinning: one
    /// sharer at a time, starting a share stops any other.
    pub fn toggle_screen_sharing(&mut self, id: ParticipantId) -> Result<bool> {
        let was_sharing = self.get(id)?.is_screen_sharing;
        for p in self.participants.values_mut() {
            p.is_screen_sharing = p.id == id && !was_sharing;
        }
        Ok(!was_sharing)
    }

    pub fn set_hand_raised(&mut self, id: ParticipantId, raised: bool) -> Result<()> {
        self.get_mut(id)?.hand_raised = raised;
        Ok(())
    }

    pub fn set_speaking(&mut self, id: ParticipantId, speaking: bool) -> Result<()> {
        self.get_mut(id)?.is_speaking = speaking;
        Ok(())
    }

    /// Stores an advisory audio level, clamped to [0, 1].
    pub fn set_audio_level(&mut self, id: ParticipantId, level: f32) -> Result<()> {
        self.get_mut(id)?.audio_level = level.clamp(0.0, 1.0);
        Ok(())
    }
}
