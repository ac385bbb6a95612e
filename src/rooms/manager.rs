use super::state::{BreakoutRoom, MAX_ROOM_CAPACITY, MIN_ROOM_CAPACITY};
use crate::types::{ParticipantId, RoomId, UNASSIGNED};
use crate::utils::{Error, Result};
use log::{debug, info};
use std::collections::HashMap;

/// Breakout room creation, deletion and participant placement.
///
/// Invariants enforced here:
/// - room names are unique, compared case-insensitively
/// - a participant belongs to at most one room
/// - a room never holds more than `max_participants` members when set
pub struct RoomAssignmentTable {
    rooms: HashMap<RoomId, BreakoutRoom>,
    next_id: RoomId,
}

impl RoomAssignmentTable {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            // Id 0 is the unassignment sentinel, never a real room.
            next_id: 1,
        }
    }

    pub fn create_room(
        &mut self,
        name: &str,
        max_participants: Option<usize>,
    ) -> Result<RoomId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidState("room name is empty".to_string()));
        }
        if self.name_taken(name, None) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        if let Some(max) = max_participants {
            if !(MIN_ROOM_CAPACITY..=MAX_ROOM_CAPACITY).contains(&max) {
                return Err(Error::InvalidCapacity(max));
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.rooms
            .insert(id, BreakoutRoom::new(id, name, max_participants));
        info!("Created breakout room {} ({:?})", id, name);
        Ok(id)
    }

    /// Deletes a room and returns its now-unassigned members. Members are not
    /// moved anywhere else; the caller decides what happens to them.
    pub fn delete_room(&mut self, id: RoomId) -> Result<Vec<ParticipantId>> {
        let room = self.rooms.remove(&id).ok_or(Error::RoomNotFound(id))?;
        info!("Deleted breakout room {} ({:?})", id, room.name);
        Ok(room.participants.into_iter().collect())
    }

    pub fn rename_room(&mut self, id: RoomId, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(Error::InvalidState("room name is empty".to_string()));
        }
        if !self.rooms.contains_key(&id) {
            return Err(Error::RoomNotFound(id));
        }
        if self.name_taken(new_name, Some(id)) {
            return Err(Error::DuplicateName(new_name.to_string()));
        }
        if let Some(room) = self.rooms.get_mut(&id) {
            room.name = new_name.to_string();
        }
        Ok(())
    }

    /// Places a participant in `destination`, removing them from any prior
    /// room first. `UNASSIGNED` (0) only removes the prior membership.
    ///
    /// The capacity check runs before any membership changes, so a rejected
    /// move leaves every room untouched.
    pub fn move_participant(
        &mut self,
        participant_id: ParticipantId,
        destination: RoomId,
    ) -> Result<()> {
        if destination == UNASSIGNED {
            self.unassign(participant_id);
            return Ok(());
        }

        let dest = self
            .rooms
            .get(&destination)
            .ok_or(Error::RoomNotFound(destination))?;
        if dest.participants.contains(&participant_id) {
            return Ok(());
        }
        if dest.is_full() {
            return Err(Error::CapacityExceeded(destination));
        }

        self.unassign(participant_id);
        if let Some(room) = self.rooms.get_mut(&destination) {
            room.participants.insert(participant_id);
            debug!("Moved participant {} to room {}", participant_id, destination);
        }
        Ok(())
    }

    /// Removes the participant from whichever room holds them, if any.
    pub fn unassign(&mut self, participant_id: ParticipantId) {
        for room in self.rooms.values_mut() {
            room.participants.remove(&participant_id);
        }
    }

    pub fn get(&self, id: RoomId) -> Result<&BreakoutRoom> {
        self.rooms.get(&id).ok_or(Error::RoomNotFound(id))
    }

    pub fn room_of(&self, participant_id: ParticipantId) -> Option<RoomId> {
        self.rooms
            .values()
            .find(|room| room.participants.contains(&participant_id))
            .map(|room| room.id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms ordered by id, for stable display.
    pub fn rooms(&self) -> Vec<BreakoutRoom> {
        let mut rooms: Vec<BreakoutRoom> = self.rooms.values().cloned().collect();
        rooms.sort_by_key(|r| r.id);
        rooms
    }

    fn name_taken(&self, name: &str, exclude: Option<RoomId>) -> bool {
        self.rooms
            .values()
            .filter(|room| Some(room.id) != exclude)
            .any(|room| room.name.eq_ignore_ascii_case(name))
    }
}

impl Default for RoomAssignmentTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_duplicate_name_case_insensitive() {
        let mut table = RoomAssignmentTable::new();
        table.create_room("Group 1", None).unwrap();
        let err = table.create_room("group 1", None).unwrap_err();
        assert_eq!(err, Error::DuplicateName("group 1".to_string()));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn create_rejects_out_of_range_capacity() {
        let mut table = RoomAssignmentTable::new();
        assert_eq!(
            table.create_room("Tiny", Some(1)).unwrap_err(),
            Error::InvalidCapacity(1)
        );
        assert_eq!(
            table.create_room("Huge", Some(21)).unwrap_err(),
            Error::InvalidCapacity(21)
        );
        assert!(table.create_room("Ok", Some(2)).is_ok());
        assert!(table.create_room("Also ok", Some(20)).is_ok());
    }

    #[test]
    fn move_removes_prior_membership() {
        let mut table = RoomAssignmentTable::new();
        let r1 = table.create_room("Group 1", None).unwrap();
        let r2 = table.create_room("Group 2", None).unwrap();

        table.move_participant(5, r1).unwrap();
        table.move_participant(5, r2).unwrap();

        assert!(!table.get(r1).unwrap().participants.contains(&5));
        assert!(table.get(r2).unwrap().participants.contains(&5));
        assert_eq!(table.room_of(5), Some(r2));
    }

    #[test]
    fn move_to_sentinel_unassigns() {
        let mut table = RoomAssignmentTable::new();
        let r1 = table.create_room("Group 1", None).unwrap();
        table.move_participant(5, r1).unwrap();

        table.move_participant(5, UNASSIGNED).unwrap();
        assert_eq!(table.room_of(5), None);
    }

    #[test]
    fn move_into_full_room_leaves_memberships_unchanged() {
        let mut table = RoomAssignmentTable::new();
        let r1 = table.create_room("Group 1", Some(2)).unwrap();
        let r2 = table.create_room("Group 2", None).unwrap();
        table.move_participant(1, r1).unwrap();
        table.move_participant(2, r1).unwrap();
        table.move_participant(3, r2).unwrap();

        let err = table.move_participant(3, r1).unwrap_err();
        assert_eq!(err, Error::CapacityExceeded(r1));
        assert_eq!(table.room_of(3), Some(r2));
        assert_eq!(table.get(r1).unwrap().participants.len(), 2);
    }

    #[test]
    fn move_into_own_room_is_a_noop_even_when_full() {
        let mut table = RoomAssignmentTable::new();
        let r1 = table.create_room("Group 1", Some(2)).unwrap();
        table.move_participant(1, r1).unwrap();
        table.move_participant(2, r1).unwrap();

        table.move_participant(1, r1).unwrap();
        assert_eq!(table.room_of(1), Some(r1));
    }

    #[test]
    fn move_to_unknown_room_fails() {
        let mut table = RoomAssignmentTable::new();
        assert_eq!(
            table.move_participant(1, 99).unwrap_err(),
            Error::RoomNotFound(99)
        );
    }

    #[test]
    fn delete_returns_unassigned_members() {
        let mut table = RoomAssignmentTable::new();
        let r1 = table.create_room("Group 1", None).unwrap();
        table.move_participant(1, r1).unwrap();
        table.move_participant(2, r1).unwrap();

        let mut freed = table.delete_room(r1).unwrap();
        freed.sort_unstable();
        assert_eq!(freed, vec![1, 2]);
        assert_eq!(table.room_of(1), None);
        assert_eq!(table.delete_room(r1).unwrap_err(), Error::RoomNotFound(r1));
    }

    #[test]
    fn rename_checks_duplicates_but_allows_keeping_own_name() {
        let mut table = RoomAssignmentTable::new();
        let r1 = table.create_room("Group 1", None).unwrap();
        table.create_room("Group 2", None).unwrap();

        assert_eq!(
            table.rename_room(r1, "GROUP 2").unwrap_err(),
            Error::DuplicateName("GROUP 2".to_string())
        );
        table.rename_room(r1, "Group 1").unwrap();
        table.rename_room(r1, "Reading corner").unwrap();
        assert_eq!(table.get(r1).unwrap().name, "Reading corner");
    }
}
