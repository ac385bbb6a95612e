use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

use crate::types::ParticipantId;
use crate::utils::{Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct PollOption {
    pub text: String,
    pub votes: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Poll {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<PollOption>,
    pub is_open: bool,
    #[serde(skip)]
    voters: HashSet<ParticipantId>,
}

impl Poll {
    pub fn total_votes(&self) -> u32 {
        self.options.iter().map(|o| o.votes).sum()
    }

    pub fn has_voted(&self, participant: ParticipantId) -> bool {
        self.voters.contains(&participant)
    }
}

/// Host-created polls with one vote per participant.
#[derive(Debug, Default)]
pub struct PollBoard {
    polls: Vec<Poll>,
}

impl PollBoard {
    pub fn new() -> Self {
        Self { polls: Vec::new() }
    }

    pub fn create(&mut self, question: &str, options: Vec<String>) -> Result<Uuid> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidState("poll question is empty".to_string()));
        }
        let options: Vec<PollOption> = options
            .into_iter()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .map(|text| PollOption { text, votes: 0 })
            .collect();
        if options.len() < 2 {
            return Err(Error::InvalidState(
                "a poll needs at least two options".to_string(),
            ));
        }

        let poll = Poll {
            id: Uuid::new_v4(),
            question: question.to_string(),
            options,
            is_open: true,
            voters: HashSet::new(),
        };
        let id = poll.id;
        self.polls.push(poll);
        Ok(id)
    }

    pub fn vote(
        &mut self,
        poll_id: Uuid,
        participant: ParticipantId,
        option_index: usize,
    ) -> Result<()> {
        let poll = self.get_mut(poll_id)?;
        if !poll.is_open {
            return Err(Error::InvalidState("poll is closed".to_string()));
        }
        if poll.has_voted(participant) {
            return Err(Error::InvalidState(
                "participant has already voted".to_string(),
            ));
        }
        let option = poll.options.get_mut(option_index).ok_or_else(|| {
            Error::InvalidState(format!("poll has no option {}", option_index))
        })?;
        option.votes += 1;
        poll.voters.insert(participant);
        Ok(())
    }

    pub fn close(&mut self, poll_id: Uuid) -> Result<()> {
        self.get_mut(poll_id)?.is_open = false;
        Ok(())
    }

    pub fn polls(&self) -> &[Poll] {
        &self.polls
    }

    fn get_mut(&mut self, poll_id: Uuid) -> Result<&mut Poll> {
        self.polls
            .iter_mut()
            .find(|p| p.id == poll_id)
            .ok_or_else(|| Error::InvalidState(format!("unknown poll {}", poll_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_poll() -> (PollBoard, Uuid) {
        let mut board = PollBoard::new();
        let id = board
            .create("Ready?", vec!["Yes".to_string(), "No".to_string()])
            .unwrap();
        (board, id)
    }

    #[test]
    fn poll_needs_two_options() {
        let mut board = PollBoard::new();
        assert!(board.create("Ready?", vec!["Yes".to_string()]).is_err());
        assert!(board
            .create("Ready?", vec!["Yes".to_string(), "  ".to_string()])
            .is_err());
    }

    #[test]
    fn one_vote_per_participant() {
        let (mut board, id) = board_with_poll();
        board.vote(id, 1, 0).unwrap();
        assert!(board.vote(id, 1, 1).is_err());
        assert_eq!(board.polls()[0].total_votes(), 1);
    }

    #[test]
    fn closed_poll_rejects_votes() {
        let (mut board, id) = board_with_poll();
        board.close(id).unwrap();
        assert!(board.vote(id, 1, 0).is_err());
    }

    #[test]
    fn out_of_range_option_is_rejected_without_recording_a_voter() {
        let (mut board, id) = board_with_poll();
        assert!(board.vote(id, 1, 5).is_err());
        assert!(!board.polls()[0].has_voted(1));
        board.vote(id, 1, 0).unwrap();
    }
}
