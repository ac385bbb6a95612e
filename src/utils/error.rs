use std::error::Error as StdError;
use std::fmt;

use crate::types::{ParticipantId, RoomId};

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    ParticipantNotFound(ParticipantId),
    RoomNotFound(RoomId),
    DuplicateId(ParticipantId),
    DuplicateName(String),
    InvalidCapacity(usize),
    CapacityExceeded(RoomId),
    AlreadyRecording,
    NotRecording,
    InvalidState(String),
    NoData,
    PermissionDenied(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ParticipantNotFound(id) => write!(f, "Participant {} not found", id),
            Error::RoomNotFound(id) => write!(f, "Room {} not found", id),
            Error::DuplicateId(id) => write!(f, "Participant {} already exists", id),
            Error::DuplicateName(name) => write!(f, "Room name {:?} already exists", name),
            Error::InvalidCapacity(n) => write!(f, "Room capacity {} is out of range", n),
            Error::CapacityExceeded(id) => write!(f, "Room {} is full", id),
            Error::AlreadyRecording => write!(f, "Recording is already in progress"),
            Error::NotRecording => write!(f, "No recording in progress"),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::NoData => write!(f, "No recorded data available"),
            Error::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
        }
    }
}

impl StdError for Error {}

pub type Result<T> = std::result::Result<T, Error>;
