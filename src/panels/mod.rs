pub mod chat;
pub mod notes;
pub mod polls;

pub use chat::{Attachment, ChatLog, ChatMessage};
pub use notes::MeetingNotes;
pub use polls::{Poll, PollBoard};
