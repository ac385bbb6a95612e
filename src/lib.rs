pub mod config;
pub mod panels;
pub mod recording;
pub mod registry;
pub mod rooms;
pub mod session;
pub mod signals;
pub mod stats;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use config::SessionConfig;
pub use registry::Participant;
pub use rooms::BreakoutRoom;
pub use session::{MeetingControls, Session, SessionSnapshot, SharedSession};
pub use types::{ParticipantId, QualitySample, Role, RoomId, UNASSIGNED};
pub use utils::{Error, Result};
