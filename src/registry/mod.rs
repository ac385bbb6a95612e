pub mod manager;
pub mod state;

pub use manager::ParticipantRegistry;
pub use state::Participant;
