pub mod manager;
pub mod state;

pub use manager::RoomAssignmentTable;
pub use state::BreakoutRoom;
