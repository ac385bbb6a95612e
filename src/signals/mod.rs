pub mod events;
pub mod hand_raise;

pub use events::{EventBroadcaster, EventKind, SessionEvent};
pub use hand_raise::{HandRaiseEntry, HandRaiseQueue};
