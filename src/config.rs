use std::env;

#[derive(Clone)]
pub struct SessionConfig {
    pub title: String,
    pub event_buffer: usize,
    pub recording_mime_type: String,
    pub default_room_capacity: Option<usize>,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            title: env::var("SESSION_TITLE")
                .unwrap_or_else(|_| "Classroom Session".to_string()),
            event_buffer: env::var("SESSION_EVENT_BUFFER")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            recording_mime_type: env::var("RECORDING_MIME_TYPE")
                .unwrap_or_else(|_| "video/webm".to_string()),
            default_room_capacity: env::var("DEFAULT_ROOM_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            title: "Classroom Session".to_string(),
            event_buffer: 100,
            recording_mime_type: "video/webm".to_string(),
            default_room_capacity: None,
        }
    }
}
