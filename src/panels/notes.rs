use chrono::{DateTime, Utc};
use serde::Serialize;

/// Shared meeting notes. Content is edited in place and stamped on save.
#[derive(Debug, Default, Serialize)]
pub struct MeetingNotes {
    pub content: String,
    pub auto_save: bool,
    pub last_saved: Option<DateTime<Utc>>,
}

impl MeetingNotes {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            auto_save: true,
            last_saved: None,
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        if self.auto_save {
            self.last_saved = Some(Utc::now());
        }
    }

    pub fn save(&mut self) {
        self.last_saved = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_save_stamps_on_edit() {
        let mut notes = MeetingNotes::new();
        notes.set_content("agenda");
        assert!(notes.last_saved.is_some());
    }

    #[test]
    fn manual_save_only_stamps_on_save() {
        let mut notes = MeetingNotes::new();
        notes.auto_save = false;
        notes.set_content("agenda");
        assert!(notes.last_saved.is_none());
        notes.save();
        assert!(notes.last_saved.is_some());
    }
}
