use bytes::Bytes;
use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::utils::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
}

/// Exported capture artifact, ready for the download layer.
#[derive(Debug, Clone)]
pub struct RecordingArtifact {
    pub filename: String,
    pub mime_type: String,
    pub data: Bytes,
}

/// Bookkeeping for a single meeting's capture session. The actual recording
/// primitive (device/display access) lives with the media collaborator; this
/// controller only manages state transitions and chunk accumulation.
///
/// At most one recording is active per meeting: `idle -> recording -> idle`.
pub struct RecordingController {
    state: RecordingState,
    chunks: Vec<Bytes>,
    current_id: Option<Uuid>,
    started_at: Option<DateTime<Utc>>,
    completed: u32,
    mime_type: String,
}

impl RecordingController {
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            state: RecordingState::Idle,
            chunks: Vec::new(),
            current_id: None,
            started_at: None,
            completed: 0,
            mime_type: mime_type.into(),
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn bytes_captured(&self) -> usize {
        self.chunks.iter().map(|c| c.len()).sum()
    }

    /// Completed start/stop cycles so far.
    pub fn completed_recordings(&self) -> u32 {
        self.completed
    }

    /// Start time of the current or most recent recording.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn start(&mut self) -> Result<Uuid> {
        if self.state == RecordingState::Recording {
            return Err(Error::AlreadyRecording);
        }
        let id = Uuid::new_v4();
        self.current_id = Some(id);
        self.started_at = Some(Utc::now());
        self.state = RecordingState::Recording;
        info!("Started recording {}", id);
        Ok(id)
    }

    pub fn stop(&mut self) -> Result<()> {
        if self.state != RecordingState::Recording {
            return Err(Error::NotRecording);
        }
        self.state = RecordingState::Idle;
        self.completed += 1;
        info!(
            "Stopped recording {:?} ({} chunks, {} bytes)",
            self.current_id,
            self.chunks.len(),
            self.bytes_captured()
        );
        Ok(())
    }

    /// Accepts a data chunk from the capture collaborator. Valid only while
    /// recording; empty chunks are ignored.
    pub fn append_chunk(&mut self, data: Bytes) -> Result<()> {
        if self.state != RecordingState::Recording {
            return Err(Error::InvalidState(
                "chunk received while not recording".to_string(),
            ));
        }
        if !data.is_empty() {
            self.chunks.push(data);
        }
        Ok(())
    }

    /// Concatenates everything captured so far into one artifact and drains
    /// the buffer. Only valid from idle, after at least one completed
    /// recording produced data.
    pub fn export(&mut self) -> Result<RecordingArtifact> {
        if self.state == RecordingState::Recording {
            return Err(Error::InvalidState(
                "export requested while recording".to_string(),
            ));
        }
        if self.completed == 0 || self.chunks.is_empty() {
            return Err(Error::NoData);
        }

        let mut data = Vec::with_capacity(self.bytes_captured());
        for chunk in self.chunks.drain(..) {
            data.extend_from_slice(&chunk);
        }
        let filename = format!(
            "class-recording-{}-{}.webm",
            Utc::now().format("%Y%m%d_%H%M%S"),
            self.current_id.unwrap_or_else(Uuid::new_v4)
        );
        info!("Exported recording to {} ({} bytes)", filename, data.len());
        Ok(RecordingArtifact {
            filename,
            mime_type: self.mime_type.clone(),
            data: Bytes::from(data),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> RecordingController {
        RecordingController::new("video/webm")
    }

    #[test]
    fn start_twice_fails() {
        let mut rec = controller();
        rec.start().unwrap();
        assert_eq!(rec.start().unwrap_err(), Error::AlreadyRecording);
        assert!(rec.is_recording());
    }

    #[test]
    fn stop_twice_fails() {
        let mut rec = controller();
        rec.start().unwrap();
        rec.stop().unwrap();
        assert_eq!(rec.stop().unwrap_err(), Error::NotRecording);
    }

    #[test]
    fn stop_without_start_fails() {
        let mut rec = controller();
        assert_eq!(rec.stop().unwrap_err(), Error::NotRecording);
    }

    #[test]
    fn append_outside_recording_fails() {
        let mut rec = controller();
        let err = rec.append_chunk(Bytes::from_static(b"data")).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert_eq!(rec.chunk_count(), 0);
    }

    #[test]
    fn export_before_any_cycle_fails_with_no_data() {
        let mut rec = controller();
        assert_eq!(rec.export().unwrap_err(), Error::NoData);
    }

    #[test]
    fn export_while_recording_fails() {
        let mut rec = controller();
        rec.start().unwrap();
        rec.append_chunk(Bytes::from_static(b"data")).unwrap();
        assert!(matches!(rec.export().unwrap_err(), Error::InvalidState(_)));
    }

    #[test]
    fn export_concatenates_chunks_in_order_and_drains() {
        let mut rec = controller();
        rec.start().unwrap();
        rec.append_chunk(Bytes::from_static(b"abc")).unwrap();
        rec.append_chunk(Bytes::from_static(b"")).unwrap();
        rec.append_chunk(Bytes::from_static(b"def")).unwrap();
        rec.stop().unwrap();

        let artifact = rec.export().unwrap();
        assert_eq!(&artifact.data[..], b"abcdef");
        assert_eq!(artifact.mime_type, "video/webm");
        assert!(artifact.filename.starts_with("class-recording-"));
        assert!(artifact.filename.ends_with(".webm"));

        // The buffer is drained by export.
        assert_eq!(rec.export().unwrap_err(), Error::NoData);
    }

    #[test]
    fn chunks_survive_across_cycles_until_export() {
        let mut rec = controller();
        rec.start().unwrap();
        rec.append_chunk(Bytes::from_static(b"one")).unwrap();
        rec.stop().unwrap();
        rec.start().unwrap();
        rec.append_chunk(Bytes::from_static(b"two")).unwrap();
        rec.stop().unwrap();

        let artifact = rec.export().unwrap();
        assert_eq!(&artifact.data[..], b"onetwo");
    }
}
