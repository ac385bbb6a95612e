use anyhow::Result;
use bytes::Bytes;
use classroom_session::{Participant, QualitySample, Role, Session, SessionConfig, UNASSIGNED};
use log::info;

/// Scripted walkthrough of one classroom meeting against the state model.
/// The rendering and media layers are simulated; the model is the real thing.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut session = Session::new(SessionConfig::from_env());
    session.start();

    let mut events = session.subscribe();
    let listener = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!("event: {}", serde_json::to_string(&event).unwrap_or_default());
        }
    });

    session.add_participant(Participant::new(1, "Teacher Smith", Role::Host))?;
    session.add_participant(Participant::new(2, "John Doe", Role::Participant))?;
    session.add_participant(Participant::new(3, "Jane Smith", Role::Participant))?;
    session.add_participant(Participant::new(4, "Mike Johnson", Role::Participant))?;

    session.toggle_pin(1)?;
    session.toggle_mute(2)?;
    session.raise_hand(2)?;
    session.send_reaction(3, "clap")?;

    let group1 = session.create_room("Group 1", Some(4))?;
    let group2 = session.create_room("Group 2", Some(4))?;
    session.move_participant(2, group1)?;
    session.move_participant(3, group1)?;
    session.move_participant(4, group2)?;
    session.move_participant(4, UNASSIGNED)?;

    session.start_recording()?;
    session.append_recording_chunk(Bytes::from_static(b"chunk-1"))?;
    session.append_recording_chunk(Bytes::from_static(b"chunk-2"))?;
    session.stop_recording()?;
    let artifact = session.export_recording()?;
    info!(
        "recording exported: {} ({} bytes)",
        artifact.filename,
        artifact.data.len()
    );

    session.update_quality(QualitySample {
        bitrate_kbps: 2500,
        packet_loss_pct: 0.4,
        participant_count: session.participant_count(),
        score: 92,
    });
    session.tick();

    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);

    session.end();
    listener.abort();
    Ok(())
}
