use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

use crate::types::{QualitySample, QualityTier};

/// Elapsed meeting time. The clock owns no scheduler: the host environment
/// calls `tick()` on whatever interval it likes and reads `elapsed` back.
#[derive(Debug)]
pub struct SessionClock {
    started_monotonic: Option<Instant>,
    started_at: Option<DateTime<Utc>>,
    elapsed: Duration,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            started_monotonic: None,
            started_at: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Records the start instant. Idempotent: calling again while running has
    /// no effect.
    pub fn start(&mut self) {
        if self.started_monotonic.is_none() {
            self.started_monotonic = Some(Instant::now());
            self.started_at = Some(Utc::now());
        }
    }

    /// Recomputes `elapsed = now - started_at` and returns it. Monotonic for
    /// the life of the session.
    pub fn tick(&mut self) -> Duration {
        if let Some(started) = self.started_monotonic {
            self.elapsed = started.elapsed();
        }
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.started_monotonic.is_some()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// `HH:MM:SS` rendering of the last computed elapsed time.
    pub fn formatted(&self) -> String {
        let total = self.elapsed.as_secs();
        format!(
            "{:02}:{:02}:{:02}",
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Latest externally supplied quality sample. No smoothing, last write wins.
#[derive(Debug, Default)]
pub struct SessionStats {
    latest: Option<QualitySample>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self { latest: None }
    }

    pub fn update(&mut self, sample: QualitySample) {
        self.latest = Some(sample);
    }

    pub fn latest(&self) -> Option<&QualitySample> {
        self.latest.as_ref()
    }

    pub fn tier(&self) -> Option<QualityTier> {
        self.latest.map(|s| QualityTier::from_score(s.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_idempotent() {
        let mut clock = SessionClock::new();
        clock.start();
        let first = clock.started_at();
        clock.start();
        assert_eq!(clock.started_at(), first);
    }

    #[test]
    fn tick_before_start_stays_at_zero() {
        let mut clock = SessionClock::new();
        assert_eq!(clock.tick(), Duration::ZERO);
        assert_eq!(clock.formatted(), "00:00:00");
    }

    #[test]
    fn tick_never_goes_backwards() {
        let mut clock = SessionClock::new();
        clock.start();
        let mut last = clock.tick();
        for _ in 0..10 {
            let next = clock.tick();
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn formatting_pads_fields() {
        let mut clock = SessionClock::new();
        clock.elapsed = Duration::from_secs(3 * 3600 + 7 * 60 + 9);
        assert_eq!(clock.formatted(), "03:07:09");
    }

    #[test]
    fn quality_last_write_wins() {
        let mut stats = SessionStats::new();
        assert!(stats.latest().is_none());
        stats.update(QualitySample {
            bitrate_kbps: 2500,
            packet_loss_pct: 0.5,
            participant_count: 4,
            score: 90,
        });
        stats.update(QualitySample {
            bitrate_kbps: 800,
            packet_loss_pct: 4.0,
            participant_count: 4,
            score: 42,
        });
        assert_eq!(stats.latest().unwrap().bitrate_kbps, 800);
        assert_eq!(stats.tier(), Some(QualityTier::Low));
    }

    #[test]
    fn tier_thresholds_match_display_levels() {
        assert_eq!(QualityTier::from_score(81), QualityTier::Hd);
        assert_eq!(QualityTier::from_score(80), QualityTier::Sd);
        assert_eq!(QualityTier::from_score(51), QualityTier::Sd);
        assert_eq!(QualityTier::from_score(50), QualityTier::Low);
    }
}
