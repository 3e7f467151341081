//! The composed detector chain.
//!
//! One [`GesturePipeline`] owns a directional detector feeding a wave
//! detector.  The session pushes snapshots in arrival order and polls
//! for due window evaluations; both calls are synchronous and
//! non-blocking, so they run on whatever thread delivers the frame.

use std::time::Instant;

use skeleton_stream::{JointKind, SkeletonSnapshot};

use crate::direction::{DirectionSignal, DirectionalDetector, DEFAULT_DEAD_ZONE};
use crate::wave::{GestureEvent, WaveConfig, WaveDetector};

// ════════════════════════════════════════════════════════════════════════════
// PipelineConfig
// ════════════════════════════════════════════════════════════════════════════

/// Tuning for the whole detector chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Dead-zone half-width for the directional detector.
    pub dead_zone: f32,
    pub wave:      WaveConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            dead_zone: DEFAULT_DEAD_ZONE,
            wave:      WaveConfig::default(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GesturePipeline
// ════════════════════════════════════════════════════════════════════════════

/// Directional detection chained into wave detection.
#[derive(Debug)]
pub struct GesturePipeline {
    directional: DirectionalDetector,
    wave:        WaveDetector,
}

impl GesturePipeline {
    /// `start` anchors the wave window schedule; use the moment the
    /// session went live.
    pub fn new(cfg: PipelineConfig, start: Instant) -> Self {
        GesturePipeline {
            directional: DirectionalDetector::new(cfg.dead_zone),
            wave:        WaveDetector::new(cfg.wave, start),
        }
    }

    /// Feed one tracked snapshot.
    ///
    /// Projects the left hand against the left elbow on the horizontal
    /// axis; any resulting debounced direction change is also recorded
    /// with the wave detector before being returned.
    pub fn on_snapshot(&mut self, snap: &SkeletonSnapshot) -> Option<DirectionSignal> {
        let hand  = snap.joint(JointKind::HandLeft).position.x;
        let elbow = snap.joint(JointKind::ElbowLeft).position.x;

        let signal = self.directional.sample(hand - elbow, snap.at)?;
        self.wave.record(signal.at);
        Some(signal)
    }

    /// Evaluate wave windows due by `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<GestureEvent> {
        self.wave.poll(now)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use skeleton_stream::{Joint, Skeleton, SkeletonPoint, TrackingState};
    use std::time::Duration;

    /// Tracked skeleton with the left hand offset `dx` from the elbow.
    fn snapshot(base: Instant, ms: u64, dx: f32) -> SkeletonSnapshot {
        let mut s = Skeleton::untracked(1);
        s.state = TrackingState::Tracked;
        s.set_joint(
            JointKind::ElbowLeft,
            Joint::tracked(SkeletonPoint::new(-0.1, 0.0, 1.5)),
        );
        s.set_joint(
            JointKind::HandLeft,
            Joint::tracked(SkeletonPoint::new(-0.1 + dx, 0.1, 1.4)),
        );
        SkeletonSnapshot::new(base + Duration::from_millis(ms), s)
    }

    #[test]
    fn snapshots_produce_debounced_signals() {
        let base = Instant::now();
        let mut p = GesturePipeline::new(PipelineConfig::default(), base);

        let first = p.on_snapshot(&snapshot(base, 0, -0.2)).unwrap();
        assert_eq!(first.direction, Direction::Left);

        // Same side again: suppressed.
        assert!(p.on_snapshot(&snapshot(base, 33, -0.25)).is_none());
        // Dead-zone: dropped.
        assert!(p.on_snapshot(&snapshot(base, 66, 0.01)).is_none());
        // Other side: emitted.
        let back = p.on_snapshot(&snapshot(base, 99, 0.2)).unwrap();
        assert_eq!(back.direction, Direction::Right);
    }

    #[test]
    fn wave_fires_after_three_changes() {
        let base = Instant::now();
        let mut p = GesturePipeline::new(PipelineConfig::default(), base);

        // Left at 0.0 s, Right at 0.6 s, Left at 1.2 s.
        assert!(p.on_snapshot(&snapshot(base, 0, -0.2)).is_some());
        assert!(p.on_snapshot(&snapshot(base, 600, 0.2)).is_some());
        assert!(p.on_snapshot(&snapshot(base, 1200, -0.2)).is_some());

        let events = p.poll(base + Duration::from_millis(3000));
        assert_eq!(events, vec![GestureEvent::WaveDetected]);

        // The window sliding past the first signal sees only two.
        assert!(p.poll(base + Duration::from_millis(3600)).is_empty());
    }

    #[test]
    fn jitter_on_one_side_never_waves() {
        let base = Instant::now();
        let mut p = GesturePipeline::new(PipelineConfig::default(), base);

        // Thirty frames of a hand held right of the elbow: one signal.
        for i in 0..30u64 {
            let _ = p.on_snapshot(&snapshot(base, i * 33, 0.2 + (i % 3) as f32 * 0.01));
        }
        assert!(p.poll(base + Duration::from_millis(4000)).is_empty());
    }
}
