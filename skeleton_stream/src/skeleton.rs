//! Full-body skeleton data and per-frame snapshots.

use std::time::Instant;

use crate::joint::{Joint, JointKind, JOINT_COUNT};

// ════════════════════════════════════════════════════════════════════════════
// TrackingState
// ════════════════════════════════════════════════════════════════════════════

/// Per-skeleton tracking state reported by the sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackingState {
    /// Full joint tracking.
    Tracked,
    /// Only a centre-of-mass position, no joints.
    PositionOnly,
    /// Nothing usable.
    #[default]
    NotTracked,
}

// ════════════════════════════════════════════════════════════════════════════
// Skeleton
// ════════════════════════════════════════════════════════════════════════════

/// One body's joint table for a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Skeleton {
    /// Sensor-assigned identity, stable while the body stays in view.
    pub tracking_id: u32,
    pub state:       TrackingState,
    pub joints:      [Joint; JOINT_COUNT],
}

impl Skeleton {
    /// An untracked placeholder with all joints at the origin.
    pub fn untracked(tracking_id: u32) -> Self {
        Skeleton {
            tracking_id,
            state:  TrackingState::NotTracked,
            joints: [Joint::default(); JOINT_COUNT],
        }
    }

    /// Joint lookup by kind.  Infallible: every skeleton carries the
    /// full joint table, so there is no missing-name case to recover
    /// from.
    #[inline]
    pub fn joint(&self, kind: JointKind) -> &Joint {
        &self.joints[kind.index()]
    }

    pub fn set_joint(&mut self, kind: JointKind, joint: Joint) {
        self.joints[kind.index()] = joint;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SkeletonSnapshot
// ════════════════════════════════════════════════════════════════════════════

/// One instant's tracked skeleton, stamped with its arrival time.
///
/// Immutable once created.  Exactly one snapshot is "current" at any
/// pipeline instant: the adapter hands it to the next step, which
/// consumes and drops it — snapshots are never queued or replayed.
#[derive(Clone, Debug)]
pub struct SkeletonSnapshot {
    pub at:       Instant,
    pub skeleton: Skeleton,
}

impl SkeletonSnapshot {
    pub fn new(at: Instant, skeleton: Skeleton) -> Self {
        SkeletonSnapshot { at, skeleton }
    }

    /// Shorthand joint lookup on the contained skeleton.
    #[inline]
    pub fn joint(&self, kind: JointKind) -> &Joint {
        self.skeleton.joint(kind)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::SkeletonPoint;

    #[test]
    fn untracked_skeleton_has_default_joints() {
        let s = Skeleton::untracked(7);
        assert_eq!(s.tracking_id, 7);
        assert_eq!(s.state, TrackingState::NotTracked);
        for kind in JointKind::ALL {
            assert_eq!(s.joint(kind), &Joint::default());
        }
    }

    #[test]
    fn set_joint_round_trips() {
        let mut s = Skeleton::untracked(1);
        let hand = Joint::tracked(SkeletonPoint::new(0.25, 0.1, 1.5));
        s.set_joint(JointKind::HandLeft, hand);
        assert_eq!(s.joint(JointKind::HandLeft), &hand);
        // Neighbouring slots untouched
        assert_eq!(s.joint(JointKind::HandRight), &Joint::default());
    }

    #[test]
    fn snapshot_joint_delegates() {
        let mut s = Skeleton::untracked(1);
        s.state = TrackingState::Tracked;
        s.set_joint(
            JointKind::ElbowLeft,
            Joint::tracked(SkeletonPoint::new(-0.2, 0.0, 1.4)),
        );
        let snap = SkeletonSnapshot::new(Instant::now(), s);
        assert_eq!(snap.joint(JointKind::ElbowLeft).position.x, -0.2);
    }
}
