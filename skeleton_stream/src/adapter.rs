//! Frame adapter: raw notifications → owned snapshots.
//!
//! For each skeleton notification the adapter copies the buffer out
//! under its scoped guard, picks the first skeleton the sensor reports
//! as tracked, and hands downstream an owned [`SkeletonSnapshot`].
//! Frames with no tracked skeleton, and frames whose buffer cannot be
//! read, are dropped silently — a bad frame never stops the stream.

use std::time::Instant;

use tracing::debug;

use crate::skeleton::{Skeleton, SkeletonSnapshot, TrackingState};
use crate::source::SkeletonFrame;

// ════════════════════════════════════════════════════════════════════════════
// FrameAdapter
// ════════════════════════════════════════════════════════════════════════════

/// Stateless adapter from raw skeleton notifications to snapshots.
pub struct FrameAdapter;

impl FrameAdapter {
    /// Adapt one notification.
    ///
    /// Returns `Some` only when the frame carried a tracked skeleton.
    /// The guard (and with it the underlying buffer) is released before
    /// this function returns, whatever path it takes.
    pub fn snapshot(
        frame: Option<Box<dyn SkeletonFrame>>,
        at: Instant,
    ) -> Option<SkeletonSnapshot> {
        // Handle unavailable: treated as an empty skeleton buffer.
        let mut guard = frame?;

        let skeletons = match guard.copy_skeletons() {
            Ok(s)  => s,
            Err(e) => {
                // Transient; skip this frame and carry on.
                debug!("skeleton buffer read failed, frame skipped: {}", e);
                return None;
            }
        };
        drop(guard);

        Self::first_tracked(skeletons).map(|skeleton| SkeletonSnapshot::new(at, skeleton))
    }

    /// First skeleton the sensor reports as fully tracked.
    fn first_tracked(skeletons: Vec<Skeleton>) -> Option<Skeleton> {
        skeletons
            .into_iter()
            .find(|s| s.state == TrackingState::Tracked)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FrameError;

    /// In-memory frame guard over a prepared buffer.
    struct BufferFrame {
        skeletons: Vec<Skeleton>,
        fail:      bool,
    }

    impl SkeletonFrame for BufferFrame {
        fn copy_skeletons(&mut self) -> Result<Vec<Skeleton>, FrameError> {
            if self.fail {
                return Err(FrameError("resource busy".into()));
            }
            Ok(self.skeletons.clone())
        }
    }

    fn frame(skeletons: Vec<Skeleton>) -> Option<Box<dyn SkeletonFrame>> {
        Some(Box::new(BufferFrame { skeletons, fail: false }))
    }

    fn tracked(id: u32) -> Skeleton {
        let mut s = Skeleton::untracked(id);
        s.state = TrackingState::Tracked;
        s
    }

    #[test]
    fn unavailable_handle_yields_nothing() {
        assert!(FrameAdapter::snapshot(None, Instant::now()).is_none());
    }

    #[test]
    fn untracked_frame_is_dropped() {
        let f = frame(vec![Skeleton::untracked(1), Skeleton::untracked(2)]);
        assert!(FrameAdapter::snapshot(f, Instant::now()).is_none());
    }

    #[test]
    fn empty_buffer_is_dropped() {
        assert!(FrameAdapter::snapshot(frame(vec![]), Instant::now()).is_none());
    }

    #[test]
    fn first_tracked_skeleton_is_selected() {
        let f = frame(vec![Skeleton::untracked(1), tracked(2), tracked(3)]);
        let snap = FrameAdapter::snapshot(f, Instant::now()).unwrap();
        assert_eq!(snap.skeleton.tracking_id, 2);
    }

    #[test]
    fn failed_copy_is_skipped_not_fatal() {
        let f: Option<Box<dyn SkeletonFrame>> =
            Some(Box::new(BufferFrame { skeletons: vec![tracked(1)], fail: true }));
        assert!(FrameAdapter::snapshot(f, Instant::now()).is_none());

        // The next (good) frame still goes through.
        let snap = FrameAdapter::snapshot(frame(vec![tracked(1)]), Instant::now());
        assert!(snap.is_some());
    }

    #[test]
    fn snapshot_carries_arrival_time() {
        let at = Instant::now();
        let snap = FrameAdapter::snapshot(frame(vec![tracked(9)]), at).unwrap();
        assert_eq!(snap.at, at);
    }
}
