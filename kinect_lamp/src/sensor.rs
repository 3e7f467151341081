//! Skeleton sources — mouse-driven simulation and scripted replay.
//!
//! Both implement [`SkeletonSource`], so the session wires them exactly
//! as it would real hardware.  The simulator turns normalized cursor
//! positions (fed from the visualizer's window over a channel) into
//! ~30 fps skeleton frames plus a synthetic camera image; the replay
//! source plays back a prepared buffer sequence for tests and demos.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::info;

use skeleton_stream::{
    ColorFrame, FrameError, FrameEvent, Joint, JointKind, SensorError, Skeleton, SkeletonFrame,
    SkeletonPoint, SkeletonSource, SmoothingParams, TrackingMode, TrackingState,
};

// ════════════════════════════════════════════════════════════════════════════
// BufferFrame — in-memory scoped frame guard
// ════════════════════════════════════════════════════════════════════════════

/// Owned skeleton buffer standing in for a hardware frame handle.
/// Dropping it is the release.
pub struct BufferFrame {
    skeletons: Vec<Skeleton>,
}

impl BufferFrame {
    pub fn new(skeletons: Vec<Skeleton>) -> Self {
        BufferFrame { skeletons }
    }
}

impl SkeletonFrame for BufferFrame {
    fn copy_skeletons(&mut self) -> Result<Vec<Skeleton>, FrameError> {
        Ok(std::mem::take(&mut self.skeletons))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimSensor — mouse-driven simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Cursor updates from the simulation window, in normalized window
/// coordinates (0,0 top-left .. 1,1 bottom-right).
#[derive(Clone, Copy, Debug)]
pub struct SimInput {
    pub x: f32,
    pub y: f32,
}

/// Camera image dimensions produced by the simulator.
const CAM_W: usize = 160;
const CAM_H: usize = 120;

/// Skeleton source driven by the mouse.
///
/// The latest cursor position becomes both hand joints; the left elbow
/// sits pinned under the shoulder centre, so the window midline is the
/// directional dead-zone and sweeping the cursor across it produces
/// Left/Right signals.
pub struct SimSensor {
    input:      Receiver<SimInput>,
    frame_rate: u32,
    /// Hand reach mapped to the full window axis; must match the
    /// session's projection so swatch hits line up.
    reach:      f32,
}

impl SimSensor {
    pub fn new(input: Receiver<SimInput>, reach: f32) -> Self {
        SimSensor { input, frame_rate: 30, reach }
    }

    /// Normalized window coordinates → skeleton space.
    fn to_skeleton_space(&self, cursor: SimInput) -> SkeletonPoint {
        SkeletonPoint::new(
            (2.0 * cursor.x - 1.0) * self.reach,
            (1.0 - 2.0 * cursor.y) * self.reach,
            1.4,
        )
    }

    /// One tracked skeleton with both hands at the cursor.
    fn skeleton(&self, hand: SkeletonPoint) -> Skeleton {
        let mut s = Skeleton::untracked(1);
        s.state = TrackingState::Tracked;

        s.set_joint(JointKind::Head,           Joint::tracked(SkeletonPoint::new(0.0, 0.35, 1.5)));
        s.set_joint(JointKind::ShoulderCenter, Joint::tracked(SkeletonPoint::new(0.0, 0.25, 1.5)));
        s.set_joint(JointKind::ShoulderLeft,   Joint::tracked(SkeletonPoint::new(-0.15, 0.2, 1.5)));
        s.set_joint(JointKind::ShoulderRight,  Joint::tracked(SkeletonPoint::new(0.15, 0.2, 1.5)));
        // Elbow pinned under the shoulder centre: hand.x − elbow.x is
        // just the cursor's offset from the midline.
        s.set_joint(JointKind::ElbowLeft,      Joint::tracked(SkeletonPoint::new(0.0, 0.0, 1.45)));
        s.set_joint(JointKind::ElbowRight,     Joint::tracked(SkeletonPoint::new(0.15, 0.0, 1.45)));
        s.set_joint(JointKind::WristLeft,      Joint::tracked(hand));
        s.set_joint(JointKind::WristRight,     Joint::tracked(hand));
        s.set_joint(JointKind::HandLeft,       Joint::tracked(hand));
        s.set_joint(JointKind::HandRight,      Joint::tracked(hand));
        s
    }

    /// Synthetic camera image: a dim vertical gradient with a rolling
    /// scanline, enough to show the display path is alive.
    fn color_frame(tick: u64) -> ColorFrame {
        let mut pixels = vec![0u32; CAM_W * CAM_H];
        let line = (tick as usize * 2) % CAM_H;
        for y in 0..CAM_H {
            let shade = 0x18 + (y * 0x30 / CAM_H) as u32;
            let row = if y == line {
                0xFF28_4868
            } else {
                0xFF00_0000 | shade << 16 | shade << 8 | (shade + 0x08)
            };
            for x in 0..CAM_W {
                pixels[y * CAM_W + x] = row;
            }
        }
        ColorFrame { width: CAM_W, height: CAM_H, pixels }
    }
}

impl SkeletonSource for SimSensor {
    fn enable(&mut self, mode: TrackingMode, smoothing: SmoothingParams)
        -> Result<(), SensorError>
    {
        // The simulator is always "connected"; it just records what a
        // real sensor would have been configured with.
        info!("sim sensor enabled: {:?}, smoothing {:?}", mode, smoothing);
        Ok(())
    }

    fn run(self: Box<Self>, tx: Sender<FrameEvent>, stop: Arc<AtomicBool>) {
        let interval = Duration::from_millis(1000 / self.frame_rate.max(1) as u64);
        let mut cursor = SimInput { x: 0.5, y: 0.5 };
        let mut tick = 0u64;

        loop {
            if stop.load(Ordering::SeqCst) {
                break;
            }

            // Drain to the latest cursor position; stale ones decay.
            loop {
                match self.input.try_recv() {
                    Ok(c) => cursor = c,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            let hand = self.to_skeleton_space(cursor);
            let frame = BufferFrame::new(vec![self.skeleton(hand)]);
            if tx.send(FrameEvent::Skeleton(Some(Box::new(frame)))).is_err() {
                return;
            }
            if tx.send(FrameEvent::Color(Self::color_frame(tick))).is_err() {
                return;
            }

            tick += 1;
            thread::sleep(interval);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySource — scripted frames for tests and demos
// ════════════════════════════════════════════════════════════════════════════

/// Plays back a prepared sequence of skeleton buffers at a fixed
/// cadence, then exits.
pub struct ReplaySource {
    frames:    Vec<Vec<Skeleton>>,
    interval:  Duration,
    connected: bool,
}

impl ReplaySource {
    pub fn new(frames: Vec<Vec<Skeleton>>, interval: Duration) -> Self {
        ReplaySource { frames, interval, connected: true }
    }

    /// A replay source that reports no sensor at enable time.
    pub fn disconnected() -> Self {
        ReplaySource {
            frames:    Vec::new(),
            interval:  Duration::ZERO,
            connected: false,
        }
    }
}

impl SkeletonSource for ReplaySource {
    fn enable(&mut self, _mode: TrackingMode, _smoothing: SmoothingParams)
        -> Result<(), SensorError>
    {
        if !self.connected {
            return Err(SensorError::NoSensorAvailable);
        }
        Ok(())
    }

    fn run(self: Box<Self>, tx: Sender<FrameEvent>, stop: Arc<AtomicBool>) {
        for skeletons in self.frames {
            if stop.load(Ordering::SeqCst) {
                break;
            }
            let frame = BufferFrame::new(skeletons);
            if tx.send(FrameEvent::Skeleton(Some(Box::new(frame)))).is_err() {
                break;
            }
            thread::sleep(self.interval);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn cursor_maps_to_skeleton_space() {
        let (_tx, rx) = mpsc::channel();
        let sim = SimSensor::new(rx, 0.4);

        // Window centre is the skeleton origin.
        let centre = sim.to_skeleton_space(SimInput { x: 0.5, y: 0.5 });
        assert!(centre.x.abs() < 1e-6 && centre.y.abs() < 1e-6);

        // Left edge is −reach, top edge is +reach.
        let corner = sim.to_skeleton_space(SimInput { x: 0.0, y: 0.0 });
        assert!((corner.x + 0.4).abs() < 1e-6);
        assert!((corner.y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn sim_skeleton_is_tracked_with_hands_at_cursor() {
        let (_tx, rx) = mpsc::channel();
        let sim = SimSensor::new(rx, 0.4);
        let hand = SkeletonPoint::new(0.2, -0.1, 1.4);
        let s = sim.skeleton(hand);

        assert_eq!(s.state, TrackingState::Tracked);
        assert_eq!(s.joint(JointKind::HandLeft).position, hand);
        assert_eq!(s.joint(JointKind::HandRight).position, hand);
        assert_eq!(s.joint(JointKind::ElbowLeft).position.x, 0.0);
    }

    #[test]
    fn buffer_frame_yields_its_skeletons_once() {
        let mut f = BufferFrame::new(vec![Skeleton::untracked(3)]);
        assert_eq!(f.copy_skeletons().unwrap().len(), 1);
        assert!(f.copy_skeletons().unwrap().is_empty());
    }

    #[test]
    fn disconnected_replay_fails_enable() {
        let mut src = ReplaySource::disconnected();
        let err = src
            .enable(TrackingMode::Seated, SmoothingParams::default())
            .unwrap_err();
        assert!(matches!(err, SensorError::NoSensorAvailable));
    }

    #[test]
    fn replay_delivers_all_frames_then_hangs_up() {
        let src = ReplaySource::new(
            vec![vec![Skeleton::untracked(1)], vec![Skeleton::untracked(2)]],
            Duration::ZERO,
        );
        let (tx, rx) = mpsc::channel();
        Box::new(src).run(tx, Arc::new(AtomicBool::new(false)));

        let mut count = 0;
        while let Ok(evt) = rx.try_recv() {
            assert!(matches!(evt, FrameEvent::Skeleton(Some(_))));
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn stop_flag_halts_replay() {
        let src = ReplaySource::new(vec![vec![]; 100], Duration::ZERO);
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(true));
        Box::new(src).run(tx, stop);
        assert!(rx.try_recv().is_err());
    }
}
