//! Session coordinator — one sensor connection, one live pipeline.
//!
//! `Session` owns the whole subscription graph for a sensor session:
//! the sensor thread pushing raw frames, the dispatch thread running
//! adapter → extractor → detectors in arrival order, and the fan-out to
//! the UI channel and the light worker.  Teardown is the coordinator's
//! alone: [`Session::stop`] raises the shared stop flag so no further
//! frame can re-trigger the chain, without blocking on whatever frame
//! is currently in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use gesture_pipeline::{GestureEvent, GesturePipeline, PipelineConfig};
use hue_light::{Color, LightHandle};
use skeleton_stream::{
    ColorFrame, FrameAdapter, FrameEvent, JointKind, SensorError, SkeletonPoint, SkeletonSnapshot,
    SkeletonSource, SmoothingParams, TrackingMode,
};

// ════════════════════════════════════════════════════════════════════════════
// Screen-space geometry
// ════════════════════════════════════════════════════════════════════════════

/// Axis-aligned rectangle in normalized screen space (0..1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Midpoint-in-container test.
    pub fn contains(&self, (px, py): (f32, f32)) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// A colored UI target; hovering a hand over it selects its color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorTarget {
    pub rect:  Rect,
    pub color: Color,
}

/// Map a skeleton-space point into normalized screen space.
///
/// `reach` is the hand excursion mapped to the full axis — a small
/// scale factor so the user covers the screen without large movements,
/// like the original's 0.4 joint scaling.
pub fn scale_to_screen(p: SkeletonPoint, reach: f32) -> (f32, f32) {
    let nx = (p.x / reach + 1.0) / 2.0;
    let ny = (1.0 - p.y / reach) / 2.0;
    (nx.clamp(0.0, 1.0), ny.clamp(0.0, 1.0))
}

// ════════════════════════════════════════════════════════════════════════════
// Session configuration and events
// ════════════════════════════════════════════════════════════════════════════

/// Everything a session needs besides the source and the light.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub tracking_mode: TrackingMode,
    pub smoothing:     SmoothingParams,
    pub pipeline:      PipelineConfig,
    pub targets:       Vec<ColorTarget>,
    /// Hand reach mapped to the full screen axis.
    pub reach:         f32,
    /// Dispatch wake-up interval; bounds how late a wave-window
    /// evaluation can run when no frames arrive.
    pub tick:          Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            tracking_mode: TrackingMode::Seated,
            smoothing:     SmoothingParams::default(),
            pipeline:      PipelineConfig::default(),
            targets:       default_targets(),
            reach:         0.4,
            tick:          Duration::from_millis(100),
        }
    }
}

/// The four swatches along the window's right edge.
pub fn default_targets() -> Vec<ColorTarget> {
    let column = |i: usize, color| ColorTarget {
        rect: Rect::new(0.73, 0.05 + i as f32 * 0.20, 0.24, 0.15),
        color,
    };
    vec![
        column(0, Color::PINK),
        column(1, Color::ORANGE),
        column(2, Color::RED),
        column(3, Color::GREEN),
    ]
}

/// Events the session reports to the UI collaborator.
#[derive(Clone, Debug)]
pub enum UiEvent {
    /// Free-text status ("Left", "Right", "... WAVE!").
    Status(String),
    /// Latest camera image for display.
    ColorFrame(ColorFrame),
    /// Hand cursors in normalized screen space.
    Hands { left: (f32, f32), right: (f32, f32) },
    /// A swatch hover changed the wave color.
    ColorSelected(Color),
}

/// Why a session failed to start.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The sensor could not be brought up; the session remains
    /// NotStarted and start may be retried.
    #[error(transparent)]
    Sensor(#[from] SensorError),

    /// Contract violation: start on a running or stopped session.
    #[error("session already started")]
    AlreadyStarted,
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

/// Lifecycle of one sensor connection: NotStarted → Running → Stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Running,
    /// Terminal.
    Stopped,
}

pub struct Session {
    cfg:   SessionConfig,
    state: SessionState,
    stop:  Arc<AtomicBool>,
}

impl Session {
    pub fn new(cfg: SessionConfig) -> Self {
        Session {
            cfg,
            state: SessionState::NotStarted,
            stop:  Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Begin the session: enable the sensor, spawn the sensor and
    /// dispatch threads, and return the UI event stream.
    ///
    /// The only `NotStarted → Running` transition.  If the sensor
    /// cannot be enabled the error is returned and the session stays
    /// NotStarted, so a later retry with a healthy source is allowed.
    pub fn start(
        &mut self,
        mut source: Box<dyn SkeletonSource>,
        light: LightHandle,
    ) -> Result<Receiver<UiEvent>, SessionError> {
        if self.state != SessionState::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }

        source.enable(self.cfg.tracking_mode, self.cfg.smoothing)?;

        let (frame_tx, frame_rx) = mpsc::channel::<FrameEvent>();
        let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>();

        let sensor_stop = self.stop.clone();
        thread::Builder::new()
            .name("sensor".into())
            .spawn(move || source.run(frame_tx, sensor_stop))
            .expect("spawn sensor thread");

        let dispatch = Dispatch {
            pipeline: GesturePipeline::new(self.cfg.pipeline, Instant::now()),
            targets:  self.cfg.targets.clone(),
            reach:    self.cfg.reach,
            selected: None,
            ui_tx,
            light,
        };
        let dispatch_stop = self.stop.clone();
        let tick = self.cfg.tick;
        thread::Builder::new()
            .name("dispatch".into())
            .spawn(move || dispatch_loop(dispatch, frame_rx, dispatch_stop, tick))
            .expect("spawn dispatch thread");

        self.state = SessionState::Running;
        info!("session running");
        Ok(ui_rx)
    }

    /// Tear the session down.
    ///
    /// Idempotent, and a no-op unless Running.  Raises the stop flag so
    /// both threads wind down and no frame delivered after this call
    /// can re-trigger the detector chain; does not wait for an
    /// in-flight frame to finish.
    pub fn stop(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.stop.store(true, Ordering::SeqCst);
        self.state = SessionState::Stopped;
        info!("session stopped");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Dispatch — the serialized detector loop
// ════════════════════════════════════════════════════════════════════════════

struct Dispatch {
    pipeline: GesturePipeline,
    targets:  Vec<ColorTarget>,
    reach:    f32,
    selected: Option<Color>,
    ui_tx:    Sender<UiEvent>,
    light:    LightHandle,
}

/// Single consumer of the frame channel: every detector call happens
/// here, in arrival order, so the detectors never see reentrant input.
fn dispatch_loop(
    mut d: Dispatch,
    frame_rx: Receiver<FrameEvent>,
    stop: Arc<AtomicBool>,
    tick: Duration,
) {
    // Stays true until the sensor side hangs up.  Signals already
    // recorded may still complete a window after that, so the loop
    // keeps ticking until the session is stopped.
    let mut connected = true;

    loop {
        if stop.load(Ordering::SeqCst) {
            break;
        }

        if connected {
            match frame_rx.recv_timeout(tick) {
                Ok(event) => {
                    // A frame that raced the stop flag must not
                    // re-trigger the torn-down chain.
                    if stop.load(Ordering::SeqCst) {
                        break;
                    }
                    d.on_frame(event);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => connected = false,
            }
        } else {
            thread::sleep(tick);
        }

        for event in d.pipeline.poll(Instant::now()) {
            match event {
                GestureEvent::WaveDetected => d.on_wave(),
            }
        }
    }
    debug!("dispatch loop exited");
}

impl Dispatch {
    fn on_frame(&mut self, event: FrameEvent) {
        match event {
            FrameEvent::Color(frame) => {
                let _ = self.ui_tx.send(UiEvent::ColorFrame(frame));
            }
            FrameEvent::Skeleton(handle) => {
                if let Some(snap) = FrameAdapter::snapshot(handle, Instant::now()) {
                    self.on_snapshot(&snap);
                }
                // No tracked skeleton: the frame decayed upstream.
            }
        }
    }

    fn on_snapshot(&mut self, snap: &SkeletonSnapshot) {
        let left  = scale_to_screen(snap.joint(JointKind::HandLeft).position, self.reach);
        let right = scale_to_screen(snap.joint(JointKind::HandRight).position, self.reach);
        let _ = self.ui_tx.send(UiEvent::Hands { left, right });

        // Right hand over a swatch picks the wave color.
        let hit = self
            .targets
            .iter()
            .find(|t| t.rect.contains(right))
            .map(|t| t.color);
        if let Some(color) = hit {
            self.select_color(color);
        }

        if let Some(signal) = self.pipeline.on_snapshot(snap) {
            let _ = self
                .ui_tx
                .send(UiEvent::Status(signal.direction.as_str().to_string()));
        }
    }

    fn select_color(&mut self, color: Color) {
        if self.selected == Some(color) {
            return;
        }
        self.selected = Some(color);
        debug!("wave color selected: {:?}", color);
        let _ = self.ui_tx.send(UiEvent::ColorSelected(color));
    }

    fn on_wave(&mut self) {
        let _ = self.ui_tx.send(UiEvent::Status("... WAVE!".to_string()));
        if let Some(color) = self.selected {
            self.light.set_color(color);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::ReplaySource;
    use gesture_pipeline::WaveConfig;
    use hue_light::{LightHandle, LightSink, NullOut};
    use skeleton_stream::{Joint, Skeleton, TrackingState};

    fn null_light() -> LightHandle {
        LightHandle::spawn(LightSink::new(Box::new(NullOut), vec![]))
    }

    fn idle_source() -> Box<ReplaySource> {
        Box::new(ReplaySource::new(Vec::new(), Duration::ZERO))
    }

    /// Tracked skeleton with the left hand `dx` from the pinned elbow.
    fn swung(dx: f32) -> Vec<Skeleton> {
        let mut s = Skeleton::untracked(1);
        s.state = TrackingState::Tracked;
        s.set_joint(JointKind::ElbowLeft, Joint::tracked(SkeletonPoint::new(0.0, 0.0, 1.4)));
        s.set_joint(JointKind::HandLeft,  Joint::tracked(SkeletonPoint::new(dx, 0.1, 1.3)));
        s.set_joint(JointKind::HandRight, Joint::tracked(SkeletonPoint::new(dx, 0.1, 1.3)));
        vec![s]
    }

    #[test]
    fn stop_before_start_is_a_noop() {
        let mut session = Session::new(SessionConfig::default());
        session.stop();
        assert_eq!(session.state(), SessionState::NotStarted);
    }

    #[test]
    fn stop_twice_is_idempotent() {
        let mut session = Session::new(SessionConfig::default());
        session.start(idle_source(), null_light()).unwrap();
        session.stop();
        assert_eq!(session.state(), SessionState::Stopped);
        session.stop(); // second call: no action, no panic
        assert_eq!(session.state(), SessionState::Stopped);
    }

    #[test]
    fn start_without_sensor_fails_and_stays_not_started() {
        let mut session = Session::new(SessionConfig::default());
        let err = session
            .start(Box::new(ReplaySource::disconnected()), null_light())
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Sensor(SensorError::NoSensorAvailable)
        ));
        assert_eq!(session.state(), SessionState::NotStarted);

        // A healthy source can still be started afterwards.
        assert!(session.start(idle_source(), null_light()).is_ok());
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn double_start_is_rejected() {
        let mut session = Session::new(SessionConfig::default());
        session.start(idle_source(), null_light()).unwrap();
        let err = session.start(idle_source(), null_light()).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyStarted));

        session.stop();
        // Stopped is terminal: no restart.
        let err = session.start(idle_source(), null_light()).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyStarted));
    }

    #[test]
    fn rect_midpoint_containment() {
        let r = Rect::new(0.5, 0.5, 0.2, 0.2);
        assert!(r.contains((0.6, 0.6)));
        assert!(r.contains((0.5, 0.5))); // edges inclusive
        assert!(!r.contains((0.49, 0.6)));
        assert!(!r.contains((0.6, 0.71)));
    }

    #[test]
    fn scale_to_screen_maps_reach_to_edges() {
        let (x, y) = scale_to_screen(SkeletonPoint::new(0.0, 0.0, 1.0), 0.4);
        assert!((x - 0.5).abs() < 1e-6 && (y - 0.5).abs() < 1e-6);

        let (x, y) = scale_to_screen(SkeletonPoint::new(-0.4, 0.4, 1.0), 0.4);
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);

        // Beyond reach clamps to the screen edge.
        let (x, _) = scale_to_screen(SkeletonPoint::new(1.0, 0.0, 1.0), 0.4);
        assert_eq!(x, 1.0);
    }

    #[test]
    fn full_chain_emits_directions_and_wave() {
        // Shrink the wave window so the replayed burst fits it.
        let mut cfg = SessionConfig::default();
        cfg.pipeline.wave = WaveConfig {
            window:      Duration::from_millis(400),
            hop:         Duration::from_millis(50),
            min_signals: 3,
        };
        cfg.tick = Duration::from_millis(10);

        // Left, Right, Left well outside the dead-zone, plus an
        // untracked frame that must simply be skipped.
        let frames = vec![
            swung(-0.2),
            vec![Skeleton::untracked(9)],
            swung(0.2),
            swung(-0.2),
        ];
        let source = Box::new(ReplaySource::new(frames, Duration::from_millis(20)));

        let mut session = Session::new(cfg);
        let ui_rx = session.start(source, null_light()).unwrap();

        let mut statuses = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(3);
        while Instant::now() < deadline {
            match ui_rx.recv_timeout(Duration::from_millis(50)) {
                Ok(UiEvent::Status(s)) => {
                    let done = s == "... WAVE!";
                    statuses.push(s);
                    if done {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        assert_eq!(
            statuses,
            vec!["Left", "Right", "Left", "... WAVE!"],
            "unexpected status sequence",
        );
        session.stop();
    }
}
