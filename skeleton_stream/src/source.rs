//! The sensor boundary: frame-ready notifications and the source trait.
//!
//! Hardware acquisition is an external collaborator.  Anything that can
//! push [`FrameEvent`]s over a channel — a real depth sensor behind its
//! SDK, or the mouse-driven simulator in `kinect_lamp` — implements
//! [`SkeletonSource`].  Downstream code never learns which one it got.

use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::skeleton::Skeleton;

// ════════════════════════════════════════════════════════════════════════════
// Tracking configuration
// ════════════════════════════════════════════════════════════════════════════

/// Skeleton tracking mode requested at enable time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackingMode {
    Default,
    /// Upper body only; the mode used by this application.
    #[default]
    Seated,
}

/// Joint-smoothing tuning constants, passed through to the sensor
/// unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothingParams {
    pub smoothing:            f32,
    pub correction:           f32,
    pub prediction:           f32,
    pub jitter_radius:        f32,
    pub max_deviation_radius: f32,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        SmoothingParams {
            smoothing:            0.2,
            correction:           0.0,
            prediction:           0.0,
            jitter_radius:        0.6,
            max_deviation_radius: 0.5,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

/// Failure to bring a sensor up at session start.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// No connected sensor was found.  Surfaced to the caller of
    /// session start; never fatal to the process.
    #[error("no connected sensor available")]
    NoSensorAvailable,

    #[error("sensor rejected configuration: {0}")]
    Configuration(String),
}

/// Failure to read one frame's skeleton buffer.  Always transient: the
/// frame is skipped and the next notification proceeds.
#[derive(Debug, thiserror::Error)]
#[error("skeleton buffer unavailable: {0}")]
pub struct FrameError(pub String);

// ════════════════════════════════════════════════════════════════════════════
// Frame events
// ════════════════════════════════════════════════════════════════════════════

/// A color image for display.  Pass-through to the UI sink; the
/// pipeline itself never inspects pixels.
#[derive(Clone, Debug)]
pub struct ColorFrame {
    pub width:  usize,
    pub height: usize,
    /// ARGB, row major, `width * height` long.
    pub pixels: Vec<u32>,
}

/// Scoped access to one frame's skeleton buffer.
///
/// The underlying hardware buffer is held only while the guard is
/// alive and is released when it drops — on every exit path, including
/// a failed copy.
pub trait SkeletonFrame: Send {
    /// Copy the frame's skeletons into an owned vector.
    fn copy_skeletons(&mut self) -> Result<Vec<Skeleton>, FrameError>;
}

/// One raw frame-ready notification from the capture layer.
pub enum FrameEvent {
    /// A color image is ready.
    Color(ColorFrame),
    /// A skeleton buffer is ready.  `None` when the frame handle could
    /// not be opened — the adapter treats that as an empty buffer.
    Skeleton(Option<Box<dyn SkeletonFrame>>),
}

// ════════════════════════════════════════════════════════════════════════════
// SkeletonSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`FrameEvent`]s over a channel.
///
/// `enable` is called once per session before any frame is delivered;
/// it configures tracking mode and smoothing and reports
/// [`SensorError::NoSensorAvailable`] when nothing is connected.
/// `run` then delivers notifications on its own thread until the stop
/// flag is raised or the receiving end hangs up.  Sources must check
/// the flag between frames so a stopped session receives nothing
/// further.
pub trait SkeletonSource: Send + 'static {
    fn enable(&mut self, mode: TrackingMode, smoothing: SmoothingParams)
        -> Result<(), SensorError>;

    fn run(self: Box<Self>, tx: Sender<FrameEvent>, stop: Arc<AtomicBool>);
}
