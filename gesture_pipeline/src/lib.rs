//! # gesture_pipeline
//!
//! Turns the noisy per-frame joint stream into debounced gesture
//! signals:
//!
//! * [`DirectionalDetector`] — a ternary moved-left / moved-right /
//!   no-op signal from the horizontal displacement of the left hand
//!   relative to the left elbow, with a dead-zone and
//!   distinct-until-changed emission.
//! * [`WaveDetector`] — a "wave" whenever at least `min_signals`
//!   direction changes land inside a sliding time window, re-evaluated
//!   on a fixed hop.
//! * [`GesturePipeline`] — the two composed behind a single
//!   accept-input / optionally-produce-output surface.
//!
//! Every detector is a plain stateful transformer: no clocks of its
//! own, no I/O, no locks.  The caller owns the timeline and feeds
//! `Instant`s in arrival order; concurrent reentry is not supported and
//! is prevented by the session serializing calls.

pub mod direction;
pub mod wave;
pub mod pipeline;

pub use direction::{Direction, DirectionSignal, DirectionalDetector};
pub use wave::{GestureEvent, WaveConfig, WaveDetector};
pub use pipeline::{GesturePipeline, PipelineConfig};
