//! # hue_light
//!
//! Drives a networked Hue bulb from detected gestures.
//!
//! * [`Color`] — sRGB color with the HSL hue/saturation split the
//!   bridge protocol wants.
//! * [`HueBridge`] — blocking HTTP client for the bridge's JSON state
//!   endpoint (one `PUT` per bulb), plus one-time user registration.
//! * [`LightSink`] — remembers the last color actually sent and turns
//!   repeated identical requests into no-ops.
//! * [`LightHandle`] — the sink on its own worker thread, so actuation
//!   I/O never runs on the detection path.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use hue_light::{BridgeConfig, Color, HueBridge, LightHandle, LightSink};
//!
//! let cfg = BridgeConfig::new("192.168.0.100", "wave-lamp");
//! let sink = LightSink::new(Box::new(HueBridge::new(cfg.clone())), cfg.bulbs);
//! let light = LightHandle::spawn(sink);
//!
//! light.set_color(Color::GREEN);
//! light.set_color(Color::GREEN); // deduplicated — nothing goes out
//! ```

pub mod color;
pub mod bridge;
pub mod sink;

pub use color::Color;
pub use bridge::{BridgeConfig, BridgeError, HueBridge, LightOut, LightState, NullOut};
pub use sink::{LightHandle, LightSink};
