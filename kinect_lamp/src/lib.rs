//! # kinect_lamp
//!
//! Wave-to-light controller: skeletal gestures from a motion sensor
//! drive on-screen feedback and a networked Hue bulb.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Detection | Action |
//! |---|---|---|
//! | Hand moves left of elbow | dead-zone + change-only signal | status shows "Left" |
//! | Hand moves right of elbow | dead-zone + change-only signal | status shows "Right" |
//! | ≥3 direction changes in 3 s | sliding hop window | status "... WAVE!", bulb set to the selected color |
//! | Hand over a color swatch | midpoint hit test | that color becomes the wave color |
//!
//! ## Modes
//!
//! The default build runs against the **simulation sensor**: the mouse
//! cursor stands in for the tracked hand, so crossing the window
//! midline back and forth is a wave.  Real hardware plugs in behind
//! [`skeleton_stream::SkeletonSource`]; nothing downstream can tell
//! the difference.
//!
//! ## Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse move | both hands follow the cursor |
//! | Cross the midline 3× within 3 s | wave |
//! | Hover a swatch | select its color |
//! | `Q` / `Escape` | quit |

pub mod sensor;
pub mod session;
pub mod visualizer;
pub mod app;
