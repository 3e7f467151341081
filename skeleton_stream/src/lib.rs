//! # skeleton_stream
//!
//! Skeletal-tracking snapshots as a push stream.
//!
//! A [`SkeletonSource`] delivers raw frame-ready notifications over an
//! `mpsc` channel; the [`FrameAdapter`] turns each notification into at
//! most one owned [`SkeletonSnapshot`], dropping frames that carry no
//! tracked skeleton.  Consumers never see the hardware: sources hide
//! behind the trait, and the frame buffer is only touched under a scoped
//! guard that releases it on every exit path.
//!
//! ```text
//! sensor thread                    pipeline thread
//! ┌──────────────┐   FrameEvent    ┌──────────────────┐
//! │ SkeletonSource│ ─────────────▶ │ FrameAdapter      │──▶ SkeletonSnapshot
//! │ (hw or sim)  │    (mpsc)       │ (copy + filter)   │    (tracked only)
//! └──────────────┘                 └──────────────────┘
//! ```
//!
//! Frames decay: a notification is consumed by exactly one adaptation
//! and never queued beyond the channel; snapshots are immutable and
//! owned by whichever pipeline step currently holds them.

pub mod joint;
pub mod skeleton;
pub mod source;
pub mod adapter;

pub use joint::{Joint, JointKind, JointState, SkeletonPoint, JOINT_COUNT};
pub use skeleton::{Skeleton, SkeletonSnapshot, TrackingState};
pub use source::{
    ColorFrame, FrameError, FrameEvent, SensorError, SkeletonFrame, SkeletonSource,
    SmoothingParams, TrackingMode,
};
pub use adapter::FrameAdapter;
