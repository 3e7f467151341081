//! Named skeletal joints and their 3D positions.
//!
//! The joint set is the fixed seated-mode upper body: head, shoulders,
//! elbows, wrists and hands.  [`JointKind`] doubles as an array index,
//! so looking a joint up in a skeleton can never fail at runtime —
//! there is no name string to mistype.

// ════════════════════════════════════════════════════════════════════════════
// SkeletonPoint
// ════════════════════════════════════════════════════════════════════════════

/// A position in normalized skeleton space.
///
/// The horizontal axis grows to the user's right as seen by the sensor;
/// units are the sensor's own normalized metres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkeletonPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl SkeletonPoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        SkeletonPoint { x, y, z }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JointKind
// ════════════════════════════════════════════════════════════════════════════

/// Number of joints tracked per skeleton.
pub const JOINT_COUNT: usize = 10;

/// The seated-mode upper-body joint set.
///
/// Discriminants are contiguous from zero; [`JointKind::index`] is the
/// slot of the joint inside [`crate::Skeleton::joints`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointKind {
    Head           = 0,
    ShoulderCenter = 1,
    ShoulderLeft   = 2,
    ShoulderRight  = 3,
    ElbowLeft      = 4,
    ElbowRight     = 5,
    WristLeft      = 6,
    WristRight     = 7,
    HandLeft       = 8,
    HandRight      = 9,
}

impl JointKind {
    /// Array slot of this joint inside a skeleton's joint table.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// All joints, in table order.
    pub const ALL: [JointKind; JOINT_COUNT] = [
        JointKind::Head,
        JointKind::ShoulderCenter,
        JointKind::ShoulderLeft,
        JointKind::ShoulderRight,
        JointKind::ElbowLeft,
        JointKind::ElbowRight,
        JointKind::WristLeft,
        JointKind::WristRight,
        JointKind::HandLeft,
        JointKind::HandRight,
    ];
}

// ════════════════════════════════════════════════════════════════════════════
// JointState / Joint
// ════════════════════════════════════════════════════════════════════════════

/// Per-joint tracking confidence reported by the sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JointState {
    /// Position observed directly.
    Tracked,
    /// Position inferred from neighbouring joints.
    Inferred,
    /// No usable position this frame.
    #[default]
    NotTracked,
}

/// One named skeletal point with its position and confidence.
///
/// A `Joint` is a read-only row of its parent skeleton and never
/// outlives the snapshot it was copied from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Joint {
    pub position: SkeletonPoint,
    pub state:    JointState,
}

impl Joint {
    pub const fn tracked(position: SkeletonPoint) -> Self {
        Joint { position, state: JointState::Tracked }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
