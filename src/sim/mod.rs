//! Deterministic body simulation
//!
//! All body logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (head to tail, by insertion)
//! - No rendering or input dependencies

pub mod body;
pub mod combat;
pub mod group;
pub mod motion;
pub mod path;
pub mod placer;
pub mod recovery;
pub mod segment;
pub mod smoother;
pub mod tick;

pub use body::{BodyEvent, BoneSnake, Facing};
pub use combat::{Shot, ShotOutcome, resolve_shot};
pub use group::{GroupId, SegmentGroup};
pub use motion::{Direction, MotionController, MotionState};
pub use path::{PathHistory, Truncation};
pub use placer::{PathCursor, place_all, should_grow};
pub use recovery::{RecoveryReport, derive_motion, destroy_group};
pub use segment::{BodyPart, Segment, SegmentHandle, SegmentId, circle_overlap};
pub use smoother::{RenderSmoother, SmoothingMode};
pub use tick::update;
