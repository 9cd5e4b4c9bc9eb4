//! Snap-back recovery after a group is destroyed
//!
//! The destroyed group's body segments leave the live list and the front
//! of the path is rewound by the arc length they occupied. Everything in
//! front of the gap is pulled back, so the head ends up where the first
//! surviving segment behind the gap used to follow. Motion state is then
//! re-derived from the direction of the path at the new head.

use glam::Vec2;

use super::body::{BodyEvent, BoneSnake};
use super::group::GroupId;
use super::motion::MotionState;
use super::path::{PathHistory, Truncation};
use super::placer;
use super::segment::SegmentId;
use crate::config::{BodyConfig, ScreenBounds};
use crate::consts::GEOM_EPSILON;

/// What a snap-back did
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryReport {
    pub group: GroupId,
    /// Body segments removed (the head is never among them)
    pub removed: Vec<SegmentId>,
    /// Arc length the path was rewound by
    pub rewind: f32,
    pub truncation: Truncation,
    /// Motion state after re-derivation
    pub state: MotionState,
    /// Group the head moved to, if it lost its own
    pub head_group: Option<GroupId>,
}

/// Motion state implied by the path at its newest sample.
///
/// The forward vector runs from the first older sample that is not on top
/// of the head. Returns `None` when the path is a single point.
pub fn derive_motion(
    path: &PathHistory,
    bounds: &ScreenBounds,
    config: &BodyConfig,
) -> Option<MotionState> {
    let head = path.newest();
    let behind = path
        .iter()
        .skip(1)
        .find(|p| p.distance(head) > GEOM_EPSILON)?;
    let forward: Vec2 = head - behind;
    Some(MotionState::derive(head, forward, bounds, config))
}

/// Destroy `group_id` and snap the body back over the gap.
///
/// Runs to completion in one call: removal, head reassignment, path rewind,
/// motion re-derivation, placement, render snap. Returns `None` if the
/// group does not exist.
pub fn destroy_group(body: &mut BoneSnake, group_id: GroupId) -> Option<RecoveryReport> {
    let index = body.groups.iter().position(|g| g.id == group_id)?;
    let group = body.groups.remove(index);

    // --- 1. Rewind length from body members only ---
    let removed: Vec<SegmentId> = group
        .members
        .iter()
        .copied()
        .filter(|&id| body.segment(id).is_some_and(|s| !s.is_head))
        .collect();
    let rewind = removed.len() as f32 * body.config.spacing;

    // --- 2. Drop members ---
    body.segments.retain(|s| !removed.contains(&s.id));
    if body.current_group == Some(group_id) {
        body.current_group = None;
    }

    // --- 3. Detach and reattach head ---
    let mut head_group = None;
    if let Some(head) = body.segments.first_mut().filter(|s| s.is_head) {
        if head.group == Some(group_id) {
            head.group = None;
            head_group = body.reattach_head();
        }
    }

    // --- 4. Rewind path ---
    let truncation = body.path.truncate_to_arclength(rewind);
    if truncation.exhausted {
        log::warn!(
            "Snap-back of {:.1} exceeds recorded path ({:.1}), head falls back to oldest sample",
            rewind,
            truncation.consumed
        );
    }

    // --- 5. Re-derive motion ---
    let previous = body.motion.state();
    let state = derive_motion(&body.path, &body.bounds, &body.config).unwrap_or(previous);
    body.motion.reset(truncation.head, state);
    body.prev_head = truncation.head;
    log::debug!(
        "Group {} destroyed: {} segments, rewind {:.1}, head {:?} -> {:?}",
        group_id,
        removed.len(),
        rewind,
        truncation.head,
        state
    );

    // --- 6. Place and snap visuals ---
    body.heal();
    placer::place_all(&mut body.segments, &body.path, body.config.spacing);
    for seg in &mut body.segments {
        seg.snap_render();
    }
    body.smoother.arm(&body.config);

    body.emit(BodyEvent::GroupDestroyed {
        group: group_id,
        removed: removed.len(),
        rewind,
    });
    if state != previous {
        body.emit(BodyEvent::MotionChanged { state });
    }

    Some(RecoveryReport {
        group: group_id,
        removed,
        rewind,
        truncation,
        state,
        head_group,
    })
}
