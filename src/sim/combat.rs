//! Hit resolution against the body
//!
//! Collision code only sees body parts through [`BodyPart`]: position and
//! radius for the overlap test, `take_damage` for the hit. A shot hits at
//! most one part, the first one it touches going from head to tail.

use glam::Vec2;

use super::body::BoneSnake;
use super::recovery::RecoveryReport;
use super::segment::{BodyPart, SegmentId, circle_overlap};

/// A circular hit probe (projectile, blast)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    pub radius: f32,
    pub damage: u32,
}

/// Result of a shot that connected
#[derive(Debug, Clone, PartialEq)]
pub struct ShotOutcome {
    pub segment: SegmentId,
    pub destroyed: bool,
    /// Snap-back performed if the hit destroyed a group
    pub recovery: Option<RecoveryReport>,
}

/// Test `shot` against the body and apply it to the first part it touches
pub fn resolve_shot(body: &mut BoneSnake, shot: &Shot) -> Option<ShotOutcome> {
    let ids: Vec<SegmentId> = body.segments().iter().map(|s| s.id).collect();

    for id in ids {
        let Some(mut part) = body.part_mut(id) else {
            continue;
        };
        if !circle_overlap(part.position(), part.radius(), shot.pos, shot.radius) {
            continue;
        }

        let destroyed = part.take_damage(shot.damage);
        body.notify_hit();
        let recovery = if destroyed {
            body.remove_segment(id)
        } else {
            None
        };
        return Some(ShotOutcome {
            segment: id,
            destroyed,
            recovery,
        });
    }
    None
}
