//! Body segments and the part interface exposed to collision code

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::group::{GroupId, SegmentGroup};
use crate::config::BodyConfig;

pub type SegmentId = u32;

/// Uniform interface every body part offers to collision collaborators
pub trait BodyPart {
    /// Logical position (game-state authoritative)
    fn position(&self) -> Vec2;
    /// Collision radius
    fn radius(&self) -> f32;
    /// The head is indestructible
    fn is_head(&self) -> bool;
    /// Apply damage; returns true if the part's group was destroyed
    fn take_damage(&mut self, amount: u32) -> bool;
}

/// One body segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    /// Logical position on the path
    pub pos: Vec2,
    /// Smoothed position for display only
    pub render_pos: Vec2,
    pub render_vel: Vec2,
    /// Owning group; `None` only while the head is being reassigned
    pub group: Option<GroupId>,
    pub is_head: bool,
    pub radius: f32,
    /// Hit pulse (1.0 = rest size)
    pub hit_scale: f32,
    pub hit_timer: f32,
}

impl Segment {
    pub fn new(id: SegmentId, pos: Vec2, group: Option<GroupId>, radius: f32) -> Self {
        Self {
            id,
            pos,
            render_pos: pos,
            render_vel: Vec2::ZERO,
            group,
            is_head: false,
            radius,
            hit_scale: 1.0,
            hit_timer: 0.0,
        }
    }

    pub fn new_head(id: SegmentId, pos: Vec2, group: Option<GroupId>, radius: f32) -> Self {
        Self {
            is_head: true,
            ..Self::new(id, pos, group, radius)
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_head(&self) -> bool {
        self.is_head
    }

    /// Pin the render position to the logical one
    pub fn snap_render(&mut self) {
        self.render_pos = self.pos;
        self.render_vel = Vec2::ZERO;
    }

    /// Start the hit pulse
    pub fn trigger_hit(&mut self, scale: f32, duration: f32) {
        self.hit_scale = scale;
        self.hit_timer = duration;
    }

    /// Decay the hit pulse
    pub fn tick_feedback(&mut self, dt: f32) {
        if self.hit_timer > 0.0 {
            self.hit_timer -= dt;
            if self.hit_timer <= 0.0 {
                self.hit_timer = 0.0;
                self.hit_scale = 1.0;
            }
        }
    }

    /// Whether a circle at `point` with `radius` touches this segment
    pub fn overlaps(&self, point: Vec2, radius: f32) -> bool {
        circle_overlap(self.pos, self.radius, point, radius)
    }
}

/// Circle-circle overlap test
#[inline]
pub fn circle_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Mutable view of a segment together with its group, handed to
/// collaborators so damage flows through one entry point.
#[derive(Debug)]
pub struct SegmentHandle<'a> {
    segment: &'a mut Segment,
    group: Option<&'a mut SegmentGroup>,
    config: &'a BodyConfig,
}

impl<'a> SegmentHandle<'a> {
    pub(crate) fn new(
        segment: &'a mut Segment,
        group: Option<&'a mut SegmentGroup>,
        config: &'a BodyConfig,
    ) -> Self {
        Self {
            segment,
            group,
            config,
        }
    }

    pub fn id(&self) -> SegmentId {
        self.segment.id
    }

    pub fn group(&self) -> Option<GroupId> {
        self.segment.group
    }
}

impl BodyPart for SegmentHandle<'_> {
    fn position(&self) -> Vec2 {
        self.segment.pos
    }

    fn radius(&self) -> f32 {
        self.segment.radius
    }

    fn is_head(&self) -> bool {
        self.segment.is_head
    }

    fn take_damage(&mut self, amount: u32) -> bool {
        self.segment
            .trigger_hit(self.config.hit_scale, self.config.hit_scale_duration);
        if self.segment.is_head {
            return false;
        }
        match self.group.as_deref_mut() {
            Some(group) => group.take_damage(amount, self.config.flash_duration),
            None => false,
        }
    }
}
