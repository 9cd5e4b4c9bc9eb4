//! Body controller state
//!
//! Owns the path history, the live segment list and the group table.
//! Segments and groups live in separate vectors and refer to each other
//! by id only.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::group::{GroupId, SegmentGroup};
use super::motion::{MotionController, MotionState};
use super::path::PathHistory;
use super::recovery::{self, RecoveryReport};
use super::segment::{Segment, SegmentHandle, SegmentId};
use super::smoother::RenderSmoother;
use super::tick;
use crate::config::{BodyConfig, ScreenBounds};
use crate::consts::MAX_PENDING_EVENTS;

/// Things that happened during a tick, for collaborators to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodyEvent {
    SegmentSpawned { id: SegmentId, group: GroupId },
    GroupOpened { group: GroupId },
    GroupDestroyed {
        group: GroupId,
        removed: usize,
        rewind: f32,
    },
    HeadReassigned { group: GroupId },
    MotionChanged { state: MotionState },
    /// A degenerate state was repaired
    Healed,
    /// Raised by `notify_hit`
    Hit,
}

/// 4-way head facing for sprite selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
    Up,
    Down,
}

impl Facing {
    /// Facing from a frame-to-frame displacement; `None` if it didn't move
    pub fn from_delta(delta: Vec2) -> Option<Self> {
        if delta.x.abs() > delta.y.abs() {
            Some(if delta.x > 0.0 {
                Facing::Right
            } else {
                Facing::Left
            })
        } else if delta.y > 0.0 {
            Some(Facing::Down)
        } else if delta.y < 0.0 {
            Some(Facing::Up)
        } else {
            None
        }
    }
}

/// The whole segmented creature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoneSnake {
    pub(crate) config: BodyConfig,
    pub(crate) bounds: ScreenBounds,
    pub(crate) motion: MotionController,
    pub(crate) path: PathHistory,
    /// Live segments, head first
    pub(crate) segments: Vec<Segment>,
    pub(crate) groups: Vec<SegmentGroup>,
    /// Group that receives newly spawned tail segments
    pub(crate) current_group: Option<GroupId>,
    pub(crate) smoother: RenderSmoother,
    pub(crate) facing: Facing,
    pub(crate) prev_head: Vec2,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    /// Pending events, oldest first
    #[serde(skip)]
    pub(crate) events: VecDeque<BodyEvent>,
    next_id: u32,
}

impl Default for BoneSnake {
    fn default() -> Self {
        Self::new(BodyConfig::default(), ScreenBounds::default())
    }
}

impl BoneSnake {
    /// Create a body with just a head at the configured start point
    pub fn new(config: BodyConfig, bounds: ScreenBounds) -> Self {
        let start = config.start;
        let mut body = Self {
            motion: MotionController::new(start),
            path: PathHistory::new(start, config.min_sample_distance),
            segments: Vec::new(),
            groups: Vec::new(),
            current_group: None,
            smoother: RenderSmoother::default(),
            facing: Facing::default(),
            prev_head: start,
            time_ticks: 0,
            events: VecDeque::new(),
            next_id: 1,
            config,
            bounds,
        };
        body.spawn_head(start);
        body.events.clear();
        body
    }

    /// Allocate a new entity ID (shared by segments and groups)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Advance the whole body one tick
    pub fn update(&mut self, dt: f32) {
        tick::update(self, dt);
    }

    /// Damage the segment `id`. Returns true if its group was destroyed.
    pub fn apply_damage(&mut self, id: SegmentId, amount: u32) -> bool {
        use super::segment::BodyPart;
        self.part_mut(id)
            .map(|mut part| part.take_damage(amount))
            .unwrap_or(false)
    }

    /// Called once a segment is confirmed destroyed. Runs snap-back
    /// recovery if the segment's group has no HP left.
    pub fn remove_entity(&mut self, id: SegmentId) -> bool {
        self.remove_segment(id).is_some()
    }

    /// Like [`remove_entity`](Self::remove_entity) but returns what recovery did
    pub fn remove_segment(&mut self, id: SegmentId) -> Option<RecoveryReport> {
        let group_id = self.segment(id)?.group?;
        if !self.group(group_id)?.is_destroyed() {
            return None;
        }
        recovery::destroy_group(self, group_id)
    }

    /// Hook for cross-cutting hit effects. Only records an event.
    pub fn notify_hit(&mut self) {
        self.emit(BodyEvent::Hit);
    }

    /// Take the events accumulated since the last drain
    pub fn drain_events(&mut self) -> Vec<BodyEvent> {
        self.events.drain(..).collect()
    }

    /// Queue an event. Bounded: an undrained queue drops its oldest entries.
    pub(crate) fn emit(&mut self, event: BodyEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    // === Queries ===

    /// Live segments, head first
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Damage-capable view of one segment
    pub fn part_mut(&mut self, id: SegmentId) -> Option<SegmentHandle<'_>> {
        let segment = self.segments.iter_mut().find(|s| s.id == id)?;
        let group = segment
            .group
            .and_then(|gid| self.groups.iter_mut().find(|g| g.id == gid));
        Some(SegmentHandle::new(segment, group, &self.config))
    }

    /// Ids of the segments a circle touches, head first
    pub fn parts_at(&self, point: Vec2, radius: f32) -> Vec<SegmentId> {
        self.segments
            .iter()
            .filter(|s| s.overlaps(point, radius))
            .map(|s| s.id)
            .collect()
    }

    /// Ticks simulated since creation
    pub fn ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn groups(&self) -> &[SegmentGroup] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&SegmentGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn current_group(&self) -> Option<GroupId> {
        self.current_group
    }

    pub fn path(&self) -> &PathHistory {
        &self.path
    }

    pub fn motion(&self) -> MotionState {
        self.motion.state()
    }

    /// Driving head position of the motion controller
    pub fn head_position(&self) -> Vec2 {
        self.motion.head()
    }

    pub fn head_facing(&self) -> Facing {
        self.facing
    }

    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    pub fn bounds(&self) -> &ScreenBounds {
        &self.bounds
    }

    pub fn is_snapping(&self) -> bool {
        self.smoother.is_snapping()
    }

    pub fn is_frozen(&self) -> bool {
        self.smoother.is_frozen()
    }

    // === Growth and repair ===

    /// Open a new empty group at full HP
    pub(crate) fn open_group(&mut self) -> GroupId {
        let id = self.next_entity_id();
        self.groups.push(SegmentGroup::new(id, self.config.group_base_hp));
        self.emit(BodyEvent::GroupOpened { group: id });
        id
    }

    fn group_mut(&mut self, id: GroupId) -> Option<&mut SegmentGroup> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    /// Create the head and a fresh group holding it
    pub(crate) fn spawn_head(&mut self, pos: Vec2) {
        let group = self.open_group();
        self.current_group = Some(group);
        let id = self.next_entity_id();
        let head = Segment::new_head(id, pos, Some(group), self.config.head_radius());
        if let Some(g) = self.group_mut(group) {
            g.add_member(id);
        }
        self.segments.insert(0, head);
    }

    /// Append a segment at the tail's current position, opening a new
    /// group if the current one is full or gone
    pub(crate) fn spawn_tail_segment(&mut self) -> SegmentId {
        let tail_pos = self
            .segments
            .last()
            .map(|s| s.pos)
            .unwrap_or(self.motion.head());

        let cap = self.config.group_member_cap;
        let open = self
            .current_group
            .and_then(|id| self.group(id))
            .filter(|g| !g.is_full(cap))
            .map(|g| g.id);
        let group = match open {
            Some(id) => id,
            None => self.open_group(),
        };
        self.current_group = Some(group);

        let id = self.next_entity_id();
        let segment = Segment::new(id, tail_pos, Some(group), self.config.segment_radius);
        if let Some(g) = self.group_mut(group) {
            g.add_member(id);
        }
        self.segments.push(segment);
        self.emit(BodyEvent::SegmentSpawned { id, group });
        id
    }

    /// Give a detached head a group: the first remaining one if it has
    /// room, otherwise a new one placed at the front of the group table
    pub(crate) fn reattach_head(&mut self) -> Option<GroupId> {
        let head = self.segments.first().filter(|s| s.is_head)?;
        if head.group.is_some_and(|g| self.group(g).is_some()) {
            return None;
        }
        let head_id = head.id;

        let cap = self.config.group_member_cap;
        let open = self
            .groups
            .first()
            .filter(|g| !g.is_full(cap))
            .map(|g| g.id);
        let group = match open {
            Some(id) => id,
            None => {
                let only_group = self.groups.is_empty();
                let id = self.open_group();
                if let Some(fresh) = self.groups.pop() {
                    self.groups.insert(0, fresh);
                }
                // Tail growth keeps its own group unless there is none
                if only_group {
                    self.current_group = Some(id);
                }
                id
            }
        };
        if let Some(g) = self.group_mut(group) {
            if !g.contains(head_id) {
                g.members.insert(0, head_id);
            }
        }
        if let Some(head) = self.segments.first_mut() {
            head.group = Some(group);
        }
        self.emit(BodyEvent::HeadReassigned { group });
        Some(group)
    }

    /// Repair an empty path or an empty body in place
    pub(crate) fn heal(&mut self) {
        if self.path.is_empty() {
            log::warn!("Path history empty, restarting at head");
            self.path.reset(self.motion.head());
            self.emit(BodyEvent::Healed);
        }
        if self.segments.is_empty() {
            log::warn!("Body has no segments, respawning head");
            let head = self.motion.head();
            self.groups.clear();
            self.spawn_head(head);
            if let Some(seg) = self.segments.first_mut() {
                seg.snap_render();
            }
            self.emit(BodyEvent::Healed);
        }
    }

    pub(crate) fn update_facing(&mut self) {
        let head = self.motion.head();
        if let Some(facing) = Facing::from_delta(head - self.prev_head) {
            self.facing = facing;
        }
        self.prev_head = head;
    }
}
