//! Destructible segment groups
//!
//! A group is a run of consecutive segments sharing one HP pool. Groups
//! reference their members by segment id; segments point back by group id.

use serde::{Deserialize, Serialize};

use super::segment::SegmentId;

pub type GroupId = u32;

/// A cluster of segments destroyed together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentGroup {
    pub id: GroupId,
    pub hp: u32,
    pub max_hp: u32,
    /// Seconds of hit flash remaining
    pub flash_timer: f32,
    /// Member segments in head-to-tail order
    pub members: Vec<SegmentId>,
}

impl SegmentGroup {
    pub fn new(id: GroupId, hp: u32) -> Self {
        Self {
            id,
            hp,
            max_hp: hp,
            flash_timer: 0.0,
            members: Vec::new(),
        }
    }

    pub fn add_member(&mut self, segment: SegmentId) {
        if !self.members.contains(&segment) {
            self.members.push(segment);
        }
    }

    pub fn remove_member(&mut self, segment: SegmentId) {
        self.members.retain(|&m| m != segment);
    }

    pub fn contains(&self, segment: SegmentId) -> bool {
        self.members.contains(&segment)
    }

    /// Whether the group has reached `cap` members
    pub fn is_full(&self, cap: usize) -> bool {
        self.members.len() >= cap
    }

    /// Apply damage to the shared pool and start the flash.
    /// Returns true once HP is gone.
    pub fn take_damage(&mut self, amount: u32, flash_duration: f32) -> bool {
        self.hp = self.hp.saturating_sub(amount);
        self.flash_timer = flash_duration;
        self.is_destroyed()
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_timer > 0.0
    }

    pub fn is_damaged(&self) -> bool {
        self.hp < self.max_hp
    }

    /// Member at the middle of the group, where HP is displayed
    pub fn display_anchor(&self) -> Option<SegmentId> {
        self.members.get(self.members.len() / 2).copied()
    }

    /// Decay timers
    pub fn tick(&mut self, dt: f32) {
        if self.flash_timer > 0.0 {
            self.flash_timer = (self.flash_timer - dt).max(0.0);
        }
    }
}
