//! Spring smoothing of render positions
//!
//! Render positions chase logical positions through a damped spring. They
//! exist for display only and never feed back into the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::segment::Segment;
use crate::config::BodyConfig;

/// How render positions follow logical positions this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothingMode {
    /// Normal spring
    Spring,
    /// Softened spring after a snap-back
    Snap,
    /// Render pinned to logical
    Freeze,
}

/// Snap and freeze windows armed by snap-back recovery
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderSmoother {
    snap_timer: f32,
    freeze_timer: f32,
}

impl RenderSmoother {
    /// Open the snap and freeze windows
    pub fn arm(&mut self, config: &BodyConfig) {
        self.snap_timer = config.snap_duration;
        self.freeze_timer = config.freeze_duration;
    }

    pub fn tick(&mut self, dt: f32) {
        self.snap_timer = (self.snap_timer - dt).max(0.0);
        self.freeze_timer = (self.freeze_timer - dt).max(0.0);
    }

    pub fn mode(&self) -> SmoothingMode {
        if self.freeze_timer > 0.0 {
            SmoothingMode::Freeze
        } else if self.snap_timer > 0.0 {
            SmoothingMode::Snap
        } else {
            SmoothingMode::Spring
        }
    }

    pub fn is_snapping(&self) -> bool {
        self.snap_timer > 0.0
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_timer > 0.0
    }

    /// Advance every segment's render position
    pub fn apply(&self, segments: &mut [Segment], dt: f32, config: &BodyConfig) {
        let mode = self.mode();
        for seg in segments {
            smooth_segment(seg, dt, mode, config);
        }
    }
}

/// One spring step for a single segment
pub fn smooth_segment(seg: &mut Segment, dt: f32, mode: SmoothingMode, config: &BodyConfig) {
    // Head follows instantly
    if seg.is_head || mode == SmoothingMode::Freeze {
        seg.snap_render();
        return;
    }

    let stiffness = match mode {
        SmoothingMode::Snap => config.spring_stiffness * config.snap_stiffness_factor,
        _ => config.spring_stiffness,
    };

    let gap = seg.pos - seg.render_pos;
    seg.render_vel += gap * stiffness * dt;
    seg.render_vel *= (1.0 - config.spring_damping * dt).max(0.0);

    // Cap the per-tick step so the tail can't whip past its target
    let max_step = Vec2::splat(config.max_render_step.abs());
    let step = (seg.render_vel * dt).max(-max_step).min(max_step);
    seg.render_pos += step;

    let remaining = seg.pos - seg.render_pos;
    if remaining.x.abs() < config.render_snap_epsilon
        && remaining.y.abs() < config.render_snap_epsilon
    {
        seg.snap_render();
    }
}
