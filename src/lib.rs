//! Bone Snake - a destructible segmented creature body
//!
//! Core modules:
//! - `sim`: Deterministic body simulation (path history, segment placement,
//!   destructible groups, snap-back recovery, render smoothing)
//! - `config`: Data-driven body tuning and screen bounds

pub mod config;
pub mod sim;

pub use config::{BodyConfig, ConfigError, ScreenBounds};
pub use sim::{BodyEvent, BodyPart, BoneSnake};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the body's tuning rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default playfield dimensions
    pub const SCREEN_WIDTH: f32 = 480.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Undrained body events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 1024;

    /// Tolerance for float comparisons on path geometry
    pub const GEOM_EPSILON: f32 = 1e-4;
}

/// Linear interpolation between two points
#[inline]
pub fn lerp_point(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}
