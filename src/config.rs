//! Body tuning and playfield bounds
//!
//! Loaded from JSON; any field left out keeps its default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Errors from loading or validating a [`BodyConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Static playfield size the body wanders across
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenBounds {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

impl ScreenBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal midpoint of the playfield
    #[inline]
    pub fn mid_x(&self) -> f32 {
        self.width * 0.5
    }
}

/// Tuning for the whole body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    // === Placement ===
    /// Arc length between consecutive segments
    pub spacing: f32,
    /// Minimum head travel before a new path sample is recorded
    pub min_sample_distance: f32,
    /// Unconsumed path length past the tail that admits a new segment
    pub spawn_buffer_distance: f32,

    // === Motion ===
    /// Head speed along the row (units/s)
    pub head_speed: f32,
    /// Vertical distance of one drop
    pub drop_step: f32,
    /// Drop speed as a multiple of head speed
    pub drop_speed_factor: f32,
    /// Distance from the screen edge at which a row ends
    pub edge_margin: f32,
    /// Head spawn point; its y is also the origin of the drop-row grid
    pub start: Vec2,

    // === Groups ===
    /// Members per group (the first group counts the head)
    pub group_member_cap: usize,
    /// HP of a freshly opened group
    pub group_base_hp: u32,
    /// Group flash duration after a hit (seconds)
    pub flash_duration: f32,
    /// Per-segment hit scale pulse
    pub hit_scale: f32,
    pub hit_scale_duration: f32,

    // === Render spring ===
    pub spring_stiffness: f32,
    pub spring_damping: f32,
    /// Stiffness multiplier while the snap window is armed
    pub snap_stiffness_factor: f32,
    /// Per-axis cap on render displacement per tick
    pub max_render_step: f32,
    /// Render gap below which the spring snaps onto the target
    pub render_snap_epsilon: f32,
    /// Reduced-stiffness window after a snap-back (seconds)
    pub snap_duration: f32,
    /// Render-pinned window after a snap-back (seconds)
    pub freeze_duration: f32,

    // === Collision shape ===
    pub segment_radius: f32,
    pub head_radius_scale: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            spacing: 25.0,
            min_sample_distance: 2.0,
            spawn_buffer_distance: 30.0,

            head_speed: 60.0,
            drop_step: 50.0,
            drop_speed_factor: 1.5,
            edge_margin: 60.0,
            start: Vec2::new(50.0, 50.0),

            group_member_cap: 5,
            group_base_hp: 20,
            flash_duration: 0.25,
            hit_scale: 1.15,
            hit_scale_duration: 0.1,

            spring_stiffness: 120.0,
            spring_damping: 4.0,
            snap_stiffness_factor: 0.4,
            max_render_step: 1.2,
            render_snap_epsilon: 0.5,
            snap_duration: 0.15,
            freeze_duration: 0.05,

            segment_radius: 20.0,
            head_radius_scale: 1.5,
        }
    }
}

impl BodyConfig {
    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a config file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded body config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default body config ({})", e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if v > 0.0 && v.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive",
                })
            }
        }

        positive("spacing", self.spacing)?;
        positive("min_sample_distance", self.min_sample_distance)?;
        positive("head_speed", self.head_speed)?;
        positive("drop_step", self.drop_step)?;
        positive("drop_speed_factor", self.drop_speed_factor)?;
        positive("spring_stiffness", self.spring_stiffness)?;
        positive("max_render_step", self.max_render_step)?;
        positive("segment_radius", self.segment_radius)?;

        if self.spring_damping < 0.0 || !self.spring_damping.is_finite() {
            return Err(ConfigError::Invalid {
                field: "spring_damping",
                reason: "must not be negative",
            });
        }
        if self.spawn_buffer_distance < self.spacing {
            return Err(ConfigError::Invalid {
                field: "spawn_buffer_distance",
                reason: "must be at least one spacing",
            });
        }
        if self.group_member_cap == 0 {
            return Err(ConfigError::Invalid {
                field: "group_member_cap",
                reason: "must hold at least one segment",
            });
        }
        if self.group_base_hp == 0 {
            return Err(ConfigError::Invalid {
                field: "group_base_hp",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    /// Validate against a concrete playfield
    pub fn validate_for(&self, bounds: &ScreenBounds) -> Result<(), ConfigError> {
        self.validate()?;
        if bounds.width <= self.edge_margin * 2.0 {
            return Err(ConfigError::Invalid {
                field: "edge_margin",
                reason: "leaves no room to move on this screen",
            });
        }
        Ok(())
    }

    /// Spawn buffer expressed in path samples (diagnostics only)
    pub fn spawn_buffer_points(&self) -> usize {
        (self.spawn_buffer_distance / self.min_sample_distance).ceil() as usize
    }

    /// Vertical drop speed
    #[inline]
    pub fn drop_speed(&self) -> f32 {
        self.head_speed * self.drop_speed_factor
    }

    /// Collision radius of the head
    #[inline]
    pub fn head_radius(&self) -> f32 {
        self.segment_radius * self.head_radius_scale
    }
}
