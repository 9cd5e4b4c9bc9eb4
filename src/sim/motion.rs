//! Head motion state machine
//!
//! The head sweeps a row horizontally, drops one step at the screen edge,
//! then sweeps back the other way (boustrophedon). State is held in one
//! [`MotionState`] value that is replaced wholesale on every transition.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{BodyConfig, ScreenBounds};

/// Horizontal sweep direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
}

impl Direction {
    /// Unit sign along x
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    /// Right for positive dx, Left otherwise
    pub fn from_dx(dx: f32) -> Self {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

/// Head motion state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionState {
    /// Sweeping a row
    Moving { direction: Direction },
    /// Dropping to `target_y`; `direction` is the sweep that just ended
    Dropping { direction: Direction, target_y: f32 },
}

impl Default for MotionState {
    fn default() -> Self {
        MotionState::Moving {
            direction: Direction::Right,
        }
    }
}

impl MotionState {
    pub fn direction(&self) -> Direction {
        match *self {
            MotionState::Moving { direction } | MotionState::Dropping { direction, .. } => {
                direction
            }
        }
    }

    pub fn is_dropping(&self) -> bool {
        matches!(self, MotionState::Dropping { .. })
    }

    /// Advance one tick from `head`. Pure: returns the new head position
    /// and the state to replace the current one with.
    pub fn step(
        self,
        head: Vec2,
        dt: f32,
        bounds: &ScreenBounds,
        config: &BodyConfig,
    ) -> (Vec2, MotionState) {
        match self {
            MotionState::Moving { direction } => {
                let mut head = head;
                head.x += config.head_speed * direction.sign() * dt;

                let past_edge = match direction {
                    Direction::Right => head.x > bounds.width - config.edge_margin,
                    Direction::Left => head.x < config.edge_margin,
                };
                if past_edge {
                    let target_y = head.y + config.drop_step;
                    (head, MotionState::Dropping { direction, target_y })
                } else {
                    (head, self)
                }
            }
            MotionState::Dropping {
                direction,
                target_y,
            } => {
                let mut head = head;
                head.y += config.drop_speed() * dt;
                if head.y >= target_y {
                    head.y = target_y;
                    (
                        head,
                        MotionState::Moving {
                            direction: direction.reversed(),
                        },
                    )
                } else {
                    (head, self)
                }
            }
        }
    }

    /// Infer the state the head must be in from the local path direction.
    ///
    /// `forward` points from the next-oldest path sample to the head. A
    /// mostly vertical vector means the head is mid-drop: the target is the
    /// next drop-row boundary below the head, and the sweep direction is
    /// whichever edge the head is nearer to. Otherwise the head is
    /// sweeping in the sign of the horizontal component.
    pub fn derive(
        head: Vec2,
        forward: Vec2,
        bounds: &ScreenBounds,
        config: &BodyConfig,
    ) -> MotionState {
        if forward.y.abs() > forward.x.abs() {
            let origin_y = config.start.y;
            let row = ((head.y - origin_y) / config.drop_step).floor();
            let target_y = origin_y + (row + 1.0) * config.drop_step;
            let direction = if head.x > bounds.mid_x() {
                Direction::Right
            } else {
                Direction::Left
            };
            MotionState::Dropping {
                direction,
                target_y,
            }
        } else {
            MotionState::Moving {
                direction: Direction::from_dx(forward.x),
            }
        }
    }
}

/// Owns the driving head position and its motion state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionController {
    head: Vec2,
    state: MotionState,
}

impl MotionController {
    pub fn new(start: Vec2) -> Self {
        Self {
            head: start,
            state: MotionState::default(),
        }
    }

    /// Advance the head one tick. Returns the new state if it changed.
    pub fn advance(
        &mut self,
        dt: f32,
        bounds: &ScreenBounds,
        config: &BodyConfig,
    ) -> Option<MotionState> {
        let (head, state) = self.state.step(self.head, dt, bounds, config);
        self.head = head;
        let changed = state != self.state;
        self.state = state;
        changed.then_some(state)
    }

    /// Replace head position and state (after a snap-back)
    pub fn reset(&mut self, head: Vec2, state: MotionState) {
        self.head = head;
        self.state = state;
    }

    /// Move the head without touching the state
    pub fn set_head(&mut self, head: Vec2) {
        self.head = head;
    }

    pub fn head(&self) -> Vec2 {
        self.head
    }

    pub fn state(&self) -> MotionState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_row_end_starts_drop_then_reverses() {
        let config = BodyConfig::default();
        let bounds = ScreenBounds::new(480.0, 800.0);
        let mut motion = MotionController::new(Vec2::new(50.0, 50.0));

        // Sweep right until the edge trips
        let mut ticks = 0;
        while !motion.state().is_dropping() {
            motion.advance(DT, &bounds, &config);
            ticks += 1;
            assert!(ticks < 10_000, "never reached the right edge");
        }
        assert!(motion.head().x > 420.0);
        assert_eq!(
            motion.state(),
            MotionState::Dropping {
                direction: Direction::Right,
                target_y: 100.0
            }
        );

        // Drop until the target row is reached
        while motion.state().is_dropping() {
            motion.advance(DT, &bounds, &config);
            ticks += 1;
            assert!(ticks < 10_000, "never finished dropping");
        }
        assert_eq!(motion.head().y, 100.0);
        assert_eq!(
            motion.state(),
            MotionState::Moving {
                direction: Direction::Left
            }
        );
    }

    #[test]
    fn test_drop_speed_is_faster() {
        let config = BodyConfig::default();
        let bounds = ScreenBounds::default();
        let state = MotionState::Dropping {
            direction: Direction::Left,
            target_y: 500.0,
        };
        let (head, next) = state.step(Vec2::new(100.0, 100.0), 1.0, &bounds, &config);
        assert_eq!(head, Vec2::new(100.0, 190.0));
        assert_eq!(next, state);
    }

    #[test]
    fn test_left_edge_trips_drop() {
        let config = BodyConfig::default();
        let bounds = ScreenBounds::default();
        let state = MotionState::Moving {
            direction: Direction::Left,
        };
        let (head, next) = state.step(Vec2::new(60.5, 100.0), DT, &bounds, &config);
        assert!(head.x < 60.0);
        assert_eq!(
            next,
            MotionState::Dropping {
                direction: Direction::Left,
                target_y: 150.0
            }
        );
    }

    #[test]
    fn test_derive_horizontal() {
        let config = BodyConfig::default();
        let bounds = ScreenBounds::default();
        let state = MotionState::derive(
            Vec2::new(200.0, 100.0),
            Vec2::new(-2.0, 0.1),
            &bounds,
            &config,
        );
        assert_eq!(
            state,
            MotionState::Moving {
                direction: Direction::Left
            }
        );
    }

    #[test]
    fn test_derive_vertical_rounds_to_next_row() {
        let config = BodyConfig::default();
        let bounds = ScreenBounds::default();
        // Right side of the screen, mid-drop between rows 100 and 150
        let state = MotionState::derive(
            Vec2::new(430.0, 120.0),
            Vec2::new(0.0, 2.0),
            &bounds,
            &config,
        );
        assert_eq!(
            state,
            MotionState::Dropping {
                direction: Direction::Right,
                target_y: 150.0
            }
        );

        let state = MotionState::derive(
            Vec2::new(40.0, 60.0),
            Vec2::new(0.0, 2.0),
            &bounds,
            &config,
        );
        assert_eq!(
            state,
            MotionState::Dropping {
                direction: Direction::Left,
                target_y: 100.0
            }
        );
    }
}
