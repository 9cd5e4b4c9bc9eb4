//! Path history recorded by the head
//!
//! Points are stored newest first: index 0 is the most recent head sample,
//! higher indices walk back toward the spawn point. Body segments are laid
//! out along this curve by arc length.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::lerp_point;

/// Result of rewinding the path by an arc length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Truncation {
    /// New newest point (the new logical head position)
    pub head: Vec2,
    /// Arc length actually removed from the front
    pub consumed: f32,
    /// The requested length exceeded the recorded history
    pub exhausted: bool,
}

/// Newest-first buffer of head positions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathHistory {
    points: VecDeque<Vec2>,
    min_sample_distance: f32,
}

impl PathHistory {
    /// Start a history holding a single point
    pub fn new(origin: Vec2, min_sample_distance: f32) -> Self {
        let mut points = VecDeque::with_capacity(256);
        points.push_front(origin);
        Self {
            points,
            min_sample_distance,
        }
    }

    /// Record `point` if the head moved at least the sampling distance
    /// since the newest sample. Returns true if a sample was added.
    pub fn record_if_moved(&mut self, point: Vec2) -> bool {
        match self.points.front() {
            Some(newest) if newest.distance(point) < self.min_sample_distance => false,
            _ => {
                self.points.push_front(point);
                true
            }
        }
    }

    /// Rewind the front of the path by `target_length` of arc length.
    ///
    /// The prefix up to the cut is replaced by one interpolated point, which
    /// becomes the new newest sample. If the history is shorter than
    /// `target_length`, the path collapses to its oldest point.
    pub fn truncate_to_arclength(&mut self, target_length: f32) -> Truncation {
        let Some(&newest) = self.points.front() else {
            return Truncation {
                head: Vec2::ZERO,
                consumed: 0.0,
                exhausted: true,
            };
        };
        if target_length <= 0.0 {
            return Truncation {
                head: newest,
                consumed: 0.0,
                exhausted: false,
            };
        }

        let mut accumulated = 0.0;
        for i in 0..self.points.len() - 1 {
            let p1 = self.points[i];
            let p2 = self.points[i + 1];
            let dist = p1.distance(p2);

            if accumulated + dist >= target_length {
                let ratio = if dist > 0.0 {
                    (target_length - accumulated) / dist
                } else {
                    0.0
                };
                let cut = lerp_point(p1, p2, ratio);

                self.points.drain(..=i);
                self.points.push_front(cut);
                return Truncation {
                    head: cut,
                    consumed: target_length,
                    exhausted: false,
                };
            }
            accumulated += dist;
        }

        // Ran out of history: keep only the oldest point
        let oldest = self.oldest();
        self.points.clear();
        self.points.push_front(oldest);
        Truncation {
            head: oldest,
            consumed: accumulated,
            exhausted: true,
        }
    }

    /// Discard everything and restart from `point`
    pub fn reset(&mut self, point: Vec2) {
        self.points.clear();
        self.points.push_front(point);
    }

    /// Most recent sample
    pub fn newest(&self) -> Vec2 {
        self.points.front().copied().unwrap_or(Vec2::ZERO)
    }

    /// Oldest sample (the spawn end of the path)
    pub fn oldest(&self) -> Vec2 {
        self.points.back().copied().unwrap_or(Vec2::ZERO)
    }

    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }

    pub fn min_sample_distance(&self) -> f32 {
        self.min_sample_distance
    }

    /// Total arc length from newest to oldest sample
    pub fn total_length(&self) -> f32 {
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .map(|(a, b)| a.distance(*b))
            .sum()
    }

    /// Arc length from sample `index` to the oldest sample
    pub fn length_from(&self, index: usize) -> f32 {
        self.points
            .iter()
            .skip(index)
            .zip(self.points.iter().skip(index + 1))
            .map(|(a, b)| a.distance(*b))
            .sum()
    }

    /// Point at `distance` along the path measured from the newest sample.
    /// Clamped to the path ends.
    pub fn point_at(&self, distance: f32) -> Vec2 {
        if distance <= 0.0 {
            return self.newest();
        }
        let mut accumulated = 0.0;
        for (a, b) in self.points.iter().zip(self.points.iter().skip(1)) {
            let dist = a.distance(*b);
            if accumulated + dist >= distance {
                let ratio = if dist > 0.0 {
                    (distance - accumulated) / dist
                } else {
                    0.0
                };
                return lerp_point(*a, *b, ratio);
            }
            accumulated += dist;
        }
        self.oldest()
    }

    /// Arc length from the newest sample to `point`, found by projecting
    /// onto the closest path step. Used for diagnostics and tests.
    pub fn arclength_of(&self, point: Vec2) -> f32 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let mut best = (f32::MAX, 0.0);
        let mut accumulated = 0.0;
        for (a, b) in self.points.iter().zip(self.points.iter().skip(1)) {
            let step = *b - *a;
            let len_sq = step.length_squared();
            let t = if len_sq > 0.0 {
                ((point - *a).dot(step) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dist = point.distance(*a + step * t);
            let len = len_sq.sqrt();
            if dist < best.0 {
                best = (dist, accumulated + len * t);
            }
            accumulated += len;
        }
        best.1
    }
}
