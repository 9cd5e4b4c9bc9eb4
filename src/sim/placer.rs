//! Arc-length placement of segments along the path history
//!
//! The head is pinned to the newest sample. Each following segment sits
//! exactly `spacing` further along the path than the one before it. A
//! single cursor walks the path for the whole body, so one placement pass
//! visits every sample at most once.

use glam::Vec2;

use super::path::PathHistory;
use super::segment::Segment;
use crate::lerp_point;

/// Position on the path: a point lying on the step from sample `index`
/// to sample `index + 1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathCursor {
    pub index: usize,
    pub point: Vec2,
    /// The cursor hit the oldest sample before covering the requested length
    pub exhausted: bool,
}

impl PathCursor {
    /// Cursor at the newest sample
    pub fn start(path: &PathHistory) -> Self {
        Self {
            index: 0,
            point: path.newest(),
            exhausted: false,
        }
    }

    /// Walk `distance` further along the path, toward older samples
    pub fn advance(&mut self, path: &PathHistory, distance: f32) {
        let mut remaining = distance;
        while remaining > 0.0 {
            let Some(next) = path.get(self.index + 1) else {
                self.point = path.oldest();
                self.exhausted = true;
                return;
            };
            let step = self.point.distance(next);
            if step >= remaining {
                self.point = lerp_point(self.point, next, remaining / step);
                return;
            }
            remaining -= step;
            self.point = next;
            self.index += 1;
        }
    }

    /// Whether more than `limit` of path remains behind the cursor
    pub fn remaining_exceeds(&self, path: &PathHistory, limit: f32) -> bool {
        let mut accumulated = 0.0;
        let mut prev = self.point;
        for p in path.iter().skip(self.index + 1) {
            accumulated += prev.distance(p);
            if accumulated > limit {
                return true;
            }
            prev = p;
        }
        false
    }
}

/// Place every segment along `path`. Returns the cursor left at the tail.
pub fn place_all(segments: &mut [Segment], path: &PathHistory, spacing: f32) -> PathCursor {
    let mut cursor = PathCursor::start(path);
    let Some((head, body)) = segments.split_first_mut() else {
        return cursor;
    };
    head.pos = cursor.point;

    for seg in body {
        cursor.advance(path, spacing);
        seg.pos = cursor.point;
    }
    cursor
}

/// A new tail segment fits once the path behind the tail is longer than
/// the spawn buffer
pub fn should_grow(tail: &PathCursor, path: &PathHistory, spawn_buffer: f32) -> bool {
    !tail.exhausted && tail.remaining_exceeds(path, spawn_buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn straight_path(length: f32, sample: f32) -> PathHistory {
        // From (0, 0) to (length, 0), newest at (length, 0)
        let mut path = PathHistory::new(Vec2::ZERO, sample);
        let steps = (length / sample).round() as usize;
        for i in 1..=steps {
            path.record_if_moved(Vec2::new(i as f32 * sample, 0.0));
        }
        path
    }

    fn body(count: usize) -> Vec<Segment> {
        (0..count)
            .map(|i| {
                if i == 0 {
                    Segment::new_head(i as u32, Vec2::ZERO, None, 30.0)
                } else {
                    Segment::new(i as u32, Vec2::ZERO, None, 20.0)
                }
            })
            .collect()
    }

    #[test]
    fn test_head_pinned_to_newest() {
        let path = straight_path(100.0, 2.0);
        let mut segments = body(1);
        place_all(&mut segments, &path, 25.0);
        assert_eq!(segments[0].pos, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_spacing_on_straight_line() {
        let path = straight_path(100.0, 2.0);
        let mut segments = body(5);
        let tail = place_all(&mut segments, &path, 25.0);
        for (i, seg) in segments.iter().enumerate() {
            let expected = 100.0 - i as f32 * 25.0;
            assert!((seg.pos.x - expected).abs() < 1e-3, "segment {i} at {}", seg.pos.x);
        }
        assert!(!tail.exhausted);
    }

    #[test]
    fn test_spacing_around_corner() {
        // Up 40 then right 40; newest at (40, 40)
        let mut path = PathHistory::new(Vec2::ZERO, 2.0);
        for i in 1..=20 {
            path.record_if_moved(Vec2::new(0.0, i as f32 * 2.0));
        }
        for i in 1..=20 {
            path.record_if_moved(Vec2::new(i as f32 * 2.0, 40.0));
        }
        let mut segments = body(4);
        place_all(&mut segments, &path, 25.0);
        for (i, seg) in segments.iter().enumerate() {
            let along = path.arclength_of(seg.pos);
            assert!((along - i as f32 * 25.0).abs() < 1e-2, "segment {i} at arc {along}");
        }
    }

    #[test]
    fn test_extra_segments_pile_at_oldest() {
        let path = straight_path(30.0, 2.0);
        let mut segments = body(4);
        let tail = place_all(&mut segments, &path, 25.0);
        assert!(tail.exhausted);
        assert_eq!(segments[2].pos, Vec2::ZERO);
        assert_eq!(segments[3].pos, Vec2::ZERO);
    }

    #[test]
    fn test_growth_needs_buffer() {
        let path = straight_path(50.0, 2.0);
        let mut segments = body(2);
        let tail = place_all(&mut segments, &path, 25.0);
        // 25 units remain behind the tail, buffer is 30
        assert!(!should_grow(&tail, &path, 30.0));

        let path = straight_path(60.0, 2.0);
        let tail = place_all(&mut segments, &path, 25.0);
        assert!(should_grow(&tail, &path, 30.0));
    }

    /// Grow a body from a lone head until the path has no room left
    fn grow_along(path: &PathHistory, spacing: f32, buffer: f32) -> Vec<Segment> {
        let mut segments = body(1);
        loop {
            let tail = place_all(&mut segments, path, spacing);
            if !should_grow(&tail, path, buffer) {
                return segments;
            }
            let id = segments.len() as u32;
            segments.push(Segment::new(id, tail.point, None, 20.0));
            assert!(segments.len() < 10_000);
        }
    }

    #[test]
    fn test_growth_fills_straight_path() {
        // 370 = 14 * 25 + 20, remainder under the 30 buffer
        let path = straight_path(370.0, 2.0);
        let segments = grow_along(&path, 25.0, 30.0);
        assert_eq!(segments.len(), 14 + 1);
        assert!(segments[14].pos.distance(Vec2::new(20.0, 0.0)) < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_straight_growth_count(
            half_length in 5u32..200,
            spacing in 5.0f32..60.0,
        ) {
            let length = half_length as f32 * 2.0;
            let buffer = spacing * 0.8;
            let remainder = length - (length / spacing).floor() * spacing;
            prop_assume!((remainder - buffer).abs() > 1e-2);
            prop_assume!(remainder > 1e-2 && spacing - remainder > 1e-2);

            let path = straight_path(length, 2.0);
            let segments = grow_along(&path, spacing, buffer);
            let full = (length / spacing).floor() as usize;
            // A remainder longer than the buffer makes room for one more,
            // which waits at the oldest sample
            let expected = if remainder > buffer { full + 1 } else { full };
            prop_assert_eq!(segments.len() - 1, expected);
        }

        #[test]
        fn prop_straight_resampling(
            length in 10.0f32..400.0,
            spacing in 5.0f32..60.0,
        ) {
            let sample = 2.0;
            let path = straight_path(length, sample);
            let actual_length = path.total_length();
            let full = (actual_length / spacing).floor() as usize;

            let mut segments = body(full + 1);
            place_all(&mut segments, &path, spacing);

            let head_x = path.newest().x;
            for (i, seg) in segments.iter().enumerate() {
                let ideal = head_x - i as f32 * spacing;
                prop_assert!(
                    (seg.pos.x - ideal).abs() < sample,
                    "segment {} at {} (ideal {})", i, seg.pos.x, ideal
                );
                prop_assert!(seg.pos.y.abs() < 1e-4);
            }
        }
    }
}
