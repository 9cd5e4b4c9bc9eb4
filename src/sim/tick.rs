//! Fixed timestep body tick
//!
//! Advances the body in a strict order: head motion, path sampling,
//! segment placement and growth, timers, render smoothing. Placement reads
//! the freshly recorded path and smoothing reads the freshly placed
//! logical positions.

use super::body::{BodyEvent, BoneSnake};
use super::placer;

/// Advance the body by one fixed timestep
pub fn update(body: &mut BoneSnake, dt: f32) {
    body.heal();
    body.time_ticks += 1;

    // --- 1. Move head ---
    if let Some(state) = body.motion.advance(dt, &body.bounds, &body.config) {
        log::debug!("Head motion -> {:?} at {:?}", state, body.motion.head());
        body.emit(BodyEvent::MotionChanged { state });
    }

    // --- 2. Sample path ---
    body.path.record_if_moved(body.motion.head());

    // --- 3. Place segments, grow tail ---
    let tail = placer::place_all(&mut body.segments, &body.path, body.config.spacing);
    if placer::should_grow(&tail, &body.path, body.config.spawn_buffer_distance) {
        body.spawn_tail_segment();
    }

    // --- 4. Timers ---
    for group in &mut body.groups {
        group.tick(dt);
    }
    for seg in &mut body.segments {
        seg.tick_feedback(dt);
    }
    body.smoother.tick(dt);
    body.update_facing();

    // --- 5. Render smoothing ---
    body.smoother.apply(&mut body.segments, dt, &body.config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BodyConfig, ScreenBounds};
    use crate::consts::SIM_DT;
    use crate::sim::{Direction, Facing, MotionState};

    /// Arc offsets of every segment along the current path
    fn arc_offsets(body: &BoneSnake) -> Vec<f32> {
        body.segments()
            .iter()
            .map(|s| body.path().arclength_of(s.pos))
            .collect()
    }

    #[test]
    fn test_newest_sample_is_head() {
        let mut body = BoneSnake::default();
        for _ in 0..600 {
            body.update(SIM_DT);
            assert_eq!(body.path().newest(), body.segments()[0].pos);
            assert!(
                body.path().newest().distance(body.head_position())
                    < body.config().min_sample_distance
            );
        }
    }

    #[test]
    fn test_body_grows_with_spacing() {
        let mut body = BoneSnake::default();
        for _ in 0..1200 {
            body.update(SIM_DT);
        }
        let count = body.segments().len();
        assert!(count > 20, "only {count} segments after 20s");

        let spacing = body.config().spacing;
        let offsets = arc_offsets(&body);
        // The newest tail segment may still sit on its parent for a tick
        for pair in offsets[..count - 1].windows(2) {
            let gap = pair[1] - pair[0];
            assert!(
                (gap - spacing).abs() < body.config().min_sample_distance,
                "gap {gap} between consecutive segments"
            );
        }
    }

    fn assert_group_membership(body: &BoneSnake) {
        let cap = body.config().group_member_cap;
        for group in body.groups() {
            assert!(group.members.len() <= cap, "group {} over cap", group.id);
        }
        // Every segment belongs to exactly one group
        for seg in body.segments() {
            let owners = body
                .groups()
                .iter()
                .filter(|g| g.contains(seg.id))
                .count();
            assert_eq!(owners, 1);
            assert!(body.group(seg.group.unwrap()).unwrap().contains(seg.id));
        }
    }

    #[test]
    fn test_groups_respect_cap() {
        let mut body = BoneSnake::default();
        for _ in 0..1200 {
            body.update(SIM_DT);
        }
        assert_group_membership(&body);
    }

    #[test]
    fn test_groups_respect_cap_after_head_group_destroyed() {
        let mut body = BoneSnake::default();
        for _ in 0..900 {
            body.update(SIM_DT);
        }
        let head_group = body.segments()[0].group.unwrap();
        let member = body.segments()[1].id;
        assert_eq!(body.segments()[1].group, Some(head_group));
        assert!(body.apply_damage(member, 1000));
        let report = body.remove_segment(member).unwrap();

        let new_group = report.head_group.unwrap();
        assert_ne!(new_group, head_group);
        assert_group_membership(&body);

        for _ in 0..300 {
            body.update(SIM_DT);
        }
        assert_group_membership(&body);
    }

    #[test]
    fn test_first_row_growth_count() {
        let mut body = BoneSnake::default();
        while !body.motion().is_dropping() {
            body.update(SIM_DT);
        }
        // Straight row of about 370 units: floor(L / spacing) body segments
        let length = body.path().total_length();
        let spacing = body.config().spacing;
        assert_eq!(body.segments().len() - 1, (length / spacing).floor() as usize);
    }

    #[test]
    fn test_boustrophedon_scenario() {
        let config = BodyConfig::default();
        let mut body = BoneSnake::new(config, ScreenBounds::new(480.0, 800.0));

        let mut ticks = 0;
        while !body.motion().is_dropping() {
            body.update(SIM_DT);
            ticks += 1;
            assert!(ticks < 10_000);
        }
        assert!(body.head_position().x > 420.0);
        assert_eq!(
            body.motion(),
            MotionState::Dropping {
                direction: Direction::Right,
                target_y: 100.0
            }
        );

        body.update(SIM_DT);
        assert_eq!(body.head_facing(), Facing::Down);

        while body.motion().is_dropping() {
            body.update(SIM_DT);
            ticks += 1;
            assert!(ticks < 10_000);
        }
        assert_eq!(body.head_position().y, 100.0);
        assert_eq!(
            body.motion(),
            MotionState::Moving {
                direction: Direction::Left
            }
        );

        body.update(SIM_DT);
        assert_eq!(body.head_facing(), Facing::Left);
    }

    #[test]
    fn test_motion_events_emitted() {
        let mut body = BoneSnake::default();
        let mut transitions = 0;
        for _ in 0..600 {
            body.update(SIM_DT);
            transitions += body
                .drain_events()
                .iter()
                .filter(|e| matches!(e, BodyEvent::MotionChanged { .. }))
                .count();
        }
        // 370 units of row at 60/s, then a 50 unit drop at 90/s: both edges in 10s
        assert!(transitions >= 2);
    }

    #[test]
    fn test_render_trails_logical() {
        let mut body = BoneSnake::default();
        for _ in 0..300 {
            body.update(SIM_DT);
        }
        let head = &body.segments()[0];
        assert_eq!(head.render_pos, head.pos);
        for seg in body.segments() {
            // A freshly spawned tail may be up to one spacing behind its render
            assert!(seg.render_pos.distance(seg.pos) < 2.0 * body.config().spacing);
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = BoneSnake::default();
        let mut b = BoneSnake::default();
        for i in 0..900 {
            a.update(SIM_DT);
            b.update(SIM_DT);
            if i == 500 {
                let target = a.segments()[3].id;
                a.apply_damage(target, 100);
                b.apply_damage(target, 100);
                assert!(a.remove_entity(target));
                assert!(b.remove_entity(target));
            }
        }
        assert_eq!(a.segments().len(), b.segments().len());
        assert_eq!(a.motion(), b.motion());
        for (sa, sb) in a.segments().iter().zip(b.segments()) {
            assert_eq!(sa.pos, sb.pos);
            assert_eq!(sa.render_pos, sb.render_pos);
        }
    }

    #[test]
    fn test_heals_empty_body_on_update() {
        let mut body = BoneSnake::default();
        for _ in 0..60 {
            body.update(SIM_DT);
        }
        body.segments.clear();
        body.groups.clear();
        body.update(SIM_DT);
        assert!(!body.segments().is_empty());
        assert!(body.segments()[0].is_head);
        assert!(body.segments()[0].group.is_some());
        assert_eq!(body.segments()[0].pos, body.path().newest());
    }
}
