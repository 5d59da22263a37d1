use super::clock::AnimationSettings;
use crate::engine::layout::LayoutPoint;
use crate::tools::gesture::state::DragOverrides;
use bevy::prelude::*;
use std::f32::consts::PI;

/// Animation evaluated at one instant of the scene clock.
#[derive(Debug, Clone, Copy)]
pub struct AnimationFrame<'a> {
    pub time: f32,
    pub settings: &'a AnimationSettings,
}

impl<'a> AnimationFrame<'a> {
    pub fn new(time: f32, settings: &'a AnimationSettings) -> Self {
        Self { time, settings }
    }

    /// Vertical bob, phase-shifted per index.
    pub fn float_offset(&self, index: usize) -> Vec3 {
        let s = self.settings;
        let phase = self.time * s.float_speed * 0.5 + index as f32 * 0.1;
        Vec3::Y * phase.sin() * s.float_amplitude
    }

    /// Rotation about +Y. Outer points turn slower.
    pub fn orbit_angle(&self, point: &LayoutPoint) -> f32 {
        self.time * self.settings.orbit_speed / (point.meta.distance_from_center + 1.0)
    }

    /// Base position carried around the orbit, before float offsets.
    pub fn anchor(&self, point: &LayoutPoint) -> Vec3 {
        Quat::from_rotation_y(self.orbit_angle(point)) * point.base_position
    }

    pub fn pulse_scale(&self, point: &LayoutPoint) -> f32 {
        let s = self.settings;
        1.0 + (self.time * s.pulse_speed + point.meta.progress_ratio * PI).sin() * s.pulse_intensity
    }
}

/// Where instance `index` is drawn at `frame`.
///
/// A drag override replaces the orbiting anchor; the float offset still
/// applies on top, damped so dragged nodes stay near the pointer.
pub fn resolve_effective_position(
    index: usize,
    point: &LayoutPoint,
    overrides: &DragOverrides,
    frame: &AnimationFrame,
) -> Vec3 {
    let float = frame.float_offset(index);
    match overrides.get(index) {
        Some(position) => position + float * frame.settings.override_damping,
        None => frame.anchor(point) + float,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::still;
    use super::*;
    use crate::engine::layout::LayoutMeta;
    use crate::tools::gesture::machine;
    use crate::tools::gesture::state::InteractionState;

    fn point_at(position: Vec3) -> LayoutPoint {
        LayoutPoint {
            base_position: position,
            radius: 1.0,
            color: LinearRgba::WHITE,
            glow_intensity: 0.5,
            opacity: 1.0,
            meta: LayoutMeta {
                spiral_angle: 0.0,
                distance_from_center: position.length(),
                progress_ratio: 0.25,
            },
        }
    }

    #[test]
    fn frozen_frame_resolves_to_base_position() {
        let settings = AnimationSettings::default();
        let frame = AnimationFrame::new(0.0, &settings);
        let point = point_at(Vec3::new(4.0, 0.0, 3.0));
        let position = resolve_effective_position(0, &point, &DragOverrides::default(), &frame);
        assert!(position.distance(point.base_position) < 1e-6);
    }

    #[test]
    fn orbit_preserves_distance_and_height() {
        let settings = AnimationSettings::default();
        let frame = AnimationFrame::new(7.5, &settings);
        let point = point_at(Vec3::new(4.0, 2.0, 3.0));
        let anchor = frame.anchor(&point);
        assert!((Vec2::new(anchor.x, anchor.z).length() - 5.0).abs() < 1e-4);
        assert!((anchor.y - 2.0).abs() < 1e-6);
        assert!(anchor.distance(point.base_position) > 1e-3);
    }

    #[test]
    fn override_takes_precedence_with_damped_float() {
        let settings = AnimationSettings::default();
        let frame = AnimationFrame::new(3.0, &settings);
        let point = point_at(Vec3::new(10.0, 0.0, 0.0));
        let mut overrides = DragOverrides::default();
        overrides.insert(5, Vec3::new(-2.0, 1.0, 0.0));

        let position = resolve_effective_position(5, &point, &overrides, &frame);
        let expected =
            Vec3::new(-2.0, 1.0, 0.0) + frame.float_offset(5) * settings.override_damping;
        assert!(position.distance(expected) < 1e-6);
    }

    #[test]
    fn pulse_stays_within_intensity_band() {
        let settings = AnimationSettings::default();
        let point = point_at(Vec3::X);
        for step in 0..50 {
            let scale = AnimationFrame::new(step as f32 * 0.13, &settings).pulse_scale(&point);
            assert!((scale - 1.0).abs() <= settings.pulse_intensity + 1e-6);
        }
    }

    #[test]
    fn reset_returns_dragged_entity_to_base() {
        let settings = still();
        let frame = AnimationFrame::new(12.0, &settings);
        let point = point_at(Vec3::new(10.0, 0.0, 0.0));
        let mut overrides = DragOverrides::default();
        let mut state = InteractionState::default();

        overrides.insert(0, Vec3::new(30.0, 5.0, -8.0));
        assert_ne!(
            resolve_effective_position(0, &point, &overrides, &frame),
            point.base_position
        );

        machine::reset(&mut state, &mut overrides);
        assert_eq!(
            resolve_effective_position(0, &point, &overrides, &frame),
            point.base_position
        );
    }
}
