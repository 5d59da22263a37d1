use crate::engine::animation::clock::{AnimationSettings, SceneClock};
use crate::engine::animation::offsets::{AnimationFrame, resolve_effective_position};
use crate::engine::assets::field_config::FieldConfig;
use crate::engine::layout::LayoutPoint;
use crate::engine::picking::hit_test::InstanceBounds;
use crate::engine::scene::node_field::{NodeField, NodeFieldRoot};
use crate::tools::gesture::state::{DragOverrides, InteractionState};
use bevy::prelude::*;
use bytemuck::{Pod, Zeroable};
use constants::render_settings::*;
use serde::{Deserialize, Serialize};

/// Per-instance model matrix, column major. Vertex locations 3..=6.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct InstanceTransform {
    pub cols: [[f32; 4]; 4],
}

impl InstanceTransform {
    pub fn from_translation_scale(translation: Vec3, scale: f32) -> Self {
        Self {
            cols: Mat4::from_scale_rotation_translation(
                Vec3::splat(scale),
                Quat::IDENTITY,
                translation,
            )
            .to_cols_array_2d(),
        }
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.cols[3][0], self.cols[3][1], self.cols[3][2])
    }

    pub fn scale(&self) -> f32 {
        Vec3::new(self.cols[0][0], self.cols[0][1], self.cols[0][2]).length()
    }
}

/// Per-instance linear RGBA. Vertex location 7.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct InstanceColor {
    pub rgba: [f32; 4],
}

/// Hover and selection emphasis, configurable per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    pub hover_scale: f32,
    pub selected_scale: f32,
    /// sRGB.
    pub hover_color: [f32; 3],
    /// sRGB.
    pub selected_color: [f32; 3],
    pub base_intensity: f32,
    pub glow_gain: f32,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            hover_scale: HOVER_SCALE,
            selected_scale: SELECTED_SCALE,
            hover_color: [HOVER_COLOR.red, HOVER_COLOR.green, HOVER_COLOR.blue],
            selected_color: [SELECTED_COLOR.red, SELECTED_COLOR.green, SELECTED_COLOR.blue],
            base_intensity: BASE_INTENSITY,
            glow_gain: GLOW_GAIN,
        }
    }
}

/// Instances that currently carry emphasis.
#[derive(Debug, Clone, Copy)]
pub struct Highlight<'a> {
    pub hovered: Option<usize>,
    pub selected: Option<usize>,
    pub settings: &'a HighlightSettings,
}

impl Highlight<'_> {
    fn scale(&self, index: usize) -> f32 {
        if self.selected == Some(index) {
            self.settings.selected_scale
        } else if self.hovered == Some(index) {
            self.settings.hover_scale
        } else {
            1.0
        }
    }

    fn color(&self, index: usize, point: &LayoutPoint) -> [f32; 4] {
        let emphasis = if self.selected == Some(index) {
            Some(self.settings.selected_color)
        } else if self.hovered == Some(index) {
            Some(self.settings.hover_color)
        } else {
            None
        };
        if let Some([r, g, b]) = emphasis {
            let linear = LinearRgba::from(Srgba::rgb(r, g, b));
            return [linear.red, linear.green, linear.blue, 1.0];
        }
        let intensity = (self.settings.base_intensity
            + self.settings.glow_gain * point.glow_intensity)
            * point.opacity;
        [
            point.color.red * intensity,
            point.color.green * intensity,
            point.color.blue * intensity,
            point.opacity,
        ]
    }
}

/// CPU mirror of the instance buffers for one node batch.
///
/// Each revision counter moves at most once per [`RenderState::sync`], and the
/// render world re-uploads only when it sees a new revision. `generation`
/// changes when the buffers are reallocated.
#[derive(Component, Debug, Default, Clone)]
pub struct RenderState {
    transforms: Vec<InstanceTransform>,
    colors: Vec<InstanceColor>,
    transform_revision: u64,
    color_revision: u64,
    generation: u64,
}

impl RenderState {
    pub fn with_capacity(count: usize) -> Self {
        let mut state = Self::default();
        state.allocate(count);
        state
    }

    /// Drops the current buffers and allocates `count` fresh slots.
    pub fn allocate(&mut self, count: usize) {
        self.transforms = vec![InstanceTransform::default(); count];
        self.colors = vec![InstanceColor::default(); count];
        self.generation += 1;
        self.transform_revision += 1;
        self.color_revision += 1;
        debug!(
            "Allocated node instance buffers for {count} instances (generation {})",
            self.generation
        );
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    pub fn colors(&self) -> &[InstanceColor] {
        &self.colors
    }

    pub fn transform_revision(&self) -> u64 {
        self.transform_revision
    }

    pub fn color_revision(&self) -> u64 {
        self.color_revision
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Writes every slot from `points` and marks both buffers dirty once.
    ///
    /// Callers reallocate on count changes first. A mismatch panics in debug
    /// builds and reallocates in release builds.
    pub fn sync(
        &mut self,
        points: &[LayoutPoint],
        overrides: &DragOverrides,
        frame: &AnimationFrame,
        highlight: &Highlight,
    ) {
        if points.len() != self.len() {
            debug_assert!(
                false,
                "render state holds {} slots but sync received {} points",
                self.len(),
                points.len()
            );
            warn!(
                "Node instance count changed from {} to {} without reallocation, reallocating",
                self.len(),
                points.len()
            );
            self.allocate(points.len());
        }

        for (index, point) in points.iter().enumerate() {
            let position = resolve_effective_position(index, point, overrides, frame);
            let scale = point.radius * frame.pulse_scale(point) * highlight.scale(index);
            self.transforms[index] = InstanceTransform::from_translation_scale(position, scale);
            self.colors[index] = InstanceColor {
                rgba: highlight.color(index, point),
            };
        }

        self.transform_revision += 1;
        self.color_revision += 1;
    }
}

impl InstanceBounds for RenderState {
    fn instance_count(&self) -> usize {
        self.len()
    }

    fn instance_bounds(&self, index: usize) -> Option<(Vec3, f32)> {
        let transform = self.transforms.get(index)?;
        Some((transform.translation(), transform.scale() * NODE_MESH_RADIUS))
    }
}

/// Re-resolves every instance from the field, the scene clock and drag overrides.
pub fn sync_node_instances(
    field: Res<NodeField>,
    clock: Res<SceneClock>,
    config: Res<FieldConfig>,
    overrides: Res<DragOverrides>,
    interaction: Res<InteractionState>,
    mut batches: Query<&mut RenderState, With<NodeFieldRoot>>,
) {
    let Ok(mut render_state) = batches.single_mut() else {
        return;
    };
    let settings: &AnimationSettings = &config.animation;
    let frame = AnimationFrame::new(clock.elapsed, settings);
    let highlight = Highlight {
        hovered: interaction.hovered_index,
        selected: interaction.selected_index,
        settings: &config.render,
    };
    render_state.sync(&field.points, &overrides, &frame, &highlight);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::animation::offsets::test_support::still;
    use crate::engine::layout::LayoutMeta;

    fn points(count: usize) -> Vec<LayoutPoint> {
        (0..count)
            .map(|i| LayoutPoint {
                base_position: Vec3::new(i as f32 * 2.0, 1.0, -(i as f32)),
                radius: 0.5 + i as f32 * 0.1,
                color: LinearRgba::rgb(0.8, 0.4, 0.2),
                glow_intensity: 0.5,
                opacity: if i == 2 { 0.7 } else { 1.0 },
                meta: LayoutMeta {
                    spiral_angle: 0.0,
                    distance_from_center: i as f32 * 2.0,
                    progress_ratio: i as f32 / count as f32,
                },
            })
            .collect()
    }

    #[test]
    fn translations_match_effective_positions() {
        let settings = AnimationSettings::default();
        let highlight_settings = HighlightSettings::default();
        let frame = AnimationFrame::new(4.2, &settings);
        let points = points(6);
        let mut overrides = DragOverrides::default();
        overrides.insert(3, Vec3::new(9.0, 9.0, 9.0));
        let highlight = Highlight {
            hovered: None,
            selected: None,
            settings: &highlight_settings,
        };

        let mut state = RenderState::with_capacity(points.len());
        state.sync(&points, &overrides, &frame, &highlight);

        for (index, point) in points.iter().enumerate() {
            let expected = resolve_effective_position(index, point, &overrides, &frame);
            assert!(state.transforms()[index].translation().distance(expected) < 1e-5);
        }
    }

    #[test]
    fn sync_bumps_each_revision_once() {
        let settings = still();
        let highlight_settings = HighlightSettings::default();
        let frame = AnimationFrame::new(0.0, &settings);
        let points = points(40);
        let highlight = Highlight {
            hovered: Some(1),
            selected: None,
            settings: &highlight_settings,
        };

        let mut state = RenderState::with_capacity(points.len());
        let (transforms, colors) = (state.transform_revision(), state.color_revision());
        state.sync(&points, &DragOverrides::default(), &frame, &highlight);
        assert_eq!(state.transform_revision(), transforms + 1);
        assert_eq!(state.color_revision(), colors + 1);
    }

    #[test]
    fn highlight_scales_and_recolours() {
        let settings = still();
        let highlight_settings = HighlightSettings::default();
        let frame = AnimationFrame::new(0.0, &settings);
        let points = points(4);
        let highlight = Highlight {
            hovered: Some(1),
            selected: Some(2),
            settings: &highlight_settings,
        };

        let mut state = RenderState::with_capacity(points.len());
        state.sync(&points, &DragOverrides::default(), &frame, &highlight);

        let scale = |i: usize| state.transforms()[i].scale();
        assert!((scale(0) - points[0].radius).abs() < 1e-5);
        assert!((scale(1) - points[1].radius * HOVER_SCALE).abs() < 1e-5);
        assert!((scale(2) - points[2].radius * SELECTED_SCALE).abs() < 1e-5);

        assert_eq!(state.colors()[2].rgba, [1.0, 1.0, 1.0, 1.0]);
        let hover = state.colors()[1].rgba;
        assert!(hover[2] > hover[1] && hover[1] > hover[0]);

        let plain = state.colors()[0].rgba;
        let intensity = BASE_INTENSITY + GLOW_GAIN * 0.5;
        assert!((plain[0] - 0.8 * intensity).abs() < 1e-5);
        assert_eq!(plain[3], 1.0);
    }

    #[test]
    fn bounds_follow_written_transforms() {
        let settings = still();
        let highlight_settings = HighlightSettings::default();
        let frame = AnimationFrame::new(0.0, &settings);
        let points = points(3);
        let highlight = Highlight {
            hovered: None,
            selected: None,
            settings: &highlight_settings,
        };
        let mut state = RenderState::with_capacity(3);
        state.sync(&points, &DragOverrides::default(), &frame, &highlight);

        let (center, radius) = state.instance_bounds(1).unwrap();
        assert!(center.distance(points[1].base_position) < 1e-5);
        assert!((radius - points[1].radius * NODE_MESH_RADIUS).abs() < 1e-5);
        assert!(state.instance_bounds(3).is_none());
    }

    #[test]
    fn reallocation_starts_a_new_generation() {
        let mut state = RenderState::with_capacity(10);
        let generation = state.generation();
        state.allocate(25);
        assert_eq!(state.len(), 25);
        assert_eq!(state.colors().len(), 25);
        assert_eq!(state.generation(), generation + 1);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "sync received")]
    fn stale_buffer_size_panics_in_debug() {
        let settings = still();
        let highlight_settings = HighlightSettings::default();
        let frame = AnimationFrame::new(0.0, &settings);
        let highlight = Highlight {
            hovered: None,
            selected: None,
            settings: &highlight_settings,
        };
        let mut state = RenderState::with_capacity(2);
        state.sync(&points(5), &DragOverrides::default(), &frame, &highlight);
    }
}
