use super::generator::{LayoutMeta, LayoutPoint};
use super::jitter::{JitterChannel, JitterSource};
use super::palette::gradient_color;
use super::params::LayoutParams;
use crate::engine::assets::entity_catalog::EntityRecord;
use bevy::prelude::*;
use constants::render_settings::ALIAS_OPACITY;
use std::f32::consts::{PI, TAU};

/// Normalised position of `ordinal` along a sequence of `count` stops.
pub fn progress_ratio(ordinal: usize, count: usize) -> f32 {
    if count <= 1 {
        0.0
    } else {
        ordinal as f32 / (count - 1) as f32
    }
}

pub fn place(
    entity: &EntityRecord,
    ordinal: usize,
    count: usize,
    params: &LayoutParams,
    stops: &[Srgba; 3],
    jitter: &impl JitterSource,
) -> LayoutPoint {
    let progress = progress_ratio(ordinal, count);
    let radius = params.max_radius - progress * (params.max_radius - params.min_radius);
    let angle = (radius + 1.0).ln() * params.arm_tightness
        + params.arm_index as f32 * TAU / params.arm_count as f32;

    let influence = (entity.influence / 100.0).clamp(0.0, 1.0);
    let height = params.wave_height * (params.wave_frequency * angle).sin()
        + jitter.draw(&entity.id, JitterChannel::Height) * influence * params.height_jitter;

    let size_wave = 1.0
        + ((4.0 * PI * progress).sin() * 0.3 + (6.0 * PI * progress).cos() * 0.2)
            * params.size_variation;
    let size = params.point_size * (0.8 + 0.4 * (progress * PI).sin()) * size_wave;

    LayoutPoint {
        base_position: Vec3::new(radius * angle.cos(), height, radius * angle.sin()),
        radius: size * params.global_size,
        color: gradient_color(stops, progress),
        glow_intensity: params.emissive * (0.3 + 0.7 * progress),
        opacity: if entity.is_alias { ALIAS_OPACITY } else { 1.0 },
        meta: LayoutMeta {
            spiral_angle: angle,
            distance_from_center: radius,
            progress_ratio: progress,
        },
    }
}
