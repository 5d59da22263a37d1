use super::generator::{LayoutError, LayoutMeta, LayoutPoint};
use super::jitter::{JitterChannel, JitterSource};
use super::palette::resolve_entity_visuals;
use super::params::LayoutParams;
use crate::engine::assets::entity_catalog::EntityRecord;
use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_4, TAU};

/// 1.0 for rank 1, 0.0 for the highest rank in the set.
pub fn normalized_rank(rank: u32, max_rank: u32) -> f32 {
    if max_rank <= 1 {
        return 1.0;
    }
    ((max_rank - rank.min(max_rank)) as f32 / (max_rank - 1) as f32).clamp(0.0, 1.0)
}

/// Angle of arm `ordinal mod arm_count`, for categories without a table entry.
pub fn arm_angle(ordinal: usize, arm_count: u32) -> f32 {
    let arm_count = arm_count.max(1);
    (ordinal as u32 % arm_count) as f32 * TAU / arm_count as f32
}

pub fn place(
    entity: &EntityRecord,
    ordinal: usize,
    max_rank: u32,
    params: &LayoutParams,
    jitter: &impl JitterSource,
) -> Result<LayoutPoint, LayoutError> {
    let outward = 1.0 - normalized_rank(entity.rank, max_rank);
    let span = params.max_radius - params.min_radius;

    // Radial jitter grows with rank so the centre stays pinned to min_radius.
    let radial_jitter = jitter.draw(&entity.id, JitterChannel::Radius) * params.random_spread * outward;
    let radius = (params.min_radius + outward * span * params.radius_multiplier + radial_jitter)
        .clamp(params.min_radius, params.max_radius);

    let influence = (entity.influence / 100.0).clamp(0.0, 1.0);
    let base_angle = params
        .category_angles
        .get(&entity.category)
        .copied()
        .unwrap_or_else(|| arm_angle(ordinal, params.arm_count));
    let influence_offset = jitter.draw(&entity.id, JitterChannel::Angle) * influence * FRAC_PI_4;
    let alias_offset = if entity.is_alias {
        params.alias_angle_offset
    } else {
        0.0
    };
    let angle = base_angle
        + influence_offset
        + radius * params.arm_tightness / params.max_radius
        + alias_offset;

    let height = (entity.power - 50.0) / 50.0 * 3.0 * params.height_multiplier
        + jitter.draw(&entity.id, JitterChannel::Height) * params.height_jitter
        + params.wave_height * (params.wave_frequency * radius + angle).sin();

    let visuals = resolve_entity_visuals(entity, max_rank)?;

    Ok(LayoutPoint {
        base_position: Vec3::new(radius * angle.cos(), height, radius * angle.sin()),
        radius: visuals.size * params.global_size,
        color: visuals.color,
        glow_intensity: visuals.glow,
        opacity: visuals.opacity,
        meta: LayoutMeta {
            spiral_angle: angle,
            distance_from_center: radius,
            progress_ratio: outward,
        },
    })
}
