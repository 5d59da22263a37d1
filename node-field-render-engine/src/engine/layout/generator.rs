use super::jitter::{JitterSource, SeededJitter};
use super::palette::parse_hex_color;
use super::params::{LayoutLaw, LayoutParams};
use super::{linear_radial, log_spiral};
use crate::engine::assets::entity_catalog::EntityRecord;
use bevy::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMeta {
    pub spiral_angle: f32,
    pub distance_from_center: f32,
    pub progress_ratio: f32,
}

/// Generator output for one entity. Read-only outside the layout module.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPoint {
    pub base_position: Vec3,
    /// Render scale of the shared mesh.
    pub radius: f32,
    pub color: LinearRgba,
    pub glow_intensity: f32,
    pub opacity: f32,
    pub meta: LayoutMeta,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("max_radius ({max}) must be greater than min_radius ({min}) and min_radius non-negative")]
    InvalidRadiusBounds { min: f32, max: f32 },
    #[error("layout parameter `{0}` is not finite")]
    NonFiniteParameter(&'static str),
    #[error("layout parameter `{0}` must be positive")]
    NonPositiveParameter(&'static str),
    #[error("arm_count must be at least 1")]
    ZeroArmCount,
    #[error("entity `{id}` is malformed: {reason}")]
    InvalidEntity { id: String, reason: String },
    #[error("invalid colour `{value}`: {reason}")]
    InvalidColor { value: String, reason: String },
    #[error("entity `{id}` resolved to a non-finite position")]
    NonFinitePosition { id: String },
}

/// Lays out `entities` with jitter seeded from `params.seed`.
pub fn generate(
    entities: &[EntityRecord],
    params: &LayoutParams,
) -> Result<Vec<LayoutPoint>, LayoutError> {
    generate_with(entities, params, &SeededJitter::new(params.seed))
}

/// Lays out `entities` drawing jitter from an explicit source.
pub fn generate_with(
    entities: &[EntityRecord],
    params: &LayoutParams,
    jitter: &impl JitterSource,
) -> Result<Vec<LayoutPoint>, LayoutError> {
    params.validate()?;
    if entities.is_empty() {
        return Ok(Vec::new());
    }
    for entity in entities {
        validate_entity(entity)?;
    }

    let points = match params.law {
        LayoutLaw::LinearRadial => {
            let max_rank = entities.iter().map(|e| e.rank).max().unwrap_or(1);
            entities
                .iter()
                .enumerate()
                .map(|(ordinal, entity)| {
                    linear_radial::place(entity, ordinal, max_rank, params, jitter)
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        LayoutLaw::LogSpiral => {
            let stops = [
                parse_hex_color(&params.gradient[0])?,
                parse_hex_color(&params.gradient[1])?,
                parse_hex_color(&params.gradient[2])?,
            ];
            entities
                .iter()
                .enumerate()
                .map(|(ordinal, entity)| {
                    log_spiral::place(entity, ordinal, entities.len(), params, &stops, jitter)
                })
                .collect()
        }
    };

    if let Some((entity, _)) = entities
        .iter()
        .zip(&points)
        .find(|(_, point)| !point.base_position.is_finite() || !point.radius.is_finite())
    {
        return Err(LayoutError::NonFinitePosition {
            id: entity.id.clone(),
        });
    }

    Ok(points)
}

fn validate_entity(entity: &EntityRecord) -> Result<(), LayoutError> {
    let invalid = |reason: &str| LayoutError::InvalidEntity {
        id: entity.id.clone(),
        reason: reason.to_string(),
    };
    if entity.rank == 0 {
        return Err(invalid("rank must be 1 or greater"));
    }
    if !entity.power.is_finite() {
        return Err(invalid("power is not finite"));
    }
    if !entity.influence.is_finite() {
        return Err(invalid("influence is not finite"));
    }
    if let Some(visual) = &entity.visual {
        if visual.size.is_some_and(|size| !size.is_finite() || size <= 0.0) {
            return Err(invalid("visual size must be positive and finite"));
        }
        if visual.glow_intensity.is_some_and(|glow| !glow.is_finite()) {
            return Err(invalid("glow intensity is not finite"));
        }
    }
    Ok(())
}
