use super::generator::LayoutError;
use crate::engine::assets::entity_catalog::{EntityCategory, EntityRecord};
use bevy::prelude::*;
use constants::category::get_category_color;
use constants::layout::{MAX_ENTITY_SIZE, MAX_GLOW, MIN_ENTITY_SIZE, MIN_GLOW};
use constants::render_settings::{ALIAS_OPACITY, ALIAS_SIZE};

/// Visual tuple resolved for one entity before layout scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityVisuals {
    pub color: LinearRgba,
    pub size: f32,
    pub glow: f32,
    pub opacity: f32,
}

pub fn parse_hex_color(value: &str) -> Result<Srgba, LayoutError> {
    Srgba::hex(value).map_err(|err| LayoutError::InvalidColor {
        value: value.to_string(),
        reason: err.to_string(),
    })
}

pub fn hex_to_srgba(hex: u32) -> Srgba {
    Srgba::rgb_u8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

pub fn category_color(category: EntityCategory) -> LinearRgba {
    hex_to_srgba(get_category_color(category.as_str())).into()
}

/// Piecewise-linear blend across three stops, interpolated in sRGB.
pub fn gradient_color(stops: &[Srgba; 3], progress: f32) -> LinearRgba {
    let p = progress.clamp(0.0, 1.0);
    let (from, to, t) = if p <= 0.5 {
        (stops[0], stops[1], p * 2.0)
    } else {
        (stops[1], stops[2], (p - 0.5) * 2.0)
    };
    let lerp = |a: f32, b: f32| a * (1.0 - t) + b * t;
    Srgba::new(
        lerp(from.red, to.red),
        lerp(from.green, to.green),
        lerp(from.blue, to.blue),
        1.0,
    )
    .into()
}

/// Category defaults with any record-level override applied on top.
pub fn resolve_entity_visuals(
    entity: &EntityRecord,
    max_rank: u32,
) -> Result<EntityVisuals, LayoutError> {
    let rank_share = entity.rank as f32 / max_rank.max(1) as f32;
    let mut visuals = EntityVisuals {
        color: category_color(entity.category),
        size: (MAX_ENTITY_SIZE - rank_share * 1.5).max(MIN_ENTITY_SIZE),
        glow: (entity.power / 100.0 * 0.8).clamp(MIN_GLOW, MAX_GLOW),
        opacity: 1.0,
    };

    if let Some(visual) = &entity.visual {
        if let Some(color) = &visual.color {
            visuals.color = parse_hex_color(color)?.into();
        }
        if let Some(size) = visual.size {
            visuals.size = size;
        }
        if let Some(glow) = visual.glow_intensity {
            visuals.glow = glow.clamp(0.0, MAX_GLOW);
        }
    }

    if entity.is_alias {
        visuals.size = ALIAS_SIZE;
        visuals.opacity = ALIAS_OPACITY;
    }

    Ok(visuals)
}
