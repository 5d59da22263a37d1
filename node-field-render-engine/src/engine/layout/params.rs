use super::generator::LayoutError;
use crate::engine::assets::entity_catalog::EntityCategory;
use constants::category::{JOURNEY_GRADIENT, get_category_angle};
use constants::layout::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutLaw {
    #[default]
    LinearRadial,
    LogSpiral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub law: LayoutLaw,
    pub min_radius: f32,
    pub max_radius: f32,
    pub radius_multiplier: f32,
    pub arm_count: u32,
    /// Arm the log-spiral sequence sits on.
    pub arm_index: u32,
    pub arm_tightness: f32,
    pub wave_height: f32,
    pub wave_frequency: f32,
    pub height_multiplier: f32,
    pub height_jitter: f32,
    pub random_spread: f32,
    pub alias_angle_offset: f32,
    pub category_angles: BTreeMap<EntityCategory, f32>,
    /// Hex colour stops for the log-spiral gradient.
    pub gradient: [String; 3],
    pub point_size: f32,
    pub size_variation: f32,
    pub global_size: f32,
    pub emissive: f32,
    pub seed: u64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        let category_angles = EntityCategory::ALL
            .iter()
            .filter_map(|category| {
                get_category_angle(category.as_str()).map(|angle| (*category, angle))
            })
            .collect();

        Self {
            law: LayoutLaw::LinearRadial,
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            radius_multiplier: DEFAULT_RADIUS_MULTIPLIER,
            arm_count: DEFAULT_ARM_COUNT,
            arm_index: 0,
            arm_tightness: DEFAULT_ARM_TIGHTNESS,
            wave_height: DEFAULT_WAVE_HEIGHT,
            wave_frequency: DEFAULT_WAVE_FREQUENCY,
            height_multiplier: DEFAULT_HEIGHT_MULTIPLIER,
            height_jitter: DEFAULT_HEIGHT_JITTER,
            random_spread: DEFAULT_RANDOM_SPREAD,
            alias_angle_offset: DEFAULT_ALIAS_ANGLE_OFFSET,
            category_angles,
            gradient: JOURNEY_GRADIENT.map(|hex| format!("#{hex:06x}")),
            point_size: DEFAULT_POINT_SIZE,
            size_variation: DEFAULT_SIZE_VARIATION,
            global_size: DEFAULT_GLOBAL_SIZE,
            emissive: DEFAULT_EMISSIVE,
            seed: DEFAULT_LAYOUT_SEED,
        }
    }
}

impl LayoutParams {
    /// Rejects parameter sets that would place entities at NaN or collapse the field.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let scalars = [
            ("min_radius", self.min_radius),
            ("max_radius", self.max_radius),
            ("radius_multiplier", self.radius_multiplier),
            ("arm_tightness", self.arm_tightness),
            ("wave_height", self.wave_height),
            ("wave_frequency", self.wave_frequency),
            ("height_multiplier", self.height_multiplier),
            ("height_jitter", self.height_jitter),
            ("random_spread", self.random_spread),
            ("alias_angle_offset", self.alias_angle_offset),
            ("point_size", self.point_size),
            ("size_variation", self.size_variation),
            ("global_size", self.global_size),
            ("emissive", self.emissive),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, value)| !value.is_finite()) {
            return Err(LayoutError::NonFiniteParameter(*name));
        }
        if self.category_angles.values().any(|angle| !angle.is_finite()) {
            return Err(LayoutError::NonFiniteParameter("category_angles"));
        }
        if self.min_radius < 0.0 || self.max_radius <= self.min_radius {
            return Err(LayoutError::InvalidRadiusBounds {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if self.arm_count == 0 {
            return Err(LayoutError::ZeroArmCount);
        }
        if self.radius_multiplier <= 0.0 {
            return Err(LayoutError::NonPositiveParameter("radius_multiplier"));
        }
        if self.global_size <= 0.0 {
            return Err(LayoutError::NonPositiveParameter("global_size"));
        }
        Ok(())
    }
}
