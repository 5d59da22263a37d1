use crate::engine::animation::clock::AnimationSettings;
use crate::engine::layout::LayoutParams;
use crate::engine::render::render_state::HighlightSettings;
use crate::tools::gesture::state::InteractionSettings;
use bevy::prelude::*;
use constants::layout::{DENSITY_STEP, MAX_DENSITY, MIN_DENSITY};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/galaxy.field.json";
pub const DEFAULT_CATALOG_PATH: &str = "data/characters.entities.json";

/// Every tunable of one node field, loaded from `*.field.json`.
///
/// Inserted as a resource once loaded. Keyboard controls edit `density` and
/// `include_aliases` on the resource, not the asset.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Catalog path relative to the asset root.
    pub catalog_path: String,
    pub layout: LayoutParams,
    pub animation: AnimationSettings,
    pub interaction: InteractionSettings,
    pub render: HighlightSettings,
    /// Share of the catalog's originals shown, most central first.
    pub density: f32,
    pub include_aliases: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
            layout: LayoutParams::default(),
            animation: AnimationSettings::default(),
            interaction: InteractionSettings::default(),
            render: HighlightSettings::default(),
            density: MAX_DENSITY,
            include_aliases: true,
        }
    }
}

impl FieldConfig {
    /// Moves density by `steps` increments, returning whether it changed.
    pub fn step_density(&mut self, steps: i32) -> bool {
        let previous = self.density;
        let stepped = (self.density / DENSITY_STEP).round() + steps as f32;
        self.density = (stepped * DENSITY_STEP).clamp(MIN_DENSITY, MAX_DENSITY);
        (self.density - previous).abs() > f32::EPSILON
    }
}
