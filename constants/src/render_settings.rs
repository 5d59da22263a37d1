use bevy::color::Srgba;

pub const HOVER_SCALE: f32 = 1.5;
pub const SELECTED_SCALE: f32 = 1.8;

/// #00aaff
pub const HOVER_COLOR: Srgba = Srgba::new(0.0, 0.667, 1.0, 1.0);
pub const SELECTED_COLOR: Srgba = Srgba::new(1.0, 1.0, 1.0, 1.0);

pub const ALIAS_SIZE: f32 = 0.8;
pub const ALIAS_OPACITY: f32 = 0.7;

/// Radius of the shared sphere mesh every instance scales.
pub const NODE_MESH_RADIUS: f32 = 1.0;

/// Baseline shading applied before glow.
pub const BASE_INTENSITY: f32 = 0.55;
pub const GLOW_GAIN: f32 = 0.45;
