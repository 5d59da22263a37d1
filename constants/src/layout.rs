// Radius bounds
pub const DEFAULT_MIN_RADIUS: f32 = 5.0;
pub const DEFAULT_MAX_RADIUS: f32 = 50.0;
pub const DEFAULT_RADIUS_MULTIPLIER: f32 = 1.0;

// Arms
pub const DEFAULT_ARM_COUNT: u32 = 4;
pub const DEFAULT_ARM_TIGHTNESS: f32 = 3.0;

// Vertical displacement
pub const DEFAULT_WAVE_HEIGHT: f32 = 0.0;
pub const DEFAULT_WAVE_FREQUENCY: f32 = 0.8;
pub const DEFAULT_HEIGHT_MULTIPLIER: f32 = 1.0;
pub const DEFAULT_HEIGHT_JITTER: f32 = 0.5;

/// Radial jitter span at the outer edge of the linear-radial field.
pub const DEFAULT_RANDOM_SPREAD: f32 = 2.0;

/// Extra angle given to alias entities so they sit beside their original.
pub const DEFAULT_ALIAS_ANGLE_OFFSET: f32 = 0.15;

// Sequence visuals
pub const DEFAULT_POINT_SIZE: f32 = 0.3;
pub const DEFAULT_SIZE_VARIATION: f32 = 0.3;
pub const DEFAULT_GLOBAL_SIZE: f32 = 1.0;
pub const DEFAULT_EMISSIVE: f32 = 0.5;

pub const DEFAULT_LAYOUT_SEED: u64 = 0x5EED_F1E1D;

// Entity visuals
pub const MIN_ENTITY_SIZE: f32 = 0.5;
pub const MAX_ENTITY_SIZE: f32 = 2.0;
pub const MIN_GLOW: f32 = 0.1;
pub const MAX_GLOW: f32 = 1.0;

// Animation
pub const DEFAULT_FLOAT_AMPLITUDE: f32 = 0.4;
pub const DEFAULT_FLOAT_SPEED: f32 = 0.9;
pub const DEFAULT_PULSE_INTENSITY: f32 = 0.15;
pub const DEFAULT_PULSE_SPEED: f32 = 1.8;
pub const DEFAULT_ORBIT_SPEED: f32 = 0.5;
/// Share of the float offset still applied on top of a drag override.
pub const DEFAULT_OVERRIDE_DAMPING: f32 = 0.3;

// Density
pub const MIN_DENSITY: f32 = 0.1;
pub const MAX_DENSITY: f32 = 1.0;
pub const DENSITY_STEP: f32 = 0.1;
