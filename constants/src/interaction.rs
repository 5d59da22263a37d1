/// Minimum hold before pointer movement is read as a drag (milliseconds).
pub const LONG_PRESS_MS: f64 = 300.0;

/// Maximum gap between a click release and the next press for a double-activate (milliseconds).
pub const DOUBLE_CLICK_MS: f64 = 300.0;

/// Dragged positions are clamped to this distance from the origin.
pub const MAX_DRAG_RADIUS: f32 = 100.0;

/// Extra radius added to every pick volume, in world units.
pub const HIT_THRESHOLD: f32 = 0.1;

/// Passive hover is hit-tested once every N frames.
pub const HOVER_POLL_INTERVAL: u32 = 3;

/// Pointer travel (logical pixels) still counted as a background click.
pub const CLICK_MOVE_TOLERANCE_PX: f32 = 4.0;

/// Below this |cos| between a ray and the drag plane normal the plane is treated as parallel.
pub const PLANE_PARALLEL_EPSILON: f32 = 1e-4;

/// Screen-space fallback refuses to run with the camera closer than this to the anchor.
pub const MIN_PROJECTION_CAMERA_DISTANCE: f32 = 0.1;

/// Upper bound on world units per pixel for the screen-space fallback.
pub const SCREEN_SPACE_MAX_SCALE: f32 = 0.5;
