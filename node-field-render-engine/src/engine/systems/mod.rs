//! Overlay systems for native builds.

/// Smoothed frame rate text.
pub mod fps_tracking;

/// Overlay layout and the hover/drag status line.
pub mod overlay;
