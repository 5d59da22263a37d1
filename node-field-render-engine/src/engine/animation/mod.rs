//! Per-frame animation layered on top of layout base positions.
//!
//! The scene clock only advances while playback is on. Offsets are pure
//! functions of that clock, so the render sync and the gesture anchors
//! always agree on where an instance is.

/// Scene clock resource, animation settings and the clock tick system.
pub mod clock;

/// Float, pulse and orbit offsets plus effective-position resolution.
pub mod offsets;
