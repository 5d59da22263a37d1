//! Shared constants for the node field renderer.
//!
//! Category tables, interaction thresholds, default layout parameters and
//! highlight settings. Every configurable value in the engine's `FieldConfig`
//! takes its default from here.

/// Entity category table: base arm angles and palette colours.
pub mod category;

/// Pointer gesture thresholds and drag projection limits.
pub mod interaction;

/// Default parameters for both layout laws and the animation loop.
pub mod layout;

/// Instance highlight scales, colours and alias dimming.
pub mod render_settings;
