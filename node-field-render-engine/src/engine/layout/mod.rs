//! Deterministic spatial layout for the node field.
//!
//! Maps entity attributes plus ordinal index to a base position and a visual
//! tuple. Two placement laws are supported:
//!
//! ```text
//! LinearRadial  rank ──> radius ──┐
//!               category ──> base angle + influence jitter + arm sweep ──> (x, y, z)
//!               power ──> height ─┘
//!
//! LogSpiral     ordinal ──> progress ──> radius ──> ln(r + 1) * tightness ──> (x, y, z)
//!                                   └──> gradient colour, glow, size
//! ```
//!
//! The only randomness comes from a [`jitter::JitterSource`], seeded per entity
//! so regeneration with unchanged inputs reproduces identical output.

/// Layout entry point, output types and error taxonomy.
pub mod generator;

/// Per-entity jitter sources: seeded for the app, disabled for tests.
pub mod jitter;

/// Linear-radial placement law for general entity fields.
pub mod linear_radial;

/// Logarithmic-spiral placement law for fixed-length ordered sequences.
pub mod log_spiral;

/// Colour parsing, category palette and gradient interpolation.
pub mod palette;

/// Layout parameters and validation.
pub mod params;

pub use generator::{LayoutError, LayoutMeta, LayoutPoint, generate};
pub use params::{LayoutLaw, LayoutParams};
