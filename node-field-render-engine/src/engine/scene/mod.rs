//! Scene lifetime of the node field.
//!
//! Owns the laid-out field resource and the root entity carrying the
//! instanced batch, and rebuilds both when density, alias visibility or the
//! catalog change.

/// Node field resource, root entity spawning and rebuilds.
pub mod node_field;
