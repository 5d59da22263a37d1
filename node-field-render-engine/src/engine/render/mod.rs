//! Instanced rendering for the node field.
//!
//! The main world keeps a CPU mirror of per-instance transforms and colours in
//! [`render_state::RenderState`]. The render world copies it during extraction
//! only when a revision changes, and uploads with a single buffer write per
//! dirty buffer.

/// Instanced draw pipeline: extraction, GPU buffer preparation and queueing.
///
/// Draws every node as one instance of a shared sphere mesh using two
/// per-instance vertex buffers.
pub mod instanced_render_plugin;

/// Per-instance transform and colour buffers with batched dirty revisions.
pub mod render_state;
