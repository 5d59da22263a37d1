//! Orbit camera for the node field and its arbitration with pointer gestures.
//!
//! The controller reads [`control_gate::CameraControlGate`] every frame and
//! ignores input while a node drag holds it. The gate is re-opened on drag
//! end, on pointer leave, and whenever the field or app is torn down.

/// Camera enable flag and the teardown systems that always re-open it.
pub mod control_gate;

/// Viewport camera resource and controller system for scene navigation.
pub mod viewport_camera;
