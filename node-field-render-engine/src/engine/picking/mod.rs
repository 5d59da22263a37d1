//! Ray construction and instance hit-testing.
//!
//! Pointer positions are converted to NDC against the camera's logical
//! viewport, unprojected through the inverse view-projection into a world ray,
//! then tested against every instance's bounding volume. The nearest hit wins.


/// Camera view snapshots, NDC conversion and ray/volume intersection primitives.
pub mod ray;
