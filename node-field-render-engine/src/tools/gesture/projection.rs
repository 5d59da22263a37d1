use super::machine::DragProjector;
use crate::engine::picking::ray::ViewSnapshot;
use bevy::prelude::*;
use constants::interaction::{
    MIN_PROJECTION_CAMERA_DISTANCE, PLANE_PARALLEL_EPSILON, SCREEN_SPACE_MAX_SCALE,
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("camera view is not available")]
    CameraUnavailable,
    #[error("pointer ray is parallel to the drag plane")]
    ParallelPlane,
    #[error("drag plane lies behind the camera")]
    BehindCamera,
    #[error("viewport has zero size")]
    DegenerateViewport,
    #[error("camera is {distance} units from the drag anchor, too close to project")]
    CameraTooClose { distance: f32 },
    #[error("projection produced a non-finite position")]
    NonFinite,
    #[error("no projection strategy applies")]
    NoStrategy,
}

/// Inputs for one drag projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRequest {
    pub start_position: Vec3,
    pub start_pointer: Vec2,
    pub current_pointer: Vec2,
}

/// Ways of turning a pointer delta into a world displacement, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionStrategy {
    /// Ray-plane intersection on a camera-facing plane through the anchor.
    Plane,
    /// Camera right/up vectors scaled by distance and field of view.
    ScreenSpace,
}

pub const DEFAULT_STRATEGIES: [ProjectionStrategy; 2] =
    [ProjectionStrategy::Plane, ProjectionStrategy::ScreenSpace];

impl ProjectionStrategy {
    /// Precondition for this strategy. `Err` names why it cannot run.
    pub fn check(&self, view: &ViewSnapshot, request: &DragRequest) -> Result<(), ProjectionError> {
        match self {
            Self::Plane => {
                let normal = view.forward();
                for pointer in [request.start_pointer, request.current_pointer] {
                    let ray = view
                        .ray_from_viewport(pointer)
                        .ok_or(ProjectionError::DegenerateViewport)?;
                    if ray.direction.dot(normal).abs() < PLANE_PARALLEL_EPSILON {
                        return Err(ProjectionError::ParallelPlane);
                    }
                }
                Ok(())
            }
            Self::ScreenSpace => {
                let size = view.viewport.size();
                if size.x <= 0.0 || size.y <= 0.0 {
                    return Err(ProjectionError::DegenerateViewport);
                }
                let distance = view.position().distance(request.start_position);
                if distance < MIN_PROJECTION_CAMERA_DISTANCE {
                    return Err(ProjectionError::CameraTooClose { distance });
                }
                Ok(())
            }
        }
    }

    pub fn project(
        &self,
        view: &ViewSnapshot,
        request: &DragRequest,
    ) -> Result<Vec3, ProjectionError> {
        match self {
            Self::Plane => {
                let normal = view.forward();
                let start_hit = intersect_drag_plane(view, request.start_pointer, request, normal)?;
                let current_hit =
                    intersect_drag_plane(view, request.current_pointer, request, normal)?;
                Ok(request.start_position + (current_hit - start_hit))
            }
            Self::ScreenSpace => {
                let distance = view.position().distance(request.start_position);
                let world_per_pixel = (2.0 * distance * (view.fov * 0.5).tan()
                    / view.viewport.height())
                .min(SCREEN_SPACE_MAX_SCALE);
                let delta = request.current_pointer - request.start_pointer;
                Ok(request.start_position
                    + view.right() * delta.x * world_per_pixel
                    + view.up() * -delta.y * world_per_pixel)
            }
        }
    }
}

fn intersect_drag_plane(
    view: &ViewSnapshot,
    pointer: Vec2,
    request: &DragRequest,
    normal: Vec3,
) -> Result<Vec3, ProjectionError> {
    let ray = view
        .ray_from_viewport(pointer)
        .ok_or(ProjectionError::DegenerateViewport)?;
    let denom = ray.direction.dot(normal);
    if denom.abs() < PLANE_PARALLEL_EPSILON {
        return Err(ProjectionError::ParallelPlane);
    }
    let t = (request.start_position - ray.origin).dot(normal) / denom;
    if t < 0.0 {
        return Err(ProjectionError::BehindCamera);
    }
    Ok(ray.origin + ray.direction * t)
}

/// First strategy whose precondition holds and whose result is finite.
pub fn project_with(
    strategies: &[ProjectionStrategy],
    view: &ViewSnapshot,
    request: &DragRequest,
) -> Result<Vec3, ProjectionError> {
    let mut last_error = ProjectionError::NoStrategy;
    for strategy in strategies {
        match strategy
            .check(view, request)
            .and_then(|_| strategy.project(view, request))
        {
            Ok(position) if position.is_finite() => return Ok(position),
            Ok(_) => last_error = ProjectionError::NonFinite,
            Err(error) => {
                debug!("{strategy:?} drag projection skipped: {error}");
                last_error = error;
            }
        }
    }
    Err(last_error)
}

/// Drag projection against the camera as of the current pointer event.
pub struct ViewProjector {
    pub view: Option<ViewSnapshot>,
}

impl DragProjector for ViewProjector {
    fn project(&self, request: &DragRequest) -> Result<Vec3, ProjectionError> {
        let view = self.view.as_ref().ok_or(ProjectionError::CameraUnavailable)?;
        project_with(&DEFAULT_STRATEGIES, view, request)
    }
}

/// Clamps a projected position to `max_radius` from the origin.
pub fn clamp_drag_position(position: Vec3, max_radius: f32) -> Result<Vec3, ProjectionError> {
    if !position.is_finite() {
        return Err(ProjectionError::NonFinite);
    }
    Ok(position.clamp_length_max(max_radius.max(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::picking::ray::test_support::looking_at;

    fn front_camera() -> ViewSnapshot {
        looking_at(Vec3::new(0.0, 0.0, 50.0), Vec3::ZERO, Vec2::new(800.0, 600.0))
    }

    fn request_from(view: &ViewSnapshot, anchor: Vec3, pixel_delta: Vec2) -> DragRequest {
        let start_pointer = view.world_to_viewport(anchor).unwrap();
        DragRequest {
            start_position: anchor,
            start_pointer,
            current_pointer: start_pointer + pixel_delta,
        }
    }

    #[test]
    fn horizontal_pointer_motion_moves_along_camera_right() {
        let view = front_camera();
        let anchor = Vec3::new(10.0, 0.0, 0.0);
        let request = request_from(&view, anchor, Vec2::new(80.0, 0.0));

        let moved = project_with(&DEFAULT_STRATEGIES, &view, &request).unwrap();
        let delta = moved - anchor;
        assert!(delta.x > 1.0);
        assert!(delta.y.abs() < 1e-3);
        assert!(delta.z.abs() < 1e-3);
    }

    #[test]
    fn plane_projection_keeps_anchor_depth_and_tracks_pointer() {
        let view = looking_at(Vec3::new(0.0, 30.0, 40.0), Vec3::ZERO, Vec2::new(800.0, 600.0));
        let anchor = Vec3::new(5.0, 1.0, -2.0);
        let request = request_from(&view, anchor, Vec2::new(-40.0, 25.0));

        let moved = ProjectionStrategy::Plane.project(&view, &request).unwrap();
        // Stays on the camera-facing plane through the anchor.
        assert!((moved - anchor).dot(view.forward()).abs() < 1e-3);
        // Lands back under the pointer.
        let pixel = view.world_to_viewport(moved).unwrap();
        assert!(pixel.distance(request.current_pointer) < 0.05);
    }

    #[test]
    fn zero_pointer_delta_returns_anchor() {
        let view = front_camera();
        let anchor = Vec3::new(-3.0, 2.0, 4.0);
        let request = request_from(&view, anchor, Vec2::ZERO);
        let moved = project_with(&DEFAULT_STRATEGIES, &view, &request).unwrap();
        assert!(moved.distance(anchor) < 1e-3);
    }

    #[test]
    fn screen_space_fallback_runs_when_plane_precondition_fails() {
        let mut view = front_camera();
        let anchor = Vec3::new(10.0, 0.0, 0.0);
        let request = request_from(&view, anchor, Vec2::new(100.0, 0.0));

        // A zero-height viewport breaks ray construction and the fallback alike.
        view.viewport = Rect::from_corners(Vec2::ZERO, Vec2::new(800.0, 0.0));
        assert_eq!(
            ProjectionStrategy::Plane.check(&view, &request),
            Err(ProjectionError::DegenerateViewport)
        );
        assert_eq!(
            project_with(&DEFAULT_STRATEGIES, &view, &request),
            Err(ProjectionError::DegenerateViewport)
        );

        // Screen space alone on a healthy view moves along camera right.
        let view = front_camera();
        let moved = project_with(&[ProjectionStrategy::ScreenSpace], &view, &request).unwrap();
        assert!(moved.x > anchor.x);
        assert!((moved.z - anchor.z).abs() < 1e-5);
    }

    #[test]
    fn screen_space_refuses_anchor_at_camera() {
        let view = front_camera();
        let request = DragRequest {
            start_position: view.position(),
            start_pointer: Vec2::new(400.0, 300.0),
            current_pointer: Vec2::new(410.0, 300.0),
        };
        assert!(matches!(
            ProjectionStrategy::ScreenSpace.check(&view, &request),
            Err(ProjectionError::CameraTooClose { .. })
        ));
    }

    #[test]
    fn projector_without_camera_reports_unavailable() {
        let projector = ViewProjector { view: None };
        let request = DragRequest {
            start_position: Vec3::ZERO,
            start_pointer: Vec2::ZERO,
            current_pointer: Vec2::ONE,
        };
        assert_eq!(
            projector.project(&request),
            Err(ProjectionError::CameraUnavailable)
        );
    }

    #[test]
    fn clamp_limits_radius_and_rejects_nan() {
        let clamped = clamp_drag_position(Vec3::new(300.0, 0.0, 400.0), 100.0).unwrap();
        assert!((clamped.length() - 100.0).abs() < 1e-3);
        assert_eq!(clamp_drag_position(Vec3::X, 100.0), Ok(Vec3::X));
        assert_eq!(
            clamp_drag_position(Vec3::new(f32::NAN, 0.0, 0.0), 100.0),
            Err(ProjectionError::NonFinite)
        );
    }
}
