use bevy::prelude::*;
use std::f32::consts::FRAC_PI_4;

/// Camera state captured for a single pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSnapshot {
    pub world_from_view: Mat4,
    pub clip_from_view: Mat4,
    /// Logical viewport rect in window pixels.
    pub viewport: Rect,
    /// Vertical field of view in radians.
    pub fov: f32,
}

impl ViewSnapshot {
    pub fn from_camera(
        camera: &Camera,
        transform: &GlobalTransform,
        projection: &Projection,
    ) -> Option<Self> {
        let viewport = camera.logical_viewport_rect()?;
        let fov = match projection {
            Projection::Perspective(perspective) => perspective.fov,
            _ => FRAC_PI_4,
        };
        Some(Self {
            world_from_view: transform.compute_matrix(),
            clip_from_view: camera.clip_from_view(),
            viewport,
            fov,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.world_from_view.w_axis.truncate()
    }

    /// View direction, -Z of the camera transform.
    pub fn forward(&self) -> Vec3 {
        -self.world_from_view.z_axis.truncate().normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        self.world_from_view.x_axis.truncate().normalize_or_zero()
    }

    pub fn up(&self) -> Vec3 {
        self.world_from_view.y_axis.truncate().normalize_or_zero()
    }

    /// Window position to NDC. `None` when the viewport is degenerate.
    pub fn viewport_to_ndc(&self, position: Vec2) -> Option<Vec2> {
        let size = self.viewport.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }
        let local = position - self.viewport.min;
        Some(Vec2::new(
            local.x / size.x * 2.0 - 1.0,
            1.0 - local.y / size.y * 2.0,
        ))
    }

    /// World ray through an NDC point, near plane to far plane (reverse-z).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray3d> {
        let world_from_clip = self.world_from_view * self.clip_from_view.inverse();
        let near = world_from_clip.project_point3(ndc.extend(1.0));
        let far = world_from_clip.project_point3(ndc.extend(f32::EPSILON));
        if !near.is_finite() || !far.is_finite() {
            return None;
        }
        let direction = Dir3::new(far - near).ok()?;
        Some(Ray3d::new(near, direction))
    }

    pub fn ray_from_viewport(&self, position: Vec2) -> Option<Ray3d> {
        self.ray_from_ndc(self.viewport_to_ndc(position)?)
    }

    /// Window position of a world point, for placing pointers in tests and overlays.
    pub fn world_to_viewport(&self, world: Vec3) -> Option<Vec2> {
        let clip_from_world = self.clip_from_view * self.world_from_view.inverse();
        let ndc = clip_from_world.project_point3(world);
        if !ndc.is_finite() || ndc.z <= 0.0 {
            return None;
        }
        let size = self.viewport.size();
        Some(
            self.viewport.min
                + Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y),
        )
    }
}

/// Ray–sphere intersection, returns the nearest non-negative t.
pub fn ray_sphere_hit_t(
    ray_origin: Vec3,
    ray_direction: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<f32> {
    let offset = ray_origin - center;
    let a = ray_direction.length_squared();
    if a <= f32::EPSILON {
        return None;
    }
    let half_b = offset.dot(ray_direction);
    let c = offset.length_squared() - radius * radius;
    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let near = (-half_b - root) / a;
    let far = (-half_b + root) / a;
    if far < 0.0 {
        return None;
    }
    Some(if near >= 0.0 { near } else { far })
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray_origin[axis];
        let direction = ray_direction[axis];
        if direction == 0.0 {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / direction;
        let (mut t0, mut t1) = ((min[axis] - origin) * inv, (max[axis] - origin) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}


#[cfg(test)]
mod tests {
    use super::test_support::looking_at;
    use super::*;

    #[test]
    fn centre_of_viewport_casts_along_view_direction() {
        let view = looking_at(Vec3::new(0.0, 0.0, 50.0), Vec3::ZERO, Vec2::new(800.0, 600.0));
        assert_eq!(view.viewport_to_ndc(Vec2::new(400.0, 300.0)), Some(Vec2::ZERO));

        let ray = view.ray_from_viewport(Vec2::new(400.0, 300.0)).unwrap();
        assert!(ray.direction.dot(Vec3::NEG_Z) > 0.9999);
        assert!((ray.origin.z - 49.9).abs() < 1e-3);
    }

    #[test]
    fn world_to_viewport_inverts_ray_construction() {
        let view = looking_at(Vec3::new(0.0, 20.0, 50.0), Vec3::ZERO, Vec2::new(1024.0, 768.0));
        let target = Vec3::new(10.0, 2.0, -3.0);
        let pixel = view.world_to_viewport(target).unwrap();
        let ray = view.ray_from_viewport(pixel).unwrap();

        let to_target = (target - ray.origin).normalize();
        assert!(ray.direction.dot(to_target) > 0.99999);
    }

    #[test]
    fn degenerate_viewport_has_no_ndc() {
        let mut view = looking_at(Vec3::Z * 10.0, Vec3::ZERO, Vec2::new(800.0, 600.0));
        view.viewport = Rect::from_corners(Vec2::ZERO, Vec2::new(0.0, 600.0));
        assert_eq!(view.viewport_to_ndc(Vec2::new(1.0, 1.0)), None);
        assert!(view.ray_from_viewport(Vec2::ZERO).is_none());
    }

    #[test]
    fn sphere_hits_report_front_face_or_exit_from_inside() {
        let t = ray_sphere_hit_t(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::ZERO, 1.0);
        assert_eq!(t, Some(9.0));

        let inside = ray_sphere_hit_t(Vec3::ZERO, Vec3::X, Vec3::ZERO, 2.0);
        assert_eq!(inside, Some(2.0));

        assert_eq!(ray_sphere_hit_t(Vec3::new(0.0, 5.0, 10.0), Vec3::NEG_Z, Vec3::ZERO, 1.0), None);
        assert_eq!(ray_sphere_hit_t(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, Vec3::ZERO, 1.0), None);
    }

    #[test]
    fn slab_test_handles_axis_aligned_rays() {
        let hit = ray_aabb_hit_t(
            Vec3::new(0.5, 0.5, 10.0),
            Vec3::NEG_Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert_eq!(hit, Some(9.0));

        let miss = ray_aabb_hit_t(
            Vec3::new(2.0, 0.0, 10.0),
            Vec3::NEG_Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert_eq!(miss, None);
    }
}
