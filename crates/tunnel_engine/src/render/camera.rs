//! # 3D Camera
//!
//! Perspective camera used to turn a click into a world-space ray. The camera
//! path animation lives in the renderer; this type only mirrors its current
//! pose each frame.
//!
//! # Coordinate System
//! Right-handed, Y-up, looking down -Z by default. NDC follows the OpenGL
//! convention: X and Y in [-1, 1] with +Y up, Z in [-1, 1] near to far.

use crate::foundation::math::{Vec3, Vec4, Mat4, Point3, utils};
use crate::physics::Ray;

/// Perspective camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera looking down -Z
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: position - Vec3::z(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// Perspective projection
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined projection × view
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Convert NDC coordinates to a world-space ray from the camera
    ///
    /// Returns `None` when the camera is degenerate (e.g. target equals
    /// position) and the view-projection matrix cannot be inverted.
    pub fn screen_to_world_ray(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inv_view_proj = self.view_projection_matrix().try_inverse()?;

        let near_h = inv_view_proj * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_h = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if near_h.w.abs() <= f32::EPSILON || far_h.w.abs() <= f32::EPSILON {
            return None;
        }

        let world_near = near_h.xyz() / near_h.w;
        let world_far = far_h.xyz() / far_h.w;
        let direction = world_far - world_near;
        if !utils::is_finite(&direction) || direction.magnitude_squared() <= f32::EPSILON {
            return None;
        }

        Some(Ray::new(self.position, direction))
    }
}

impl Default for Camera {
    /// Viewer sits just behind the pass line, looking down the tunnel
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 0.0, 8.0), 75.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}
