//! Math utilities and types
//!
//! Thin aliases over nalgebra used by the tunnel simulation. The tunnel runs
//! along the Z axis: targets spawn far down -Z and travel toward +Z, past the
//! camera.

pub use nalgebra::{Vector3, Vector4, Matrix4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math utility functions
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Whether every component is finite
    pub fn is_finite(v: &super::Vec3) -> bool {
        v.iter().all(|x| x.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deg_to_rad() {
        assert!((utils::deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_is_finite() {
        assert!(utils::is_finite(&Vec3::new(1.0, -2.0, 3.0)));
        assert!(!utils::is_finite(&Vec3::new(f32::NAN, 0.0, 0.0)));
    }
}
