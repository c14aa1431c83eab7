/// View and projection matrix construction
use log::warn;
use nalgebra::{Matrix4, Vector3};

use crate::error::ProjectionError;

/// Normalization threshold for look-at basis vectors.
const BASIS_EPSILON: f32 = 1e-6;

/// Explicit view volume extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParameters {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl ProjectionParameters {
    /// Volume centered on the view axis.
    pub fn symmetric(half_width: f32, half_height: f32, near: f32, far: f32) -> Self {
        Self {
            left: -half_width,
            right: half_width,
            bottom: -half_height,
            top: half_height,
            near,
            far,
        }
    }

    /// Reject volumes that would produce a singular matrix.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        let all = [self.left, self.right, self.bottom, self.top, self.near, self.far];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(ProjectionError::NonFinite);
        }
        if self.right - self.left == 0.0 {
            return Err(ProjectionError::ZeroWidth);
        }
        if self.top - self.bottom == 0.0 {
            return Err(ProjectionError::ZeroHeight);
        }
        if self.far - self.near == 0.0 {
            return Err(ProjectionError::ZeroDepth);
        }
        Ok(())
    }
}

impl Default for ProjectionParameters {
    fn default() -> Self {
        Self::symmetric(1.0, 1.0, 0.1, 100.0)
    }
}

/// Field-of-view description of a symmetric perspective volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveParameters {
    /// Vertical field of view in radians
    pub fovy: f32,
    /// Width over height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveParameters {
    /// The equivalent explicit frustum.
    pub fn to_frustum(&self) -> ProjectionParameters {
        let height = self.near * (self.fovy / 2.0).tan();
        let width = height * self.aspect;
        ProjectionParameters::symmetric(width, height, self.near, self.far)
    }
}

impl Default for PerspectiveParameters {
    fn default() -> Self {
        Self {
            fovy: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Projection configuration a camera was last set up with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Matrix supplied directly by the caller
    Custom,
    Orthographic(ProjectionParameters),
    Frustum(ProjectionParameters),
    Perspective(PerspectiveParameters),
}

impl Projection {
    pub fn matrix(&self) -> Result<Matrix4<f32>, ProjectionError> {
        match self {
            Projection::Custom => Ok(Matrix4::identity()),
            Projection::Orthographic(p) => orthographic(p),
            Projection::Frustum(p) => frustum(p),
            Projection::Perspective(p) => perspective(p),
        }
    }
}

/// Build a view matrix for a camera at `eye` looking at `at`.
///
/// The camera basis is `forward = normalize(eye - at)`,
/// `right = normalize(up x forward)`, `up' = forward x right`. The rows of the
/// result hold that basis and the translation column holds `-basis * eye`, so
/// the matrix is the inverse of the camera's placement in the world.
#[rustfmt::skip]
pub fn look_at(
    eye: &Vector3<f32>,
    at: &Vector3<f32>,
    up: &Vector3<f32>,
) -> Result<Matrix4<f32>, ProjectionError> {
    if !eye.iter().chain(at.iter()).chain(up.iter()).all(|v| v.is_finite()) {
        return Err(ProjectionError::NonFinite);
    }
    let forward = (eye - at)
        .try_normalize(BASIS_EPSILON)
        .ok_or(ProjectionError::ZeroLengthDirection)?;
    let right = up
        .cross(&forward)
        .try_normalize(BASIS_EPSILON)
        .ok_or(ProjectionError::DegenerateUpVector)?;
    let true_up = forward.cross(&right);

    Ok(Matrix4::new(
        right.x, right.y, right.z, -right.dot(eye),
        true_up.x, true_up.y, true_up.z, -true_up.dot(eye),
        forward.x, forward.y, forward.z, -forward.dot(eye),
        0.0, 0.0, 0.0, 1.0,
    ))
}

/// Orthographic projection of an explicit box.
pub fn orthographic(p: &ProjectionParameters) -> Result<Matrix4<f32>, ProjectionError> {
    p.validate().inspect_err(|e| warn!("orthographic projection rejected: {}", e))?;
    Ok(Matrix4::new_orthographic(
        p.left, p.right, p.bottom, p.top, p.near, p.far,
    ))
}

/// Perspective projection of an explicit frustum (`glFrustum` layout).
#[rustfmt::skip]
pub fn frustum(p: &ProjectionParameters) -> Result<Matrix4<f32>, ProjectionError> {
    p.validate().inspect_err(|e| warn!("frustum rejected: {}", e))?;
    let (l, r, b, t, n, f) = (p.left, p.right, p.bottom, p.top, p.near, p.far);
    Ok(Matrix4::new(
        2.0 * n / (r - l), 0.0, (r + l) / (r - l), 0.0,
        0.0, 2.0 * n / (t - b), (t + b) / (t - b), 0.0,
        0.0, 0.0, -(f + n) / (f - n), -2.0 * f * n / (f - n),
        0.0, 0.0, -1.0, 0.0,
    ))
}

/// Perspective projection from a field of view, via the equivalent frustum.
pub fn perspective(p: &PerspectiveParameters) -> Result<Matrix4<f32>, ProjectionError> {
    if ![p.fovy, p.aspect, p.near, p.far].iter().all(|v| v.is_finite()) {
        return Err(ProjectionError::NonFinite);
    }
    frustum(&p.to_frustum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finite(m: &Matrix4<f32>) -> bool {
        m.iter().all(|v| v.is_finite())
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let p = ProjectionParameters {
            left: 1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
            near: 0.1,
            far: 10.0,
        };
        assert_eq!(orthographic(&p), Err(ProjectionError::ZeroWidth));
        assert_eq!(frustum(&p), Err(ProjectionError::ZeroWidth));
    }

    #[test]
    fn test_zero_height_and_depth_are_rejected() {
        let mut p = ProjectionParameters::symmetric(1.0, 0.0, 0.1, 10.0);
        assert_eq!(frustum(&p), Err(ProjectionError::ZeroHeight));
        p = ProjectionParameters::symmetric(1.0, 1.0, 2.0, 2.0);
        assert_eq!(orthographic(&p), Err(ProjectionError::ZeroDepth));
        p.near = f32::NAN;
        assert_eq!(orthographic(&p), Err(ProjectionError::NonFinite));
    }

    #[test]
    fn test_symmetric_orthographic_maps_corners() {
        let m = orthographic(&ProjectionParameters::symmetric(2.0, 1.0, 0.1, 10.0)).unwrap();
        let corner = m.transform_point(&nalgebra::Point3::new(2.0, 1.0, -0.1));
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
        assert!((corner.z + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_frustum_layout() {
        let m = frustum(&ProjectionParameters::symmetric(1.0, 1.0, 1.0, 3.0)).unwrap();
        assert!(finite(&m));
        assert!((m[(0, 0)] - 1.0).abs() < 1e-6);
        assert!((m[(2, 2)] + 2.0).abs() < 1e-6);
        assert!((m[(2, 3)] + 3.0).abs() < 1e-6);
        assert_eq!(m[(3, 2)], -1.0);
        assert_eq!(m[(3, 3)], 0.0);
    }

    #[test]
    fn test_perspective_delegates_to_frustum() {
        let p = PerspectiveParameters {
            fovy: std::f32::consts::FRAC_PI_2,
            aspect: 2.0,
            near: 1.0,
            far: 10.0,
        };
        let f = p.to_frustum();
        assert!((f.top - 1.0).abs() < 1e-6);
        assert!((f.right - 2.0).abs() < 1e-6);
        assert_eq!(perspective(&p).unwrap(), frustum(&f).unwrap());

        let flat = PerspectiveParameters { aspect: 0.0, ..p };
        assert_eq!(perspective(&flat), Err(ProjectionError::ZeroWidth));
    }

    #[test]
    fn test_look_at_axis_aligned() {
        let view = look_at(
            &Vector3::new(0.0, 0.0, 5.0),
            &Vector3::zeros(),
            &Vector3::y(),
        )
        .unwrap();
        let expected = Matrix4::new_translation(&Vector3::new(0.0, 0.0, -5.0));
        assert!((view - expected).norm() < 1e-6);
    }

    #[test]
    fn test_look_at_places_target_on_negative_z() {
        let eye = Vector3::new(2.0, 2.0, 2.0);
        let view = look_at(&eye, &Vector3::zeros(), &Vector3::y()).unwrap();
        let target = view.transform_point(&nalgebra::Point3::origin());
        assert!(target.x.abs() < 1e-5);
        assert!(target.y.abs() < 1e-5);
        assert!((target.z + eye.norm()).abs() < 1e-5);
    }

    #[test]
    fn test_look_at_degenerate() {
        let eye = Vector3::new(0.0, 3.0, 0.0);
        assert_eq!(
            look_at(&eye, &Vector3::zeros(), &Vector3::y()),
            Err(ProjectionError::DegenerateUpVector)
        );
        assert_eq!(
            look_at(&eye, &eye, &Vector3::y()),
            Err(ProjectionError::ZeroLengthDirection)
        );
    }
}
