/// 3D transformation matrices and the composable operators built on them
use log::debug;
use nalgebra::{Matrix4, Unit, Vector3};

use crate::error::TransformError;

/// Axis selector for translations and rotations.
///
/// The compound variants move along (or rotate about) the diagonal spanned by
/// both named axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
    XY,
    YZ,
    ZX,
}

impl Axis {
    /// Unnormalized direction of the axis in world coordinates.
    pub fn direction(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
            Axis::XY => Vector3::new(1.0, 1.0, 0.0),
            Axis::YZ => Vector3::new(0.0, 1.0, 1.0),
            Axis::ZX => Vector3::new(1.0, 0.0, 1.0),
        }
    }
}

/// Pivot used by scale and rotate operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Relative {
    /// Pivot about the entity's current position
    #[default]
    Local,
    /// Pivot about the world origin
    World,
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Right-handed rotation of `angle` radians about `axis`
    pub fn rotation_matrix(axis: Axis, angle: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&Unit::new_normalize(axis.direction()), angle)
    }

    /// Translation by `amount` along `axis`
    pub fn translation_matrix(axis: Axis, amount: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&(axis.direction() * amount))
    }

    /// Uniform scale matrix
    pub fn scale_matrix(factor: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(factor)
    }

    /// Wrap `op` so it acts about `pivot` instead of the origin:
    /// `T(pivot) * op * T(-pivot)`
    pub fn about_pivot(op: &Matrix4<f32>, pivot: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(pivot) * op * Matrix4::new_translation(&-pivot)
    }

    /// Translation column of an affine matrix
    pub fn position(matrix: &Matrix4<f32>) -> Vector3<f32> {
        Vector3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)])
    }

    /// Full vertex pipeline: `Projection * View * World * Model`
    pub fn pipeline_matrix(
        projection: &Matrix4<f32>,
        view: &Matrix4<f32>,
        world: &Matrix4<f32>,
        model: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * world * model
    }
}

/// An entity placed by a cumulative 4x4 transformation.
///
/// Operators compose in front of the current matrix (`new = op * current`);
/// the matrix is never rebuilt from scratch. Every operator returns the
/// committed matrix. Arguments that would make the matrix singular or
/// non-finite are rejected and leave it untouched.
pub trait Transformable {
    fn transformation(&self) -> &Matrix4<f32>;

    fn set_transformation(&mut self, transformation: Matrix4<f32>);

    /// Left-multiply `op` onto the current transformation
    fn compose(&mut self, op: &Matrix4<f32>) -> Matrix4<f32> {
        let next = op * self.transformation();
        self.set_transformation(next);
        next
    }

    /// Move along a world axis
    fn translate(&mut self, axis: Axis, amount: f32) -> Result<Matrix4<f32>, TransformError> {
        if !amount.is_finite() {
            return Err(TransformError::NonFinite);
        }
        debug!("translate {:?} by {}", axis, amount);
        Ok(self.compose(&Transform::translation_matrix(axis, amount)))
    }

    /// Uniform scale. `World` scales about the origin and so also scales the
    /// entity's position; `Local` scales in place.
    fn scale(&mut self, factor: f32, relative: Relative) -> Result<Matrix4<f32>, TransformError> {
        if !factor.is_finite() {
            return Err(TransformError::NonFinite);
        }
        if factor == 0.0 {
            return Err(TransformError::ZeroScale);
        }
        debug!("scale by {} ({:?})", factor, relative);
        let op = Transform::scale_matrix(factor);
        let op = match relative {
            Relative::Local => {
                let pivot = Transform::position(self.transformation());
                Transform::about_pivot(&op, &pivot)
            }
            Relative::World => op,
        };
        Ok(self.compose(&op))
    }

    /// Rotate about an axis through the entity's current position or through
    /// the world origin
    fn rotate(
        &mut self,
        axis: Axis,
        angle: f32,
        relative: Relative,
    ) -> Result<Matrix4<f32>, TransformError> {
        if !angle.is_finite() {
            return Err(TransformError::NonFinite);
        }
        debug!("rotate {:?} by {} rad ({:?})", axis, angle, relative);
        let op = Transform::rotation_matrix(axis, angle);
        let op = match relative {
            Relative::Local => {
                // Pivot is re-read every call so cumulative history is respected
                let pivot = Transform::position(self.transformation());
                Transform::about_pivot(&op, &pivot)
            }
            Relative::World => op,
        };
        Ok(self.compose(&op))
    }
}
