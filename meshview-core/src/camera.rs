/// Scene cameras: placement, view and projection state plus an on-screen proxy
use log::{debug, warn};
use nalgebra::{Matrix4, Vector3};

use crate::error::{ProjectionError, RenderError, SceneError};
use crate::geometry::MeshModel;
use crate::primitives::Primitive;
use crate::projection::{self, PerspectiveParameters, Projection, ProjectionParameters};
use crate::transform::{Transform, Transformable};

/// A camera in the scene.
///
/// The stored transformation is the camera's placement in the world; the
/// view matrix handed to the rasterizer is its inverse. A projection is only
/// committed after it has been validated, so a rejected configuration keeps
/// the last valid one.
#[derive(Debug, Clone)]
pub struct Camera {
    transformation: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
    projection: Projection,
    proxy: MeshModel,
    show_proxy: bool,
}

impl Camera {
    /// Camera at the origin looking down -Z with identity projection.
    pub fn new() -> Result<Self, SceneError> {
        Ok(Self {
            transformation: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
            projection: Projection::Custom,
            proxy: Primitive::Camera.build()?,
            show_proxy: false,
        })
    }

    /// Camera at `eye` looking at `at`.
    pub fn looking_at(
        eye: &Vector3<f32>,
        at: &Vector3<f32>,
        up: &Vector3<f32>,
    ) -> Result<Self, SceneError> {
        let mut camera = Self::new()?;
        camera.set_look_at(eye, at, up)?;
        Ok(camera)
    }

    /// Replace the placement with a look-at basis.
    pub fn set_look_at(
        &mut self,
        eye: &Vector3<f32>,
        at: &Vector3<f32>,
        up: &Vector3<f32>,
    ) -> Result<(), ProjectionError> {
        let view = projection::look_at(eye, at, up)
            .inspect_err(|e| warn!("look-at rejected: {}", e))?;
        self.set_view_transformation(&view)
    }

    /// Set the view matrix directly. Must be invertible.
    pub fn set_view_transformation(&mut self, view: &Matrix4<f32>) -> Result<(), ProjectionError> {
        let placement = view.try_inverse().ok_or(ProjectionError::SingularView)?;
        self.transformation = placement;
        debug!("camera placed at {:?}", self.position());
        Ok(())
    }

    /// World-to-camera matrix.
    pub fn view_transformation(&self) -> Result<Matrix4<f32>, RenderError> {
        self.transformation
            .try_inverse()
            .ok_or(RenderError::SingularTransformation("camera view"))
    }

    pub fn position(&self) -> Vector3<f32> {
        Transform::position(&self.transformation)
    }

    pub fn projection_matrix(&self) -> &Matrix4<f32> {
        &self.projection_matrix
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Set a caller-built projection matrix.
    pub fn set_projection(&mut self, matrix: Matrix4<f32>) {
        self.projection_matrix = matrix;
        self.projection = Projection::Custom;
    }

    pub fn set_orthographic_projection(
        &mut self,
        parameters: ProjectionParameters,
    ) -> Result<Matrix4<f32>, ProjectionError> {
        self.commit(Projection::Orthographic(parameters))
    }

    pub fn set_frustum_view_volume(
        &mut self,
        parameters: ProjectionParameters,
    ) -> Result<Matrix4<f32>, ProjectionError> {
        self.commit(Projection::Frustum(parameters))
    }

    pub fn set_perspective_projection(
        &mut self,
        parameters: PerspectiveParameters,
    ) -> Result<Matrix4<f32>, ProjectionError> {
        self.commit(Projection::Perspective(parameters))
    }

    fn commit(&mut self, projection: Projection) -> Result<Matrix4<f32>, ProjectionError> {
        let matrix = projection.matrix()?;
        self.projection_matrix = matrix;
        self.projection = projection;
        debug!("camera projection set to {:?}", projection);
        Ok(matrix)
    }

    pub fn proxy(&self) -> &MeshModel {
        &self.proxy
    }

    /// Moves the proxy's apex onto the origin. Normalization shifts it off
    /// the origin, so without this the placement would not put it at the eye.
    pub fn proxy_anchor(&self) -> Matrix4<f32> {
        match self.proxy.vertices().first() {
            Some(apex) => Matrix4::new_translation(&-apex.coords),
            None => Matrix4::identity(),
        }
    }

    pub fn is_proxy_visible(&self) -> bool {
        self.show_proxy
    }

    pub fn set_proxy_visible(&mut self, visible: bool) {
        self.show_proxy = visible;
    }
}

impl Transformable for Camera {
    fn transformation(&self) -> &Matrix4<f32> {
        &self.transformation
    }

    fn set_transformation(&mut self, transformation: Matrix4<f32>) {
        self.transformation = transformation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Axis, Relative};

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new().unwrap();
        assert_eq!(camera.projection(), &Projection::Custom);
        assert_eq!(camera.view_transformation().unwrap(), Matrix4::identity());
        assert!(!camera.is_proxy_visible());
    }

    #[test]
    fn test_look_at_sets_position() {
        let eye = Vector3::new(2.0, 2.0, 2.0);
        let camera = Camera::looking_at(&eye, &Vector3::zeros(), &Vector3::y()).unwrap();
        assert!((camera.position() - eye).norm() < 1e-5);
    }

    #[test]
    fn test_rejected_projection_keeps_previous() {
        let mut camera = Camera::new().unwrap();
        let valid = ProjectionParameters::symmetric(2.0, 2.0, 0.1, 10.0);
        let committed = camera.set_orthographic_projection(valid).unwrap();

        let mut broken = valid;
        broken.right = broken.left;
        assert_eq!(
            camera.set_frustum_view_volume(broken),
            Err(ProjectionError::ZeroWidth)
        );
        assert_eq!(camera.projection_matrix(), &committed);
        assert_eq!(camera.projection(), &Projection::Orthographic(valid));
    }

    #[test]
    fn test_rejected_look_at_keeps_placement() {
        let mut camera = Camera::new().unwrap();
        camera.translate(Axis::Z, 3.0).unwrap();
        let before = *camera.transformation();
        let up = Vector3::y();
        assert!(camera
            .set_look_at(&Vector3::new(0.0, 1.0, 0.0), &Vector3::zeros(), &up)
            .is_err());
        assert_eq!(camera.transformation(), &before);
    }

    #[test]
    fn test_rotate_self_inverse_law() {
        let mut camera = Camera::new().unwrap();
        camera.rotate(Axis::Y, 0.4, Relative::Local).unwrap();
        camera.rotate(Axis::Y, -0.4, Relative::Local).unwrap();
        assert!((camera.transformation() - Matrix4::identity()).norm() < 1e-5);
    }

    #[test]
    fn test_proxy_anchor_puts_apex_at_eye() {
        let camera = Camera::new().unwrap();
        let apex = camera.proxy().vertices()[0];
        assert!(apex.coords.norm() > 0.1);
        let anchored = camera.proxy_anchor().transform_point(&apex);
        assert!(anchored.coords.norm() < 1e-6);
    }

    #[test]
    fn test_singular_placement_blocks_view() {
        let mut camera = Camera::new().unwrap();
        camera.set_transformation(Matrix4::zeros());
        assert!(camera.view_transformation().is_err());
        assert_eq!(
            camera.set_view_transformation(&Matrix4::zeros()),
            Err(ProjectionError::SingularView)
        );
    }
}
