//! Scene graph: ordered entity collections with one active selection each,
//! a shared world transformation and display toggles.
//!
//! Every transform operator addresses an entity through the active index of
//! its collection. With nothing selected the operator does nothing and
//! returns `None`.

use std::fmt;

use log::{debug, info};
use nalgebra::{Matrix4, Vector3};

use crate::camera::Camera;
use crate::color::Color;
use crate::error::{RenderError, SceneError};
use crate::geometry::MeshModel;
use crate::light::Light;
use crate::primitives::Primitive;
use crate::projection::{PerspectiveParameters, ProjectionParameters};
use crate::transform::{Axis, Relative, Transformable};

/// The three entity collections of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Model,
    Camera,
    Light,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Model => write!(f, "model"),
            EntityKind::Camera => write!(f, "camera"),
            EntityKind::Light => write!(f, "light"),
        }
    }
}

/// Target of a transform operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// The shared world transformation
    World,
    Camera,
    Model,
    Light,
}

impl Frame {
    pub fn entity_kind(self) -> Option<EntityKind> {
        match self {
            Frame::World => None,
            Frame::Camera => Some(EntityKind::Camera),
            Frame::Model => Some(EntityKind::Model),
            Frame::Light => Some(EntityKind::Light),
        }
    }
}

/// Ordered entities with an optional active selection.
///
/// `active` is `None` exactly when nothing is selected; it always indexes a
/// live entry otherwise.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    active: Option<usize>,
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            active: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Append and select the new entry.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push(item);
        let index = self.items.len() - 1;
        self.active = Some(index);
        index
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Out-of-range requests are ignored.
    pub fn set_active_index(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> Option<&T> {
        self.active.and_then(|i| self.items.get(i))
    }

    pub fn active_mut(&mut self) -> Option<&mut T> {
        self.active.and_then(|i| self.items.get_mut(i))
    }

    /// Advance the selection circularly. `None` when empty.
    pub fn select_next(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        let next = match self.active {
            Some(i) => (i + 1) % self.items.len(),
            None => 0,
        };
        self.active = Some(next);
        Some(next)
    }

    /// Remove the active entry and select the new last one.
    pub fn remove_active(&mut self) -> Option<T> {
        let index = self.active?;
        let removed = self.items.remove(index);
        self.active = self.items.len().checked_sub(1);
        Some(removed)
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-display toggles and colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayOptions {
    pub show_vertex_normals: bool,
    pub show_face_normals: bool,
    pub show_bounding_cube: bool,
    pub show_wireframe: bool,
    pub background_color: Color,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_vertex_normals: false,
            show_face_normals: false,
            show_bounding_cube: false,
            show_wireframe: true,
            background_color: Color::BLACK,
        }
    }
}

/// The world transformation, addressable through the same operators as
/// entities.
#[derive(Debug, Clone)]
struct WorldFrame(Matrix4<f32>);

impl Transformable for WorldFrame {
    fn transformation(&self) -> &Matrix4<f32> {
        &self.0
    }

    fn set_transformation(&mut self, transformation: Matrix4<f32>) {
        self.0 = transformation;
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    models: Collection<MeshModel>,
    cameras: Collection<Camera>,
    lights: Collection<Light>,
    world: WorldFrame,
    display: DisplayOptions,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            models: Collection::new(),
            cameras: Collection::new(),
            lights: Collection::new(),
            world: WorldFrame(Matrix4::identity()),
            display: DisplayOptions::default(),
        }
    }

    pub fn models(&self) -> &Collection<MeshModel> {
        &self.models
    }

    pub fn cameras(&self) -> &Collection<Camera> {
        &self.cameras
    }

    pub fn lights(&self) -> &Collection<Light> {
        &self.lights
    }

    pub fn display(&self) -> &DisplayOptions {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayOptions {
        &mut self.display
    }

    pub fn world_transformation(&self) -> &Matrix4<f32> {
        &self.world.0
    }

    pub fn set_world_transformation(&mut self, world: Matrix4<f32>) {
        self.world.0 = world;
    }

    pub fn add_model(&mut self, model: MeshModel) -> usize {
        info!("adding model '{}'", model.name());
        self.models.push(model)
    }

    pub fn add_primitive_model(&mut self, primitive: Primitive) -> Result<usize, SceneError> {
        Ok(self.add_model(primitive.build()?))
    }

    pub fn add_camera(&mut self, camera: Camera) -> usize {
        info!("adding camera at {:?}", camera.position());
        self.cameras.push(camera)
    }

    pub fn add_light(&mut self, light: Light) -> usize {
        info!("adding {:?} light", light.source());
        self.lights.push(light)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Model => self.models.len(),
            EntityKind::Camera => self.cameras.len(),
            EntityKind::Light => self.lights.len(),
        }
    }

    pub fn active_index(&self, kind: EntityKind) -> Option<usize> {
        match kind {
            EntityKind::Model => self.models.active_index(),
            EntityKind::Camera => self.cameras.active_index(),
            EntityKind::Light => self.lights.active_index(),
        }
    }

    pub fn set_active_index(&mut self, kind: EntityKind, index: usize) -> bool {
        match kind {
            EntityKind::Model => self.models.set_active_index(index),
            EntityKind::Camera => self.cameras.set_active_index(index),
            EntityKind::Light => self.lights.set_active_index(index),
        }
    }

    /// Cycle the selection forward.
    pub fn select_next(&mut self, kind: EntityKind) -> Result<usize, SceneError> {
        let next = match kind {
            EntityKind::Model => self.models.select_next(),
            EntityKind::Camera => self.cameras.select_next(),
            EntityKind::Light => self.lights.select_next(),
        };
        let next = next.ok_or(SceneError::EmptyCollection(kind))?;
        debug!("active {} is now {}", kind, next);
        Ok(next)
    }

    /// Delete the active entity. Returns false when nothing was selected.
    pub fn delete_active(&mut self, kind: EntityKind) -> bool {
        let removed = match kind {
            EntityKind::Model => self.models.remove_active().is_some(),
            EntityKind::Camera => self.cameras.remove_active().is_some(),
            EntityKind::Light => self.lights.remove_active().is_some(),
        };
        if removed {
            info!("deleted active {}, {} left", kind, self.count(kind));
        }
        removed
    }

    pub fn active_model(&self) -> Option<&MeshModel> {
        self.models.active()
    }

    pub fn active_camera(&self) -> Option<&Camera> {
        self.cameras.active()
    }

    pub fn active_camera_mut(&mut self) -> Option<&mut Camera> {
        self.cameras.active_mut()
    }

    pub fn active_light(&self) -> Option<&Light> {
        self.lights.active()
    }

    /// Transformation of the active entity of `frame`, for display.
    pub fn active_transformation(&self, frame: Frame) -> Option<Matrix4<f32>> {
        match frame {
            Frame::World => Some(self.world.0),
            Frame::Model => self.models.active().map(|m| *m.transformation()),
            Frame::Camera => self.cameras.active().map(|c| *c.transformation()),
            Frame::Light => self.lights.active().map(|l| *l.transformation()),
        }
    }

    fn target_mut(&mut self, frame: Frame) -> Option<&mut dyn Transformable> {
        match frame {
            Frame::World => Some(&mut self.world as &mut dyn Transformable),
            Frame::Model => self.models.active_mut().map(|m| m as &mut dyn Transformable),
            Frame::Camera => self.cameras.active_mut().map(|c| c as &mut dyn Transformable),
            Frame::Light => self.lights.active_mut().map(|l| l as &mut dyn Transformable),
        }
    }

    /// Operators return `Ok(None)` when `frame` has no active entity and an
    /// error, with nothing committed, when the argument is rejected.
    pub fn translate(
        &mut self,
        frame: Frame,
        axis: Axis,
        amount: f32,
    ) -> Result<Option<Matrix4<f32>>, SceneError> {
        Ok(self.target_mut(frame).map(|t| t.translate(axis, amount)).transpose()?)
    }

    /// The world frame always pivots about the origin.
    pub fn scale(
        &mut self,
        frame: Frame,
        factor: f32,
        relative: Relative,
    ) -> Result<Option<Matrix4<f32>>, SceneError> {
        let relative = if frame == Frame::World { Relative::World } else { relative };
        Ok(self.target_mut(frame).map(|t| t.scale(factor, relative)).transpose()?)
    }

    /// The world frame always pivots about the origin.
    pub fn rotate(
        &mut self,
        frame: Frame,
        axis: Axis,
        angle: f32,
        relative: Relative,
    ) -> Result<Option<Matrix4<f32>>, SceneError> {
        let relative = if frame == Frame::World { Relative::World } else { relative };
        Ok(self.target_mut(frame).map(|t| t.rotate(axis, angle, relative)).transpose()?)
    }

    pub fn set_orthographic_projection(
        &mut self,
        parameters: ProjectionParameters,
    ) -> Result<Option<Matrix4<f32>>, SceneError> {
        match self.cameras.active_mut() {
            Some(camera) => Ok(Some(camera.set_orthographic_projection(parameters)?)),
            None => Ok(None),
        }
    }

    pub fn set_frustum_view_volume(
        &mut self,
        parameters: ProjectionParameters,
    ) -> Result<Option<Matrix4<f32>>, SceneError> {
        match self.cameras.active_mut() {
            Some(camera) => Ok(Some(camera.set_frustum_view_volume(parameters)?)),
            None => Ok(None),
        }
    }

    pub fn set_perspective_projection(
        &mut self,
        parameters: PerspectiveParameters,
    ) -> Result<Option<Matrix4<f32>>, SceneError> {
        match self.cameras.active_mut() {
            Some(camera) => Ok(Some(camera.set_perspective_projection(parameters)?)),
            None => Ok(None),
        }
    }

    /// Re-aim the active camera. Returns its new placement.
    pub fn set_camera_look_at(
        &mut self,
        eye: &Vector3<f32>,
        at: &Vector3<f32>,
        up: &Vector3<f32>,
    ) -> Result<Option<Matrix4<f32>>, SceneError> {
        match self.cameras.active_mut() {
            Some(camera) => {
                camera.set_look_at(eye, at, up)?;
                Ok(Some(*camera.transformation()))
            }
            None => Ok(None),
        }
    }

    /// Show or hide the active camera's proxy.
    pub fn set_camera_proxy_visible(&mut self, visible: bool) -> bool {
        match self.cameras.active_mut() {
            Some(camera) => {
                camera.set_proxy_visible(visible);
                true
            }
            None => false,
        }
    }

    /// Whether the camera at `index` draws its proxy.
    pub fn should_render_camera(&self, index: usize) -> bool {
        self.cameras
            .get(index)
            .map(|c| c.is_proxy_visible())
            .unwrap_or(false)
    }

    /// View and projection of the active camera, identity without one.
    pub fn active_view_projection(&self) -> Result<(Matrix4<f32>, Matrix4<f32>), RenderError> {
        match self.cameras.active() {
            Some(camera) => Ok((camera.view_transformation()?, *camera.projection_matrix())),
            None => Ok((Matrix4::identity(), Matrix4::identity())),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::light::LightSource;
    use crate::transform::Transform;
    use std::f32::consts::FRAC_PI_2;

    fn scene_with_cameras(count: usize) -> Scene {
        let mut scene = Scene::new();
        for i in 0..count {
            let eye = Vector3::new(0.0, 0.0, 2.0 + i as f32);
            scene.add_camera(Camera::looking_at(&eye, &Vector3::zeros(), &Vector3::y()).unwrap());
        }
        scene
    }

    #[test]
    fn test_add_selects_new_entity() {
        let mut scene = Scene::new();
        assert_eq!(scene.active_index(EntityKind::Model), None);
        scene.add_primitive_model(Primitive::Cube).unwrap();
        let index = scene.add_primitive_model(Primitive::Sphere).unwrap();
        assert_eq!(index, 1);
        assert_eq!(scene.active_index(EntityKind::Model), Some(1));
        assert_eq!(scene.active_model().unwrap().name(), "sphere");
    }

    #[test]
    fn test_next_camera_is_circular() {
        let mut scene = scene_with_cameras(3);
        let start = scene.active_index(EntityKind::Camera).unwrap();
        for _ in 0..3 {
            scene.select_next(EntityKind::Camera).unwrap();
        }
        assert_eq!(scene.active_index(EntityKind::Camera), Some(start));
    }

    #[test]
    fn test_next_on_empty_collection_fails() {
        let mut scene = Scene::new();
        assert_eq!(
            scene.select_next(EntityKind::Light),
            Err(SceneError::EmptyCollection(EntityKind::Light))
        );
    }

    #[test]
    fn test_delete_reselects_last() {
        let mut scene = scene_with_cameras(3);
        scene.set_active_index(EntityKind::Camera, 0);
        assert!(scene.delete_active(EntityKind::Camera));
        assert_eq!(scene.count(EntityKind::Camera), 2);
        assert_eq!(scene.active_index(EntityKind::Camera), Some(1));

        assert!(scene.delete_active(EntityKind::Camera));
        assert!(scene.delete_active(EntityKind::Camera));
        assert_eq!(scene.active_index(EntityKind::Camera), None);
        assert!(!scene.delete_active(EntityKind::Camera));
    }

    #[test]
    fn test_set_active_ignores_out_of_range() {
        let mut scene = scene_with_cameras(2);
        assert!(!scene.set_active_index(EntityKind::Camera, 5));
        assert_eq!(scene.active_index(EntityKind::Camera), Some(1));
    }

    #[test]
    fn test_operators_without_selection_are_noops() {
        let mut scene = Scene::new();
        assert_eq!(scene.translate(Frame::Model, Axis::X, 1.0), Ok(None));
        assert_eq!(scene.rotate(Frame::Camera, Axis::Y, 1.0, Relative::Local), Ok(None));
        assert_eq!(scene.scale(Frame::Light, 2.0, Relative::World), Ok(None));
        assert_eq!(
            scene.set_orthographic_projection(ProjectionParameters::default()),
            Ok(None)
        );
    }

    #[test]
    fn test_operators_reach_active_entity_only() {
        let mut scene = Scene::new();
        scene.add_primitive_model(Primitive::Cube).unwrap();
        scene.add_primitive_model(Primitive::Cube).unwrap();
        scene.translate(Frame::Model, Axis::X, 5.0).unwrap().unwrap();

        let first = scene.models().get(0).unwrap();
        let second = scene.models().get(1).unwrap();
        assert_eq!(first.transformation(), &Matrix4::identity());
        assert!((Transform::position(second.transformation()).x - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_model_rotation_pivots() {
        let mut scene = Scene::new();
        scene.add_primitive_model(Primitive::Cube).unwrap();
        scene.translate(Frame::Model, Axis::X, 5.0).unwrap();
        let local = scene
            .rotate(Frame::Model, Axis::Y, FRAC_PI_2, Relative::Local)
            .unwrap()
            .unwrap();
        assert!((Transform::position(&local) - Vector3::new(5.0, 0.0, 0.0)).norm() < 1e-5);
        let world = scene
            .rotate(Frame::Model, Axis::Y, FRAC_PI_2, Relative::World)
            .unwrap()
            .unwrap();
        assert!((Transform::position(&world) - Vector3::new(0.0, 0.0, -5.0)).norm() < 1e-5);
    }

    #[test]
    fn test_world_frame_always_pivots_at_origin() {
        let mut scene = Scene::new();
        scene.translate(Frame::World, Axis::X, 2.0).unwrap();
        let world = scene.scale(Frame::World, 2.0, Relative::Local).unwrap().unwrap();
        assert!((Transform::position(&world).x - 4.0).abs() < 1e-6);
        assert_eq!(scene.world_transformation(), &world);
    }

    #[test]
    fn test_rejected_transform_is_not_committed() {
        let mut scene = Scene::new();
        scene.add_primitive_model(Primitive::Cube).unwrap();
        scene.add_camera(Camera::new().unwrap());
        let camera_before = scene.active_transformation(Frame::Camera).unwrap();
        let model_before = scene.active_transformation(Frame::Model).unwrap();

        assert_eq!(
            scene.scale(Frame::Camera, 0.0, Relative::Local),
            Err(SceneError::Transform(TransformError::ZeroScale))
        );
        assert_eq!(
            scene.translate(Frame::Model, Axis::X, f32::NAN),
            Err(SceneError::Transform(TransformError::NonFinite))
        );
        assert!(scene.rotate(Frame::World, Axis::Z, f32::INFINITY, Relative::World).is_err());

        assert_eq!(scene.active_transformation(Frame::Camera), Some(camera_before));
        assert_eq!(scene.active_transformation(Frame::Model), Some(model_before));
        assert_eq!(scene.world_transformation(), &Matrix4::identity());
        assert!(scene.active_view_projection().is_ok());
    }

    #[test]
    fn test_rejected_projection_reports_error() {
        let mut scene = scene_with_cameras(1);
        let good = ProjectionParameters::symmetric(1.0, 1.0, 0.1, 10.0);
        let matrix = scene.set_orthographic_projection(good).unwrap().unwrap();
        let bad = ProjectionParameters { top: -1.0, ..good };
        assert!(scene.set_frustum_view_volume(bad).is_err());
        assert_eq!(scene.active_camera().unwrap().projection_matrix(), &matrix);
    }

    #[test]
    fn test_camera_proxy_visibility() {
        let mut scene = scene_with_cameras(2);
        assert!(!scene.should_render_camera(1));
        assert!(scene.set_camera_proxy_visible(true));
        assert!(scene.should_render_camera(1));
        assert!(!scene.should_render_camera(0));
        assert!(!scene.should_render_camera(9));
    }

    #[test]
    fn test_lights_are_selectable() {
        let mut scene = Scene::new();
        scene.add_light(Light::new(LightSource::Point, &Vector3::new(1.0, 1.0, 1.0)).unwrap());
        scene.add_light(Light::new(LightSource::Parallel, &Vector3::zeros()).unwrap());
        assert_eq!(scene.select_next(EntityKind::Light), Ok(0));
        assert_eq!(scene.active_light().unwrap().source(), LightSource::Point);
    }

    #[test]
    fn test_view_projection_defaults_to_identity() {
        let scene = Scene::new();
        let (view, projection) = scene.active_view_projection().unwrap();
        assert_eq!(view, Matrix4::identity());
        assert_eq!(projection, Matrix4::identity());
    }
}
