/// Light entities. They are placed and drawn as proxies; no shading is computed.
use nalgebra::{Matrix4, Vector3};

use crate::color::Color;
use crate::error::MeshError;
use crate::geometry::MeshModel;
use crate::primitives::Primitive;
use crate::transform::{Transform, Transformable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightSource {
    Ambient,
    Point,
    Parallel,
}

#[derive(Debug, Clone)]
pub struct Light {
    source: LightSource,
    color: Color,
    intensity: f32,
    transformation: Matrix4<f32>,
    proxy: MeshModel,
    show_proxy: bool,
}

impl Light {
    pub fn new(source: LightSource, position: &Vector3<f32>) -> Result<Self, MeshError> {
        Ok(Self {
            source,
            color: Color::WHITE,
            intensity: 1.0,
            transformation: Matrix4::new_translation(position),
            proxy: Primitive::Sphere.build()?,
            show_proxy: source != LightSource::Ambient,
        })
    }

    pub fn source(&self) -> LightSource {
        self.source
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
    }

    pub fn position(&self) -> Vector3<f32> {
        Transform::position(&self.transformation)
    }

    pub fn proxy(&self) -> &MeshModel {
        &self.proxy
    }

    pub fn is_proxy_visible(&self) -> bool {
        self.show_proxy
    }

    pub fn set_proxy_visible(&mut self, visible: bool) {
        self.show_proxy = visible;
    }
}

impl Transformable for Light {
    fn transformation(&self) -> &Matrix4<f32> {
        &self.transformation
    }

    fn set_transformation(&mut self, transformation: Matrix4<f32>) {
        self.transformation = transformation;
    }
}
