/// Meshview Core Library - scene, transformation and wireframe rendering logic
///
/// This library holds everything below the presentation layer: mesh
/// normalization, OBJ loading, transform algebra, camera projections, the
/// scene graph and a software line rasterizer writing into a float buffer.

pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod light;
pub mod math;
pub mod obj;
pub mod primitives;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use camera::Camera;
pub use color::Color;
pub use config::RenderConfig;
pub use error::{LoadError, MeshError, ProjectionError, RenderError, SceneError, TransformError};
pub use geometry::{Face, MeshModel};
pub use light::{Light, LightSource};
pub use obj::{load_obj, parse_obj};
pub use primitives::Primitive;
pub use projection::{PerspectiveParameters, Projection, ProjectionParameters};
pub use raster::Rasterizer;
pub use scene::{DisplayOptions, EntityKind, Frame, Scene};
pub use transform::{Axis, Relative, Transform, Transformable};
