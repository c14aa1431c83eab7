/// Rasterizer configuration
use crate::color::Color;

/// Default size of the square region device space is mapped onto.
pub const DEFAULT_DISPLAY_EXTENT: f32 = 500.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Second step of the viewport map: when set, pixel coordinates are
    /// re-centered and re-scaled so device space covers an `extent x extent`
    /// square in the middle of the viewport. `None` stretches device space
    /// over the whole viewport.
    pub display_extent: Option<f32>,
    pub draw_axis: bool,
    /// Gizmo axes run from the origin to `axis_length` along X, Y and Z
    pub axis_length: f32,
    pub axis_colors: [Color; 3],
    pub camera_proxy_scale: f32,
    pub camera_proxy_color: Color,
    pub light_proxy_scale: f32,
    pub face_normal_length: f32,
    pub face_normal_color: Color,
    pub vertex_normal_length: f32,
    pub vertex_normal_color: Color,
    pub bounding_cube_color: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            display_extent: Some(DEFAULT_DISPLAY_EXTENT),
            draw_axis: true,
            axis_length: 5.0,
            axis_colors: [Color::AXIS_X, Color::AXIS_Y, Color::AXIS_Z],
            camera_proxy_scale: 0.25,
            camera_proxy_color: Color::YELLOW,
            light_proxy_scale: 0.1,
            face_normal_length: 1.0 / 2.5,
            face_normal_color: Color::LIME,
            vertex_normal_length: 1.0 / 2.5,
            vertex_normal_color: Color::RED,
            bounding_cube_color: Color::BLUE,
        }
    }
}
