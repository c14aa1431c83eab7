/// RGB colors used by the rasterizer

/// Linear RGB triple, one float per channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const LIME: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);

    // Gizmo axis colors
    pub const AXIS_X: Color = Color::rgb(1.0, 102.0 / 255.0, 0.0);
    pub const AXIS_Y: Color = Color::rgb(153.0 / 255.0, 204.0 / 255.0, 0.0);
    pub const AXIS_Z: Color = Color::rgb(51.0 / 255.0, 102.0 / 255.0, 1.0);

    /// Quantize to 8-bit channels for presentation.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}
