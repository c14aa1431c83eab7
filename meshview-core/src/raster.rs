//! Software wireframe rasterizer.
//!
//! Owns a flat RGB float buffer (`width * height * 3`, row-major, row 0 at the
//! bottom) and draws line segments into it. Each frame runs
//! clear → models → camera and light proxies; nothing is filled.

use log::{debug, trace};
use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::color::Color;
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::geometry::{CubeLine, MeshModel, FACE_ELEMENTS};
use crate::math::{is_vec_equal, to_cartesian, to_homogeneous};
use crate::scene::Scene;
use crate::transform::{Transform, Transformable};

/// Channels per pixel.
const CHANNELS: usize = 3;

pub struct Rasterizer {
    width: usize,
    height: usize,
    color_buffer: Vec<f32>,
    config: RenderConfig,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_config(width, height, RenderConfig::default())
    }

    pub fn with_config(width: usize, height: usize, config: RenderConfig) -> Self {
        Self {
            width,
            height,
            color_buffer: vec![0.0; width * height * CHANNELS],
            config,
        }
    }

    /// Resize the viewport. The buffer is reallocated and cleared to black.
    pub fn set_viewport(&mut self, width: usize, height: usize) {
        debug!("viewport resized to {}x{}", width, height);
        self.width = width;
        self.height = height;
        self.color_buffer = vec![0.0; width * height * CHANNELS];
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    /// The finished frame, `width * height * 3` floats.
    pub fn color_buffer(&self) -> &[f32] {
        &self.color_buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (x + y * self.width) * CHANNELS;
        Some(Color::rgb(
            self.color_buffer[i],
            self.color_buffer[i + 1],
            self.color_buffer[i + 2],
        ))
    }

    pub fn clear_color_buffer(&mut self, color: Color) {
        for pixel in self.color_buffer.chunks_exact_mut(CHANNELS) {
            pixel[0] = color.r;
            pixel[1] = color.g;
            pixel[2] = color.b;
        }
    }

    /// Write one pixel. Coordinates outside the viewport are ignored.
    pub fn put_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = (x as usize + y as usize * self.width) * CHANNELS;
        self.color_buffer[i] = color.r;
        self.color_buffer[i + 1] = color.g;
        self.color_buffer[i + 2] = color.b;
    }

    /// Integer Bresenham line, both endpoints included.
    ///
    /// Steep lines swap axes so the walk always runs along the major axis.
    /// The walk is limited to the visible span of the major axis; when the
    /// start lies before the viewport the error accumulator is advanced in
    /// one step to where the walk would have been.
    pub fn draw_line(&mut self, p1: Point2<i32>, p2: Point2<i32>, color: Color) {
        let (mut x1, mut y1) = (p1.x as i64, p1.y as i64);
        let (mut x2, mut y2) = (p2.x as i64, p2.y as i64);
        let (width, height) = (self.width as i64, self.height as i64);

        if (x1 < 0 && x2 < 0)
            || (y1 < 0 && y2 < 0)
            || (x1 >= width && x2 >= width)
            || (y1 >= height && y2 >= height)
        {
            return;
        }

        let steep = (y2 - y1).abs() > (x2 - x1).abs();
        if steep {
            std::mem::swap(&mut x1, &mut y1);
            std::mem::swap(&mut x2, &mut y2);
        }
        if x1 > x2 {
            std::mem::swap(&mut x1, &mut x2);
            std::mem::swap(&mut y1, &mut y2);
        }

        let dx = x2 - x1;
        let dy = (y2 - y1).abs();
        let ystep = if y1 < y2 { 1 } else { -1 };
        let mut error = dx / 2;
        let mut x = x1;
        let mut y = y1;

        if x < 0 && dx > 0 {
            // error stays in [0, dx) after every step, which pins down how
            // many minor-axis steps the skipped columns contained
            let skip = (-x) as i128;
            let deficit = skip * dy as i128 - error as i128;
            let minor_steps = if deficit > 0 {
                (deficit + dx as i128 - 1) / dx as i128
            } else {
                0
            };
            error = (error as i128 + minor_steps * dx as i128 - skip * dy as i128) as i64;
            y += minor_steps as i64 * ystep;
            x = 0;
        }

        let major_limit = if steep { height } else { width };
        let last = x2.min(major_limit - 1);
        while x <= last {
            if steep {
                self.put_pixel(y, x, color);
            } else {
                self.put_pixel(x, y, color);
            }
            error -= dy;
            if error < 0 {
                y += ystep;
                error += dx;
            }
            x += 1;
        }
    }

    /// Map a device-space point to pixel coordinates.
    ///
    /// First `[-1, 1]` is stretched over the viewport, then (with a display
    /// extent configured) the result is re-centered and re-scaled onto the
    /// display square. Non-finite input, or a point outside the `i32` pixel
    /// range, yields `None`.
    pub fn to_view_plane(&self, point: &Point3<f32>) -> Option<Point2<i32>> {
        let (width, height) = (self.width as f32, self.height as f32);
        let mut x = (point.x + 1.0) * width / 2.0;
        let mut y = (point.y + 1.0) * height / 2.0;

        if let Some(extent) = self.config.display_extent {
            x = (x - width / 2.0) * (extent / width) + width / 2.0;
            y = (y - height / 2.0) * (extent / height) + height / 2.0;
        }

        let (x, y) = (x.round(), y.round());
        // `as i32` would saturate each axis on its own and bend the segment
        let limit = i32::MAX as f32;
        if !(x.abs() < limit && y.abs() < limit) {
            return None;
        }
        Some(Point2::new(x as i32, y as i32))
    }

    /// Transform a model-space point through `transform` and map it to pixels.
    fn project(&self, transform: &Matrix4<f32>, point: &Point3<f32>) -> Option<Point2<i32>> {
        let clip = transform * to_homogeneous(&point.coords);
        let ndc = to_cartesian(&clip)?;
        self.to_view_plane(&Point3::from(ndc))
    }

    /// Project both ends of a segment and draw it. Segments with an endpoint
    /// at infinity are dropped.
    fn draw_segment(
        &mut self,
        transform: &Matrix4<f32>,
        start: &Point3<f32>,
        end: &Point3<f32>,
        color: Color,
    ) {
        match (self.project(transform, start), self.project(transform, end)) {
            (Some(a), Some(b)) => self.draw_line(a, b, color),
            _ => trace!("dropping segment with a point at infinity or off the pixel range"),
        }
    }

    /// Draw the edges of consecutive corner triples. A trailing partial
    /// triangle is ignored.
    pub fn draw_triangles(
        &mut self,
        positions: &[Point3<f32>],
        transform: &Matrix4<f32>,
        color: Color,
    ) {
        for triangle in positions.chunks_exact(FACE_ELEMENTS) {
            let (p1, p2, p3) = (&triangle[0], &triangle[1], &triangle[2]);
            self.draw_segment(transform, p1, p2, color);
            self.draw_segment(transform, p2, p3, color);
            self.draw_segment(transform, p3, p1, color);
        }
    }

    /// One segment per triangle from its center along its normal.
    pub fn draw_face_normals(&mut self, positions: &[Point3<f32>], transform: &Matrix4<f32>) {
        let length = self.config.face_normal_length;
        let color = self.config.face_normal_color;
        for triangle in positions.chunks_exact(FACE_ELEMENTS) {
            let (p1, p2, p3) = (&triangle[0], &triangle[1], &triangle[2]);
            let normal = (p3 - p1).cross(&(p2 - p1));
            let normal = if is_vec_equal(&normal, &Vector3::zeros()) {
                normal
            } else {
                normal.normalize()
            };
            let center = Point3::from((p1.coords + p2.coords + p3.coords) / 3.0);
            self.draw_segment(transform, &center, &(center + normal * length), color);
        }
    }

    /// One segment per face corner along the normal the face assigns to it.
    /// Faces without normal indices are skipped. Normals are carried to world
    /// space with the model's normal transformation; `frame` is
    /// `Projection * View * World`.
    pub fn draw_vertex_normals(&mut self, model: &MeshModel, frame: &Matrix4<f32>) {
        let length = self.config.vertex_normal_length;
        let color = self.config.vertex_normal_color;
        let normal_transformation = model.normal_transformation();
        let model_transformation = model.transformation();
        let (vertices, normals) = (model.vertices(), model.normals());

        for face in model.faces() {
            let Some(normal_indices) = face.normal_indices() else {
                continue;
            };
            for (&vi, &ni) in face.vertex_indices().iter().zip(normal_indices) {
                // Indices were validated when the model was built
                let (Some(vertex), Some(normal)) = (vertices.get(vi - 1), normals.get(ni - 1))
                else {
                    continue;
                };
                let Some(direction) =
                    (normal_transformation * normal).try_normalize(f32::EPSILON)
                else {
                    continue;
                };
                let start = model_transformation.transform_point(vertex);
                self.draw_segment(frame, &start, &(start + direction * length), color);
            }
        }
    }

    pub fn draw_bounding_cube(&mut self, lines: &[CubeLine], transform: &Matrix4<f32>) {
        let color = self.config.bounding_cube_color;
        for (start, end) in lines {
            self.draw_segment(transform, start, end, color);
        }
    }

    /// World axes from the origin, `frame` being `Projection * View * World`.
    pub fn draw_axis(&mut self, frame: &Matrix4<f32>) {
        let origin = Point3::origin();
        let length = self.config.axis_length;
        let axes = [Vector3::x(), Vector3::y(), Vector3::z()];
        for (axis, color) in axes.iter().zip(self.config.axis_colors) {
            self.draw_segment(frame, &origin, &(origin + axis * length), color);
        }
    }

    /// Render one frame of `scene`.
    ///
    /// Every matrix is resolved before the buffer is touched, so a failure
    /// leaves the previous frame intact.
    pub fn render(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let (view, projection) = scene.active_view_projection()?;
        let identity = Matrix4::identity();
        let frame = Transform::pipeline_matrix(&projection, &view, scene.world_transformation(), &identity);
        let display = *scene.display();

        self.clear_color_buffer(display.background_color);

        if self.config.draw_axis {
            self.draw_axis(&frame);
        }

        for model in scene.models().iter() {
            let transform = frame * model.transformation();
            if display.show_wireframe {
                self.draw_triangles(model.vertex_positions(), &transform, model.color());
            }
            if display.show_face_normals {
                self.draw_face_normals(model.vertex_positions(), &transform);
            }
            if display.show_vertex_normals {
                self.draw_vertex_normals(model, &frame);
            }
            if display.show_bounding_cube {
                self.draw_bounding_cube(model.cube_lines(), &transform);
            }
        }

        let active_camera = scene.cameras().active_index();
        let camera_scale = Matrix4::new_scaling(self.config.camera_proxy_scale);
        for (index, camera) in scene.cameras().iter().enumerate() {
            if Some(index) == active_camera || !camera.is_proxy_visible() {
                continue;
            }
            let transform = frame * camera.transformation() * camera_scale * camera.proxy_anchor();
            let color = self.config.camera_proxy_color;
            self.draw_triangles(camera.proxy().vertex_positions(), &transform, color);
        }

        let light_scale = Matrix4::new_scaling(self.config.light_proxy_scale);
        for light in scene.lights().iter().filter(|l| l.is_proxy_visible()) {
            let transform = frame * light.transformation() * light_scale;
            let intensity = light.intensity().min(1.0);
            let base = light.color();
            let color = Color::rgb(base.r * intensity, base.g * intensity, base.b * intensity);
            self.draw_triangles(light.proxy().vertex_positions(), &transform, color);
        }

        Ok(())
    }
}
