/// Terminal front end for the meshview scene viewer
use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{info, warn};
use meshview_core::{
    Axis, Camera, Frame, Light, LightSource, MeshModel, Primitive, Rasterizer, Relative, Scene,
    SceneError,
};
use nalgebra::Vector3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod input;
pub mod logging;
pub mod renderer;

pub use input::{command_for, Command, InputConfig, ProjectionKind, Toggle};
pub use logging::{init_logging, LoggingConfig};
pub use renderer::HalfBlockRenderer;

/// Scene the viewer opens with: `model` (or a cube) and one camera looking
/// at it from (2, 2, 2) through the default orthographic volume.
pub fn initial_scene(model: Option<MeshModel>, input: &InputConfig) -> Result<Scene, SceneError> {
    let mut scene = Scene::new();
    match model {
        Some(model) => {
            scene.add_model(model);
        }
        None => {
            scene.add_primitive_model(Primitive::Cube)?;
        }
    }
    let eye = Vector3::new(2.0, 2.0, 2.0);
    scene.add_camera(Camera::looking_at(&eye, &Vector3::zeros(), &Vector3::y())?);
    scene.set_orthographic_projection(input.orthographic)?;
    Ok(scene)
}

/// Main application struct for terminal scene viewing
pub struct TerminalApp {
    scene: Scene,
    rasterizer: Rasterizer,
    renderer: HalfBlockRenderer,
    input: InputConfig,
    frame: Frame,
    axis: Axis,
    relative: Relative,
    status: String,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, input: InputConfig) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        Ok(Self::with_size(scene, input, columns as usize, rows as usize))
    }

    /// Build for a fixed cell grid. The bottom row is kept for the status line.
    pub fn with_size(scene: Scene, input: InputConfig, columns: usize, rows: usize) -> Self {
        let renderer = HalfBlockRenderer::new(columns, rows.saturating_sub(1));
        let (width, height) = renderer.pixel_size();
        let mut app = Self {
            scene,
            rasterizer: Rasterizer::new(width, height),
            renderer,
            input,
            frame: Frame::Model,
            axis: Axis::Y,
            relative: Relative::Local,
            status: String::from("ready"),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.fit_display();
        app
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn relative(&self) -> Relative {
        self.relative
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        self.renderer.resize(columns, rows.saturating_sub(1));
        let (width, height) = self.renderer.pixel_size();
        self.rasterizer.set_viewport(width, height);
        self.fit_display();
    }

    /// Map device space onto the largest square the viewport holds
    fn fit_display(&mut self) {
        let extent = self.rasterizer.width().min(self.rasterizer.height()) as f32;
        self.rasterizer.config_mut().display_extent = Some(extent);
    }

    pub fn run(&mut self) -> io::Result<()> {
        info!(
            "viewer started with a {}x{} pixel viewport",
            self.rasterizer.width(),
            self.rasterizer.height()
        );
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.input.target_fps.max(1) as u64);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(command) = command_for(code) {
                    self.apply(command);
                }
            }
            Event::Resize(columns, rows) => self.resize(columns as usize, rows as usize),
            _ => {}
        }
    }

    /// Run one command. Failures end up in the status line.
    pub fn apply(&mut self, command: Command) {
        match self.execute(command) {
            Ok(message) => self.status = message,
            Err(e) => {
                warn!("{:?} failed: {}", command, e);
                self.status = format!("error: {}", e);
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<String, SceneError> {
        let input = &self.input;
        let message = match command {
            Command::Quit => {
                self.running = false;
                String::from("bye")
            }
            Command::CycleFrame => {
                self.frame = match self.frame {
                    Frame::World => Frame::Camera,
                    Frame::Camera => Frame::Model,
                    Frame::Model => Frame::Light,
                    Frame::Light => Frame::World,
                };
                format!("frame: {:?}", self.frame)
            }
            Command::SelectAxis(axis) => {
                self.axis = axis;
                format!("axis: {:?}", axis)
            }
            Command::TogglePivot => {
                self.relative = match self.relative {
                    Relative::Local => Relative::World,
                    Relative::World => Relative::Local,
                };
                format!("pivot: {:?}", self.relative)
            }
            Command::Translate(axis, sign) => {
                let moved = self.scene.translate(self.frame, axis, sign * input.move_step)?;
                self.transform_message(moved.is_some(), "translated")
            }
            Command::Rotate(sign) => {
                let angle = sign * input.rotation_step;
                let rotated = self.scene.rotate(self.frame, self.axis, angle, self.relative)?;
                self.transform_message(rotated.is_some(), "rotated")
            }
            Command::Grow | Command::Shrink => {
                let factor = if command == Command::Grow {
                    input.scale_step
                } else {
                    1.0 / input.scale_step
                };
                let scaled = self.scene.scale(self.frame, factor, self.relative)?;
                self.transform_message(scaled.is_some(), "scaled")
            }
            Command::NextEntity => match self.frame.entity_kind() {
                Some(kind) => {
                    let index = self.scene.select_next(kind)?;
                    format!("active {}: {}", kind, index)
                }
                None => String::from("the world frame has no entities"),
            },
            Command::DeleteEntity => match self.frame.entity_kind() {
                Some(kind) if self.scene.delete_active(kind) => {
                    format!("deleted {}, {} left", kind, self.scene.count(kind))
                }
                Some(kind) => format!("no active {}", kind),
                None => String::from("the world frame cannot be deleted"),
            },
            Command::AddCamera => {
                let camera =
                    Camera::looking_at(&input.new_camera_eye, &Vector3::zeros(), &Vector3::y())?;
                let orthographic = input.orthographic;
                let index = self.scene.add_camera(camera);
                self.scene.set_orthographic_projection(orthographic)?;
                format!("added camera {}", index)
            }
            Command::AddModel(primitive) => {
                let index = self.scene.add_primitive_model(primitive)?;
                format!("added {} {}", primitive.name(), index)
            }
            Command::AddLight => {
                let light = Light::new(LightSource::Point, &input.new_light_position)?;
                let index = self.scene.add_light(light);
                format!("added light {}", index)
            }
            Command::SetProjection(kind) => {
                let committed = match kind {
                    ProjectionKind::Orthographic => {
                        self.scene.set_orthographic_projection(input.orthographic)?
                    }
                    ProjectionKind::Frustum => self.scene.set_frustum_view_volume(input.frustum)?,
                    ProjectionKind::Perspective => {
                        self.scene.set_perspective_projection(input.perspective)?
                    }
                };
                match committed {
                    Some(_) => format!("projection: {:?}", kind),
                    None => String::from("no active camera"),
                }
            }
            Command::Toggle(toggle) => self.toggle(toggle),
        };
        Ok(message)
    }

    fn transform_message(&self, applied: bool, verb: &str) -> String {
        match (applied, self.frame.entity_kind()) {
            (true, _) => format!("{} {:?}", verb, self.frame),
            (false, Some(kind)) => format!("no active {}", kind),
            (false, None) => String::from("nothing to transform"),
        }
    }

    fn toggle(&mut self, toggle: Toggle) -> String {
        let display = self.scene.display_mut();
        let (name, state) = match toggle {
            Toggle::BoundingCube => {
                display.show_bounding_cube = !display.show_bounding_cube;
                ("bounding cube", display.show_bounding_cube)
            }
            Toggle::FaceNormals => {
                display.show_face_normals = !display.show_face_normals;
                ("face normals", display.show_face_normals)
            }
            Toggle::VertexNormals => {
                display.show_vertex_normals = !display.show_vertex_normals;
                ("vertex normals", display.show_vertex_normals)
            }
            Toggle::Wireframe => {
                display.show_wireframe = !display.show_wireframe;
                ("wireframe", display.show_wireframe)
            }
            Toggle::CameraProxy => {
                let Some(visible) = self.scene.active_camera().map(|c| c.is_proxy_visible())
                else {
                    return String::from("no active camera");
                };
                self.scene.set_camera_proxy_visible(!visible);
                ("camera proxy", !visible)
            }
        };
        format!("{}: {}", name, if state { "on" } else { "off" })
    }

    /// Rasterize the scene into the color buffer. A failed frame keeps the
    /// previous image and reports the error.
    pub fn render_frame(&mut self) {
        if let Err(e) = self.rasterizer.render(&self.scene) {
            warn!("frame skipped: {}", e);
            self.status = format!("error: {}", e);
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.render_frame();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(self.rasterizer.color_buffer(), &mut stdout)?;

        // Status line
        let (_, rows) = terminal::size()?;
        queue!(
            stdout,
            cursor::MoveTo(0, rows.saturating_sub(1)),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            SetBackgroundColor(Color::Black),
            Print(format!(
                "{:?} | axis {:?} | {:?} | {} | FPS: {:.1}",
                self.frame, self.axis, self.relative, self.status, self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
