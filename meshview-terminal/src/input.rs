/// Keyboard bindings and step sizes for the terminal viewer
use crossterm::event::KeyCode;
use meshview_core::{Axis, PerspectiveParameters, Primitive, ProjectionParameters};
use nalgebra::Vector3;

/// Step sizes and presets applied by the key bindings.
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Radians per rotate key press
    pub rotation_step: f32,
    pub move_step: f32,
    /// `+` multiplies by this factor, `-` divides by it
    pub scale_step: f32,
    pub target_fps: u32,
    /// Eye of cameras added with `c`; they look at the origin
    pub new_camera_eye: Vector3<f32>,
    pub new_light_position: Vector3<f32>,
    pub orthographic: ProjectionParameters,
    pub frustum: ProjectionParameters,
    pub perspective: PerspectiveParameters,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            rotation_step: std::f32::consts::PI / 36.0,
            move_step: 0.5,
            scale_step: 1.5,
            target_fps: 30,
            new_camera_eye: Vector3::new(0.0, 0.0, 4.0),
            new_light_position: Vector3::new(1.5, 1.5, 1.5),
            orthographic: ProjectionParameters::symmetric(2.0, 2.0, 0.1, 100.0),
            frustum: ProjectionParameters::symmetric(0.05, 0.05, 0.1, 100.0),
            perspective: PerspectiveParameters {
                fovy: std::f32::consts::FRAC_PI_4,
                aspect: 1.0,
                near: 0.1,
                far: 100.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    Orthographic,
    Perspective,
    Frustum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    BoundingCube,
    FaceNormals,
    VertexNormals,
    Wireframe,
    CameraProxy,
}

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    CycleFrame,
    SelectAxis(Axis),
    TogglePivot,
    /// Move along an axis by `sign * move_step`
    Translate(Axis, f32),
    /// Rotate about the selected axis by `sign * rotation_step`
    Rotate(f32),
    Grow,
    Shrink,
    NextEntity,
    DeleteEntity,
    AddCamera,
    AddModel(Primitive),
    AddLight,
    SetProjection(ProjectionKind),
    Toggle(Toggle),
}

pub fn command_for(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Tab => Command::CycleFrame,
        KeyCode::Char('x') => Command::SelectAxis(Axis::X),
        KeyCode::Char('y') => Command::SelectAxis(Axis::Y),
        KeyCode::Char('z') => Command::SelectAxis(Axis::Z),
        KeyCode::Char('r') => Command::TogglePivot,
        KeyCode::Left => Command::Translate(Axis::X, -1.0),
        KeyCode::Right => Command::Translate(Axis::X, 1.0),
        KeyCode::Down => Command::Translate(Axis::Y, -1.0),
        KeyCode::Up => Command::Translate(Axis::Y, 1.0),
        KeyCode::PageDown => Command::Translate(Axis::Z, -1.0),
        KeyCode::PageUp => Command::Translate(Axis::Z, 1.0),
        KeyCode::Char('a') => Command::Rotate(-1.0),
        KeyCode::Char('d') => Command::Rotate(1.0),
        KeyCode::Char('+') | KeyCode::Char('=') => Command::Grow,
        KeyCode::Char('-') => Command::Shrink,
        KeyCode::Char('n') => Command::NextEntity,
        KeyCode::Delete => Command::DeleteEntity,
        KeyCode::Char('c') => Command::AddCamera,
        KeyCode::Char('m') => Command::AddModel(Primitive::Cube),
        KeyCode::Char('s') => Command::AddModel(Primitive::Sphere),
        KeyCode::Char('l') => Command::AddLight,
        KeyCode::Char('o') => Command::SetProjection(ProjectionKind::Orthographic),
        KeyCode::Char('p') => Command::SetProjection(ProjectionKind::Perspective),
        KeyCode::Char('u') => Command::SetProjection(ProjectionKind::Frustum),
        KeyCode::Char('b') => Command::Toggle(Toggle::BoundingCube),
        KeyCode::Char('f') => Command::Toggle(Toggle::FaceNormals),
        KeyCode::Char('v') => Command::Toggle(Toggle::VertexNormals),
        KeyCode::Char('w') => Command::Toggle(Toggle::Wireframe),
        KeyCode::Char('h') => Command::Toggle(Toggle::CameraProxy),
        _ => return None,
    };
    Some(command)
}
