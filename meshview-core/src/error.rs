//! Error types for the viewer core.
//!
//! Every failure is local and recoverable: a rejected projection leaves the
//! camera untouched, a failed load leaves the scene untouched.

use std::fmt;
use std::io;

use crate::scene::EntityKind;

/// Degenerate camera configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    /// `right == left`
    ZeroWidth,
    /// `top == bottom`
    ZeroHeight,
    /// `far == near`
    ZeroDepth,
    /// A parameter was NaN or infinite
    NonFinite,
    /// `eye == at` in a look-at request
    ZeroLengthDirection,
    /// `up` is parallel to the viewing direction
    DegenerateUpVector,
    /// A view matrix with no inverse
    SingularView,
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionError::ZeroWidth => write!(f, "view volume has zero width (left == right)"),
            ProjectionError::ZeroHeight => {
                write!(f, "view volume has zero height (bottom == top)")
            }
            ProjectionError::ZeroDepth => write!(f, "view volume has zero depth (near == far)"),
            ProjectionError::NonFinite => write!(f, "projection parameters must be finite"),
            ProjectionError::ZeroLengthDirection => {
                write!(f, "look-at eye and target coincide")
            }
            ProjectionError::DegenerateUpVector => {
                write!(f, "look-at up vector is parallel to the view direction")
            }
            ProjectionError::SingularView => write!(f, "view matrix is not invertible"),
        }
    }
}

impl std::error::Error for ProjectionError {}

/// Transform operator argument that would corrupt an entity's matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformError {
    /// A scale factor of zero collapses the matrix
    ZeroScale,
    /// An amount, angle or factor was NaN or infinite
    NonFinite,
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::ZeroScale => write!(f, "scale factor must not be zero"),
            TransformError::NonFinite => write!(f, "transform arguments must be finite"),
        }
    }
}

impl std::error::Error for TransformError {}

/// Raw mesh data that cannot be normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    /// No vertices to average
    EmptyVertices,
    /// All coordinates share a single value, so the extent is zero
    DegenerateBounds,
    /// A face corner points outside the vertex list (1-based index)
    FaceIndexOutOfRange { face: usize, index: usize, len: usize },
    /// A face corner points outside the normal list (1-based index)
    NormalIndexOutOfRange { face: usize, index: usize, len: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::EmptyVertices => write!(f, "mesh has no vertices"),
            MeshError::DegenerateBounds => {
                write!(f, "mesh bounding box is degenerate (zero extent)")
            }
            MeshError::FaceIndexOutOfRange { face, index, len } => write!(
                f,
                "face {} references vertex {} but only {} vertices exist",
                face, index, len
            ),
            MeshError::NormalIndexOutOfRange { face, index, len } => write!(
                f,
                "face {} references normal {} but only {} normals exist",
                face, index, len
            ),
        }
    }
}

impl std::error::Error for MeshError {}

/// Errors produced while importing a mesh file.
#[derive(Debug)]
pub enum LoadError {
    /// File could not be read
    Io(io::Error),
    /// A statement could not be parsed
    Parse { line: usize, message: String },
    /// The parsed data could not be normalized
    Mesh(MeshError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "I/O error: {}", e),
            LoadError::Parse { line, message } => {
                write!(f, "parse error on line {}: {}", line, message)
            }
            LoadError::Mesh(e) => write!(f, "invalid mesh: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Mesh(e) => Some(e),
            LoadError::Parse { .. } => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<MeshError> for LoadError {
    fn from(err: MeshError) -> Self {
        LoadError::Mesh(err)
    }
}

/// Errors raised by scene operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Cycling the selection of a collection with no entries
    EmptyCollection(EntityKind),
    /// The requested camera configuration was rejected
    Projection(ProjectionError),
    /// A transform operator argument was rejected
    Transform(TransformError),
    /// A primitive or camera proxy failed to build
    Mesh(MeshError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::EmptyCollection(kind) => write!(f, "no {} in the scene", kind),
            SceneError::Projection(e) => write!(f, "camera configuration rejected: {}", e),
            SceneError::Transform(e) => write!(f, "transform rejected: {}", e),
            SceneError::Mesh(e) => write!(f, "mesh rejected: {}", e),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Projection(e) => Some(e),
            SceneError::Transform(e) => Some(e),
            SceneError::Mesh(e) => Some(e),
            SceneError::EmptyCollection(_) => None,
        }
    }
}

impl From<ProjectionError> for SceneError {
    fn from(err: ProjectionError) -> Self {
        SceneError::Projection(err)
    }
}

impl From<TransformError> for SceneError {
    fn from(err: TransformError) -> Self {
        SceneError::Transform(err)
    }
}

impl From<MeshError> for SceneError {
    fn from(err: MeshError) -> Self {
        SceneError::Mesh(err)
    }
}

/// Errors that abort a frame before any pixel is written.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The named matrix has no inverse
    SingularTransformation(&'static str),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::SingularTransformation(name) => {
                write!(f, "{} transformation is not invertible", name)
            }
        }
    }
}

impl std::error::Error for RenderError {}
