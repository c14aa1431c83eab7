/// Mesh model and the normalization pipeline that builds it
use log::debug;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use crate::color::Color;
use crate::error::MeshError;
use crate::transform::Transformable;

/// Corners per face.
pub const FACE_ELEMENTS: usize = 3;

/// Edges of a bounding cube.
pub const CUBE_EDGES: usize = 12;

/// A bounding-box edge, start and end point.
pub type CubeLine = (Point3<f32>, Point3<f32>);

/// A triangle face referencing 1-based vertex, normal and texture indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    vertex_indices: [usize; FACE_ELEMENTS],
    normal_indices: Option<[usize; FACE_ELEMENTS]>,
    texture_indices: Option<[usize; FACE_ELEMENTS]>,
}

impl Face {
    pub fn new(vertex_indices: [usize; FACE_ELEMENTS]) -> Self {
        Self {
            vertex_indices,
            normal_indices: None,
            texture_indices: None,
        }
    }

    pub fn with_normals(mut self, normal_indices: [usize; FACE_ELEMENTS]) -> Self {
        self.normal_indices = Some(normal_indices);
        self
    }

    pub fn with_textures(mut self, texture_indices: [usize; FACE_ELEMENTS]) -> Self {
        self.texture_indices = Some(texture_indices);
        self
    }

    pub fn vertex_indices(&self) -> &[usize; FACE_ELEMENTS] {
        &self.vertex_indices
    }

    pub fn normal_indices(&self) -> Option<&[usize; FACE_ELEMENTS]> {
        self.normal_indices.as_ref()
    }

    pub fn texture_indices(&self) -> Option<&[usize; FACE_ELEMENTS]> {
        self.texture_indices.as_ref()
    }
}

/// A normalized polygonal mesh with its own model transformation.
///
/// All derived state (centroid, bounds, flattened positions, bounding cube) is
/// computed once in [`MeshModel::new`]; afterwards only the transformation
/// and color change.
#[derive(Debug, Clone)]
pub struct MeshModel {
    name: String,
    faces: Vec<Face>,
    vertices: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    centroid: Point3<f32>,
    min_coordinates: Point3<f32>,
    max_coordinates: Point3<f32>,
    vertex_positions: Vec<Point3<f32>>,
    cube_lines: [CubeLine; CUBE_EDGES],
    transformation: Matrix4<f32>,
    color: Color,
}

impl MeshModel {
    /// Normalize raw loader output into a model.
    ///
    /// Vertices are re-centered on their mean and remapped with
    /// `(v - min) / (max - min) * 2 - 1`, where `min`/`max` are the single
    /// smallest and largest offsets over all three axes. Using one scalar pair
    /// keeps the aspect ratio of the model.
    pub fn new(
        faces: Vec<Face>,
        vertices: Vec<Point3<f32>>,
        normals: Vec<Vector3<f32>>,
        name: impl Into<String>,
    ) -> Result<Self, MeshError> {
        if vertices.is_empty() {
            return Err(MeshError::EmptyVertices);
        }
        validate_faces(&faces, vertices.len(), normals.len())?;

        let count = vertices.len() as f32;
        let centroid = vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.coords)
            / count;

        let mut min = Vector3::repeat(f32::MAX);
        let mut max = Vector3::repeat(-f32::MAX);
        for v in &vertices {
            let offset = v.coords - centroid;
            min = min.inf(&offset);
            max = max.sup(&offset);
        }

        let absolute_min = min.min();
        let absolute_max = max.max();
        let extent = absolute_max - absolute_min;
        if !extent.is_finite() || extent <= 0.0 {
            return Err(MeshError::DegenerateBounds);
        }

        let normalize = |offset: Vector3<f32>| -> Point3<f32> {
            Point3::from(offset.map(|c| (c - absolute_min) / extent * 2.0 - 1.0))
        };

        let vertices: Vec<Point3<f32>> = vertices
            .iter()
            .map(|v| normalize(v.coords - centroid))
            .collect();

        let vertex_positions = faces
            .iter()
            .flat_map(|face| face.vertex_indices.iter())
            .map(|&index| vertices[index - 1])
            .collect();

        let min_coordinates = normalize(min);
        let max_coordinates = normalize(max);
        let name = name.into();

        debug!(
            "normalized '{}': {} vertices, {} faces, extent {}",
            name,
            vertices.len(),
            faces.len(),
            extent
        );

        Ok(Self {
            name,
            faces,
            vertices,
            normals,
            centroid: normalize(Vector3::zeros()),
            min_coordinates,
            max_coordinates,
            vertex_positions,
            cube_lines: cube_lines(&min_coordinates, &max_coordinates),
            transformation: Matrix4::identity(),
            color: Color::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Normalized vertex list, in loader order.
    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    /// Mean of the vertices, in normalized coordinates.
    pub fn centroid(&self) -> &Point3<f32> {
        &self.centroid
    }

    pub fn min_coordinates(&self) -> &Point3<f32> {
        &self.min_coordinates
    }

    pub fn max_coordinates(&self) -> &Point3<f32> {
        &self.max_coordinates
    }

    /// One position per triangle corner; `faces().len() * 3` entries.
    pub fn vertex_positions(&self) -> &[Point3<f32>] {
        &self.vertex_positions
    }

    pub fn cube_lines(&self) -> &[CubeLine; CUBE_EDGES] {
        &self.cube_lines
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Inverse transpose of the model matrix's linear part, for transforming
    /// normals. Falls back to identity when the model matrix is singular.
    pub fn normal_transformation(&self) -> Matrix3<f32> {
        self.transformation
            .fixed_view::<3, 3>(0, 0)
            .into_owned()
            .try_inverse()
            .map(|m| m.transpose())
            .unwrap_or_else(Matrix3::identity)
    }
}

impl Transformable for MeshModel {
    fn transformation(&self) -> &Matrix4<f32> {
        &self.transformation
    }

    fn set_transformation(&mut self, transformation: Matrix4<f32>) {
        self.transformation = transformation;
    }
}

fn validate_faces(faces: &[Face], vertex_count: usize, normal_count: usize) -> Result<(), MeshError> {
    for (face_index, face) in faces.iter().enumerate() {
        for &index in &face.vertex_indices {
            if index == 0 || index > vertex_count {
                return Err(MeshError::FaceIndexOutOfRange {
                    face: face_index,
                    index,
                    len: vertex_count,
                });
            }
        }
        if let Some(normal_indices) = &face.normal_indices {
            for &index in normal_indices {
                if index == 0 || index > normal_count {
                    return Err(MeshError::NormalIndexOutOfRange {
                        face: face_index,
                        index,
                        len: normal_count,
                    });
                }
            }
        }
    }
    Ok(())
}

/// The 12 edges of the axis-aligned box spanned by `min` and `max`.
fn cube_lines(min: &Point3<f32>, max: &Point3<f32>) -> [CubeLine; CUBE_EDGES] {
    let corner = |x: bool, y: bool, z: bool| {
        Point3::new(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };

    [
        // Near face
        (corner(false, false, false), corner(true, false, false)),
        (corner(true, false, false), corner(true, true, false)),
        (corner(true, true, false), corner(false, true, false)),
        (corner(false, true, false), corner(false, false, false)),
        // Far face
        (corner(false, false, true), corner(true, false, true)),
        (corner(true, false, true), corner(true, true, true)),
        (corner(true, true, true), corner(false, true, true)),
        (corner(false, true, true), corner(false, false, true)),
        // Connecting edges
        (corner(false, false, false), corner(false, false, true)),
        (corner(true, false, false), corner(true, false, true)),
        (corner(true, true, false), corner(true, true, true)),
        (corner(false, true, false), corner(false, true, true)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_mesh(sx: f32, sy: f32, sz: f32) -> MeshModel {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(sx, 0.0, 0.0),
            Point3::new(sx, sy, 0.0),
            Point3::new(0.0, sy, 0.0),
            Point3::new(0.0, 0.0, sz),
            Point3::new(sx, 0.0, sz),
            Point3::new(sx, sy, sz),
            Point3::new(0.0, sy, sz),
        ];
        let faces = vec![Face::new([1, 2, 3]), Face::new([1, 3, 4]), Face::new([5, 6, 7])];
        MeshModel::new(faces, vertices, Vec::new(), "box").unwrap()
    }

    #[test]
    fn test_normalized_coordinates_in_range() {
        let mesh = box_mesh(10.0, 3.0, 7.0);
        for v in mesh.vertices() {
            for c in v.iter() {
                assert!(*c >= -1.0 - 1e-6 && *c <= 1.0 + 1e-6);
            }
        }
    }

    #[test]
    fn test_aspect_ratio_is_preserved() {
        let mesh = box_mesh(4.0, 2.0, 1.0);
        let extent = mesh.max_coordinates() - mesh.min_coordinates();
        // Global scaling keeps the 4:2:1 proportions
        assert!((extent.x / extent.y - 2.0).abs() < 1e-5);
        assert!((extent.x / extent.z - 4.0).abs() < 1e-5);
        // The longest axis spans the full [-1, 1] range
        assert!((extent.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_symmetric_cube_is_centered() {
        let mesh = box_mesh(2.0, 2.0, 2.0);
        assert!(mesh.centroid().coords.norm() < 1e-6);
        assert!((mesh.min_coordinates().coords - Vector3::repeat(-1.0)).norm() < 1e-6);
        assert!((mesh.max_coordinates().coords - Vector3::repeat(1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_vertex_positions_follow_faces() {
        let mesh = box_mesh(2.0, 2.0, 2.0);
        assert_eq!(mesh.vertex_positions().len(), mesh.faces().len() * FACE_ELEMENTS);
        assert_eq!(mesh.vertex_positions()[0], mesh.vertices()[0]);
        assert_eq!(mesh.vertex_positions()[2], mesh.vertices()[2]);
        assert_eq!(mesh.vertex_positions()[8], mesh.vertices()[6]);
    }

    #[test]
    fn test_cube_lines_span_bounds() {
        let mesh = box_mesh(2.0, 2.0, 2.0);
        let lines = mesh.cube_lines();
        assert_eq!(lines.len(), CUBE_EDGES);
        for (start, end) in lines {
            let length = (end - start).norm();
            assert!((length - 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_vertices() {
        let err = MeshModel::new(Vec::new(), Vec::new(), Vec::new(), "empty").unwrap_err();
        assert_eq!(err, MeshError::EmptyVertices);
    }

    #[test]
    fn test_degenerate_bounds() {
        let vertices = vec![Point3::new(1.0, 1.0, 1.0), Point3::new(1.0, 1.0, 1.0)];
        let err = MeshModel::new(Vec::new(), vertices, Vec::new(), "point").unwrap_err();
        assert_eq!(err, MeshError::DegenerateBounds);
    }

    #[test]
    fn test_face_index_out_of_range() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let err = MeshModel::new(vec![Face::new([1, 2, 3])], vertices.clone(), Vec::new(), "x")
            .unwrap_err();
        assert_eq!(err, MeshError::FaceIndexOutOfRange { face: 0, index: 3, len: 2 });

        let err = MeshModel::new(vec![Face::new([0, 1, 2])], vertices.clone(), Vec::new(), "x")
            .unwrap_err();
        assert!(matches!(err, MeshError::FaceIndexOutOfRange { index: 0, .. }));

        let face = Face::new([1, 2, 1]).with_normals([1, 1, 2]);
        let err = MeshModel::new(vec![face], vertices, vec![Vector3::z()], "x").unwrap_err();
        assert!(matches!(err, MeshError::NormalIndexOutOfRange { index: 2, .. }));
    }

    #[test]
    fn test_normal_transformation_of_uniform_scale() {
        let mut mesh = box_mesh(2.0, 2.0, 2.0);
        mesh.set_transformation(Matrix4::new_scaling(2.0));
        let n = mesh.normal_transformation();
        assert!((n[(0, 0)] - 0.5).abs() < 1e-6);

        mesh.set_transformation(Matrix4::new_scaling(0.0));
        assert_eq!(mesh.normal_transformation(), Matrix3::identity());
    }
}
