/// Built-in meshes: cube, sphere and the camera proxy
use std::f32::consts::PI;

use nalgebra::{Point3, Vector3};

use crate::error::MeshError;
use crate::geometry::{Face, MeshModel};

const SPHERE_STACKS: usize = 12;
const SPHERE_SLICES: usize = 16;

/// Meshes the scene can create without a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Cube,
    Sphere,
    Camera,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Cube => "cube",
            Primitive::Sphere => "sphere",
            Primitive::Camera => "camera",
        }
    }

    pub fn build(self) -> Result<MeshModel, MeshError> {
        match self {
            Primitive::Cube => cube(),
            Primitive::Sphere => sphere(SPHERE_STACKS, SPHERE_SLICES),
            Primitive::Camera => camera(),
        }
    }
}

/// Unit cube: 8 shared vertices, 12 triangles, one normal per side.
pub fn cube() -> Result<MeshModel, MeshError> {
    let h = 0.5;
    let vertices = vec![
        Point3::new(-h, -h, -h),
        Point3::new(h, -h, -h),
        Point3::new(h, h, -h),
        Point3::new(-h, h, -h),
        Point3::new(-h, -h, h),
        Point3::new(h, -h, h),
        Point3::new(h, h, h),
        Point3::new(-h, h, h),
    ];
    let normals = vec![
        Vector3::z(),
        -Vector3::z(),
        Vector3::y(),
        -Vector3::y(),
        Vector3::x(),
        -Vector3::x(),
    ];
    let side = |a, b, c, n| Face::new([a, b, c]).with_normals([n, n, n]);
    let faces = vec![
        // Front face
        side(5, 6, 7, 1),
        side(5, 7, 8, 1),
        // Back face
        side(1, 4, 3, 2),
        side(1, 3, 2, 2),
        // Top face
        side(4, 8, 7, 3),
        side(4, 7, 3, 3),
        // Bottom face
        side(1, 2, 6, 4),
        side(1, 6, 5, 4),
        // Right face
        side(2, 3, 7, 5),
        side(2, 7, 6, 5),
        // Left face
        side(1, 5, 8, 6),
        side(1, 8, 4, 6),
    ];

    MeshModel::new(faces, vertices, normals, Primitive::Cube.name())
}

/// UV sphere with a vertex at each pole and `stacks - 1` rings of `slices`
/// vertices. Normals share the vertex indices.
pub fn sphere(stacks: usize, slices: usize) -> Result<MeshModel, MeshError> {
    let stacks = stacks.max(2);
    let slices = slices.max(3);

    let mut vertices = vec![Point3::new(0.0, 1.0, 0.0)];
    for stack in 1..stacks {
        let phi = PI * stack as f32 / stacks as f32;
        for slice in 0..slices {
            let theta = 2.0 * PI * slice as f32 / slices as f32;
            vertices.push(Point3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            ));
        }
    }
    vertices.push(Point3::new(0.0, -1.0, 0.0));
    let normals: Vec<Vector3<f32>> = vertices.iter().map(|v| v.coords.normalize()).collect();

    // 1-based index of a ring vertex
    let ring = |stack: usize, slice: usize| 2 + (stack - 1) * slices + slice % slices;
    let south = vertices.len();
    let corner = |a: usize, b: usize, c: usize| Face::new([a, b, c]).with_normals([a, b, c]);

    let mut faces = Vec::with_capacity(2 * slices * (stacks - 1));
    for slice in 0..slices {
        faces.push(corner(1, ring(1, slice + 1), ring(1, slice)));
    }
    for stack in 1..stacks - 1 {
        for slice in 0..slices {
            let (a, b) = (ring(stack, slice), ring(stack, slice + 1));
            let (c, d) = (ring(stack + 1, slice), ring(stack + 1, slice + 1));
            faces.push(corner(a, b, d));
            faces.push(corner(a, d, c));
        }
    }
    for slice in 0..slices {
        faces.push(corner(south, ring(stacks - 1, slice), ring(stacks - 1, slice + 1)));
    }

    MeshModel::new(faces, vertices, normals, Primitive::Sphere.name())
}

/// Pyramid with its apex as the first vertex and its base facing down -Z.
/// Normalization moves the apex off the origin; see `Camera::proxy_anchor`.
pub fn camera() -> Result<MeshModel, MeshError> {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(-0.5, -0.4, -1.0),
        Point3::new(0.5, -0.4, -1.0),
        Point3::new(0.5, 0.4, -1.0),
        Point3::new(-0.5, 0.4, -1.0),
    ];
    let faces = vec![
        Face::new([1, 2, 3]),
        Face::new([1, 3, 4]),
        Face::new([1, 4, 5]),
        Face::new([1, 5, 2]),
        Face::new([2, 4, 3]),
        Face::new([2, 5, 4]),
    ];

    MeshModel::new(faces, vertices, Vec::new(), Primitive::Camera.name())
}
