/// Wavefront OBJ loader
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use nalgebra::{Point3, Vector3};
use nom::{
    character::complete::{char, i64 as integer, space1},
    combinator::{all_consuming, opt},
    multi::many1,
    number::complete::float,
    sequence::{pair, preceded, tuple},
    IResult,
};

use crate::error::LoadError;
use crate::geometry::{Face, MeshModel, FACE_ELEMENTS};

/// One line of an OBJ file.
enum Statement<'a> {
    Blank,
    Vertex(Point3<f32>),
    Normal(Vector3<f32>),
    TextureCoordinate,
    Face(Vec<Corner>),
    Unsupported(&'a str),
}

/// A face corner as written: `v`, `v/t`, `v//n` or `v/t/n`.
#[derive(Debug, Clone, Copy)]
struct Corner {
    vertex: i64,
    texture: Option<i64>,
    normal: Option<i64>,
}

/// Parse OBJ text into a normalized model.
pub fn parse_obj(input: &str, name: impl Into<String>) -> Result<MeshModel, LoadError> {
    let name = name.into();
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut texture_count = 0usize;
    let mut faces = Vec::new();

    for (number, raw) in input.lines().enumerate() {
        let line = number + 1;
        let parse_error = move |message: String| LoadError::Parse { line, message };

        match parse_statement(raw).map_err(parse_error)? {
            Statement::Blank => {}
            Statement::Vertex(v) => vertices.push(v),
            Statement::Normal(n) => normals.push(n),
            Statement::TextureCoordinate => texture_count += 1,
            Statement::Face(corners) => {
                faces.extend(triangulate(&corners, texture_count).map_err(parse_error)?)
            }
            Statement::Unsupported(keyword) => {
                warn!("{}:{}: skipping unsupported statement '{}'", name, line, keyword)
            }
        }
    }

    debug!(
        "parsed '{}': {} vertices, {} normals, {} triangles",
        name,
        vertices.len(),
        normals.len(),
        faces.len()
    );
    Ok(MeshModel::new(faces, vertices, normals, name)?)
}

/// Read and parse an OBJ file. The model is named after the file.
pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshModel, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let model = parse_obj(&text, name)?;
    info!("loaded {} ({} triangles)", path.display(), model.faces().len());
    Ok(model)
}

fn parse_statement(raw: &str) -> Result<Statement<'_>, String> {
    let line = raw.split('#').next().unwrap_or_default().trim();
    let Some(keyword) = line.split_whitespace().next() else {
        return Ok(Statement::Blank);
    };
    let rest = &line[keyword.len()..];

    let statement = match keyword {
        "v" => Statement::Vertex(run(keyword, vertex, rest)?),
        "vn" => Statement::Normal(run(keyword, vector3, rest)?),
        "vt" => {
            run(keyword, texture_coordinate, rest)?;
            Statement::TextureCoordinate
        }
        "f" => Statement::Face(run(keyword, many1(preceded(space1, corner)), rest)?),
        other => Statement::Unsupported(other),
    };
    Ok(statement)
}

fn run<'a, O>(
    keyword: &str,
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    input: &'a str,
) -> Result<O, String> {
    all_consuming(parser)(input)
        .map(|(_, output)| output)
        .map_err(|e| format!("malformed '{}' statement: {}", keyword, e))
}

fn vector3(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, (x, y, z)) = tuple((
        preceded(space1, float),
        preceded(space1, float),
        preceded(space1, float),
    ))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, v) = vector3(input)?;
    // Optional w, unused
    let (input, _) = opt(preceded(space1, float))(input)?;
    Ok((input, Point3::from(v)))
}

fn texture_coordinate(input: &str) -> IResult<&str, ()> {
    let (input, _) = preceded(space1, float)(input)?;
    let (input, _) = opt(preceded(space1, float))(input)?;
    let (input, _) = opt(preceded(space1, float))(input)?;
    Ok((input, ()))
}

fn corner(input: &str) -> IResult<&str, Corner> {
    let (input, vertex) = integer(input)?;
    let (input, rest) = opt(preceded(
        char('/'),
        pair(opt(integer), opt(preceded(char('/'), integer))),
    ))(input)?;
    let (texture, normal) = rest.unwrap_or((None, None));
    Ok((input, Corner { vertex, texture, normal }))
}

fn index(raw: i64) -> Result<usize, String> {
    if raw <= 0 {
        return Err(format!("index {} is not a positive 1-based index", raw));
    }
    usize::try_from(raw).map_err(|_| format!("index {} is too large", raw))
}

/// Fan-triangulate a polygon. Normal and texture indices are kept only when
/// every corner has one.
fn triangulate(corners: &[Corner], texture_count: usize) -> Result<Vec<Face>, String> {
    if corners.len() < FACE_ELEMENTS {
        return Err(format!("face has {} corners, at least 3 are needed", corners.len()));
    }

    let vertices = corners
        .iter()
        .map(|c| index(c.vertex))
        .collect::<Result<Vec<_>, _>>()?;
    let normals = corners
        .iter()
        .map(|c| c.normal)
        .collect::<Option<Vec<_>>>()
        .map(|n| n.into_iter().map(index).collect::<Result<Vec<_>, _>>())
        .transpose()?;
    let textures = corners
        .iter()
        .map(|c| c.texture)
        .collect::<Option<Vec<_>>>()
        .map(|t| t.into_iter().map(index).collect::<Result<Vec<_>, _>>())
        .transpose()?;

    if let Some(&t) = textures.iter().flatten().find(|&&t| t > texture_count) {
        return Err(format!(
            "texture index {} but only {} texture coordinates exist",
            t, texture_count
        ));
    }

    let faces = (1..corners.len() - 1)
        .map(|i| {
            let pick = |list: &[usize]| [list[0], list[i], list[i + 1]];
            let mut face = Face::new(pick(&vertices));
            if let Some(n) = &normals {
                face = face.with_normals(pick(n));
            }
            if let Some(t) = &textures {
                face = face.with_textures(pick(t));
            }
            face
        })
        .collect();
    Ok(faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;

    const CUBE: &str = "\
# unit cube
o cube
v -1 -1 -1
v  1 -1 -1
v  1  1 -1
v -1  1 -1
v -1 -1  1
v  1 -1  1
v  1  1  1
v -1  1  1
s off
f 1 2 3 4
f 5 8 7 6
f 1 5 6 2
f 2 6 7 3
f 3 7 8 4
f 5 1 4 8
";

    #[test]
    fn test_parse_cube() {
        let model = parse_obj(CUBE, "cube.obj").unwrap();
        assert_eq!(model.name(), "cube.obj");
        assert_eq!(model.vertices().len(), 8);
        assert_eq!(model.faces().len(), 12);
        assert_eq!(model.vertex_positions().len(), 36);
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let model = parse_obj(CUBE, "cube").unwrap();
        assert_eq!(model.faces()[0].vertex_indices(), &[1, 2, 3]);
        assert_eq!(model.faces()[1].vertex_indices(), &[1, 3, 4]);
    }

    #[test]
    fn test_slash_forms() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
f 1//1 2//1 3//1
f 1/1 2/2 3/3
f 1 2 3
";
        let model = parse_obj(text, "tri").unwrap();
        let faces = model.faces();
        assert_eq!(faces.len(), 4);
        assert_eq!(faces[0].normal_indices(), Some(&[1, 1, 1]));
        assert_eq!(faces[0].texture_indices(), Some(&[1, 2, 3]));
        assert_eq!(faces[1].normal_indices(), Some(&[1, 1, 1]));
        assert_eq!(faces[1].texture_indices(), None);
        assert_eq!(faces[2].normal_indices(), None);
        assert_eq!(faces[2].texture_indices(), Some(&[1, 2, 3]));
        assert_eq!(faces[3].normal_indices(), None);
        assert_eq!(model.normals().len(), 1);
    }

    #[test]
    fn test_comments_and_unknown_statements() {
        let text = "\
mtllib scene.mtl

v 0 0 0 # origin
v 1 0 0 1.0
v 0 1 0
g group
usemtl steel
f 1 2 3
";
        let model = parse_obj(text, "tri").unwrap();
        assert_eq!(model.faces().len(), 1);
    }

    #[test]
    fn test_zero_and_negative_indices_are_rejected() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        match parse_obj(text, "tri") {
            Err(LoadError::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected parse error, got {:?}", other.map(|m| m.faces().len())),
        }

        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        assert!(matches!(parse_obj(text, "tri"), Err(LoadError::Parse { line: 4, .. })));
    }

    #[test]
    fn test_bad_number_reports_line() {
        let text = "v 0 0 0\nv 1 zero 0\n";
        assert!(matches!(parse_obj(text, "bad"), Err(LoadError::Parse { line: 2, .. })));

        let text = "v 0 0 0\nf 1 1\n";
        assert!(matches!(parse_obj(text, "bad"), Err(LoadError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_texture_index_out_of_range() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/2 3/1\n";
        assert!(matches!(parse_obj(text, "tri"), Err(LoadError::Parse { line: 5, .. })));
    }

    #[test]
    fn test_mesh_errors_propagate() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
        assert!(matches!(
            parse_obj(text, "tri"),
            Err(LoadError::Mesh(MeshError::FaceIndexOutOfRange { index: 9, .. }))
        ));

        assert!(matches!(
            parse_obj("# nothing here\n", "empty"),
            Err(LoadError::Mesh(MeshError::EmptyVertices))
        ));
    }

    #[test]
    fn test_load_obj_from_disk() {
        let path = std::env::temp_dir().join(format!("meshview-load-{}.obj", std::process::id()));
        fs::write(&path, CUBE).unwrap();
        let model = load_obj(&path).unwrap();
        fs::remove_file(&path).unwrap();
        let expected = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(model.name(), expected);
        assert_eq!(model.faces().len(), 12);

        assert!(matches!(load_obj(&path), Err(LoadError::Io(_))));
    }
}
