//! Triangle soup geometry handed from file loaders to the renderer.
//!
//! A `Mesh` is just a vertex buffer plus a flat triangle index list. The
//! renderer turns it into an intersectable object; this crate only loads and
//! validates it.

use std::io::BufRead;
use std::path::Path;

use ember_math::{Aabb, Vec3};
use thiserror::Error;

/// Errors that can occur while loading or validating a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to load OBJ file {path}: {source}")]
    Obj {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("OBJ data contained no triangles")]
    NoGeometry,

    #[error("Triangle {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Index list length {0} is not a multiple of 3")]
    PartialTriangle(usize),
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A mesh consisting of vertex positions and triangle indices.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh from positions and indices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Iterate over triangles as index triplets.
    pub fn faces(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|f| [f[0], f[1], f[2]])
    }

    /// Bounding box of all vertices, `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::enclosing(self.positions.iter().copied())
    }

    /// Check that the index list is whole triangles and every index is in range.
    pub fn validate(&self) -> MeshResult<()> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(self.indices.len()));
        }

        let vertex_count = self.positions.len();
        for (face, tri) in self.faces().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Append another mesh, rebasing its indices onto this vertex buffer.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

fn obj_load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

fn merge_models(models: Vec<tobj::Model>) -> MeshResult<Mesh> {
    let mut mesh = Mesh::default();

    for model in models {
        let positions = model
            .mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();
        let part = Mesh::new(positions, model.mesh.indices);
        log::debug!(
            "OBJ model '{}': {} vertices, {} triangles",
            model.name,
            part.vertex_count(),
            part.triangle_count()
        );
        mesh.append(&part);
    }

    if mesh.triangle_count() == 0 {
        return Err(MeshError::NoGeometry);
    }
    mesh.validate()?;
    Ok(mesh)
}

/// Load every model of a Wavefront OBJ file into one triangulated mesh.
///
/// Materials referenced by the file are ignored; the scene assigns its own.
pub fn load_obj<P: AsRef<Path>>(path: P) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let (models, _materials) =
        tobj::load_obj(path, &obj_load_options()).map_err(|source| MeshError::Obj {
            path: path.display().to_string(),
            source,
        })?;

    let mesh = merge_models(models)?;
    log::info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ data from a reader. `mtllib` statements are not followed.
pub fn parse_obj<R: BufRead>(reader: &mut R) -> MeshResult<Mesh> {
    let (models, _materials) = tobj::load_obj_buf(reader, &obj_load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })
    .map_err(|source| MeshError::Obj {
        path: "<buffer>".to_string(),
        source,
    })?;

    merge_models(models)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let mesh = Mesh::new(positions, vec![0, 1, 2]);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.faces().collect::<Vec<_>>(), vec![[0, 1, 2]]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_bounds_computation() {
        let positions = vec![
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];
        let mesh = Mesh::new(positions, vec![0, 1, 2]);
        let bounds = mesh.bounds().unwrap();

        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bounds.max, Vec3::new(4.0, 5.0, 6.0));
        assert!(Mesh::default().bounds().is_none());
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2, 1, 2, 3]);

        match mesh.validate() {
            Err(MeshError::IndexOutOfRange { face, index, vertex_count }) => {
                assert_eq!(face, 1);
                assert_eq!(index, 3);
                assert_eq!(vertex_count, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_partial_triangle() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1]);
        assert!(matches!(mesh.validate(), Err(MeshError::PartialTriangle(2))));
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut a = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]);
        let b = Mesh::new(vec![Vec3::Z, Vec3::ONE, Vec3::NEG_X], vec![0, 2, 1]);
        a.append(&b);

        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.indices, vec![0, 1, 2, 3, 5, 4]);
    }

    #[test]
    fn test_parse_obj_quad_is_triangulated() {
        let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let mesh = parse_obj(&mut obj.as_bytes()).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_parse_obj_without_faces_fails() {
        let obj = "v 0 0 0\nv 1 0 0\n";
        assert!(matches!(
            parse_obj(&mut obj.as_bytes()),
            Err(MeshError::NoGeometry)
        ));
    }
}
