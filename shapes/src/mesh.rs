//! Triangle meshes.

use super::{OBJMesh, PLYMesh};
use core::error::ResourceError;
use core::geometry::*;
use core::mesh::{MeshBounds, MeshFormat};

/// An indexed triangle mesh in object space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Point3f>,

    /// Vertex indices; three per triangle.
    pub indices: Vec<usize>,
}

impl TriangleMesh {
    /// Create a new triangle mesh.
    ///
    /// * `positions` - Vertex positions.
    /// * `indices`   - Vertex indices; three per triangle.
    pub fn new(positions: Vec<Point3f>, indices: Vec<usize>) -> Self {
        Self { positions, indices }
    }

    /// Load a mesh from a PLY or OBJ file. The format is chosen from the
    /// file extension.
    ///
    /// * `path` - Path to the mesh file.
    pub fn load(path: &str) -> Result<Self, ResourceError> {
        let mesh = match MeshFormat::from_path(path) {
            MeshFormat::Ply => PLYMesh::read(path)?,
            MeshFormat::Obj => OBJMesh::read(path)?,
        };
        mesh.validate(path)?;
        Ok(mesh)
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the object space bounding box or `None` if there are no
    /// vertices.
    pub fn bounds(&self) -> Option<Bounds3f> {
        Bounds3f::from_points(&self.positions)
    }

    /// Checks that the mesh has triangles and that every index refers to a
    /// vertex.
    ///
    /// * `path` - Path the mesh was read from.
    fn validate(&self, path: &str) -> Result<(), ResourceError> {
        if self.positions.is_empty() || self.indices.is_empty() {
            return Err(ResourceError::decode(path, "no face/vertex elements found"));
        }
        if self.indices.len() % 3 != 0 {
            return Err(ResourceError::decode(path, "faces are not triangles"));
        }
        let n = self.positions.len();
        if let Some(i) = self.indices.iter().find(|&&i| i >= n) {
            return Err(ResourceError::decode(
                path,
                format!("vertex index {i} out of range (vertices {n})"),
            ));
        }
        Ok(())
    }
}

/// Reads mesh bounds from PLY and OBJ files.
#[derive(Copy, Clone, Debug, Default)]
pub struct MeshLoader;

impl MeshBounds for MeshLoader {
    fn bounds(&self, path: &str) -> Result<Bounds3f, ResourceError> {
        let mesh = TriangleMesh::load(path)?;
        let b = mesh
            .bounds()
            .ok_or_else(|| ResourceError::decode(path, "mesh has no vertices"))?;
        debug!(
            "Mesh '{path}': {} triangles, extents {:?}",
            mesh.triangle_count(),
            b.extents()
        );
        Ok(b)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use core::holo::Float;
    use float_cmp::approx_eq;

    pub fn write_temp(name: &str, contents: &str) -> String {
        let dir = std::env::temp_dir().join("holo-shapes-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn validate_rejects_dangling_index() {
        let mesh = TriangleMesh::new(
            vec![point3(0.0, 0.0, 0.0), point3(1.0, 0.0, 0.0)],
            vec![0, 1, 2],
        );
        assert!(matches!(
            mesh.validate("bad.ply"),
            Err(ResourceError::DecodeError { .. })
        ));
    }

    #[test]
    fn loader_reads_obj_bounds() {
        let path = write_temp(
            "box.obj",
            "v -1 0 0\nv 1 2 0\nv 0 0 5\nv 0 -2 1\nf 1 2 3\nf 1 3 4\n",
        );
        let b = MeshLoader.bounds(&path).unwrap();
        let e = b.extents();
        assert!(approx_eq!(Float, e.x, 2.0));
        assert!(approx_eq!(Float, e.y, 4.0));
        assert!(approx_eq!(Float, e.z, 5.0));
    }

    #[test]
    fn loader_missing_file() {
        let path = std::env::temp_dir()
            .join("holo-shapes-tests/nowhere.ply")
            .to_string_lossy()
            .into_owned();
        assert_eq!(
            MeshLoader.bounds(&path),
            Err(ResourceError::FileNotFound(path.clone()))
        );
    }
}
