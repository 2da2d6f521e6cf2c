//! Wavefront OBJ mesh.

use super::TriangleMesh;
use core::error::ResourceError;
use core::geometry::*;

/// Implements OBJ mesh loading.
pub struct OBJMesh;

impl OBJMesh {
    /// Read all models of an OBJ file into a single triangulated mesh.
    /// Materials referenced by the file are ignored.
    ///
    /// * `path` - Path to the OBJ file.
    pub fn read(path: &str) -> Result<TriangleMesh, ResourceError> {
        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path, &options).map_err(|e| match e {
            tobj::LoadError::OpenFileFailed => ResourceError::FileNotFound(path.to_string()),
            e => ResourceError::decode(path, e),
        })?;

        let mut positions: Vec<Point3f> = vec![];
        let mut indices: Vec<usize> = vec![];
        for model in models.iter() {
            let offset = positions.len();
            let mesh = &model.mesh;
            positions.extend(mesh.positions.chunks_exact(3).map(|p| point3(p[0], p[1], p[2])));
            indices.extend(mesh.indices.iter().map(|&i| offset + i as usize));
            debug!("OBJ model '{}' in '{}'", model.name, path);
        }

        info!(
            "Read OBJ mesh '{}' with {} vertices and {} triangles",
            path,
            positions.len(),
            indices.len() / 3
        );

        Ok(TriangleMesh::new(positions, indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::tests::write_temp;

    #[test]
    fn models_are_merged() {
        let path = write_temp(
            "two.obj",
            "o a\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no b\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n",
        );
        let mesh = OBJMesh::read(&path).unwrap();
        assert_eq!(mesh.positions.len(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.indices.iter().all(|&i| i < 6));
        assert_eq!(mesh.bounds().unwrap().extents(), vector3(1.0, 1.0, 1.0));
    }

    #[test]
    fn quads_are_triangulated() {
        let path = write_temp("quad.obj", "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n");
        let mesh = OBJMesh::read(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }
}
