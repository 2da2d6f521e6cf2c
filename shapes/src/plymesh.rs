//! PLY mesh.

use super::TriangleMesh;
use core::error::ResourceError;
use core::geometry::*;
use core::holo::Float;
use ply_rs::parser::Parser;
use ply_rs::ply::*;
use std::fs::File;
use std::io::BufReader;

/// Implements PLY mesh loading.
pub struct PLYMesh;

impl PLYMesh {
    /// Read a triangle mesh from a PLY file. Quads are split into two
    /// triangles; other polygons are rejected.
    ///
    /// * `path` - Path to the PLY file.
    pub fn read(path: &str) -> Result<TriangleMesh, ResourceError> {
        let file = File::open(path).map_err(|e| ResourceError::from_io(path, &e))?;
        let mut reader = BufReader::new(file);

        let parser = Parser::<DefaultElement>::new();
        let ply = parser
            .read_ply(&mut reader)
            .map_err(|e| ResourceError::from_io(path, &e))?;

        let mut positions: Vec<Point3f> = vec![];
        let mut indices: Vec<usize> = vec![];

        for (name, list) in ply.payload.iter() {
            match name.as_ref() {
                "vertex" => {
                    for elem in list.iter() {
                        positions.push(Self::parse_vertex(elem));
                    }
                }
                "face" => {
                    for elem in list.iter() {
                        Self::parse_face(elem, &mut indices)
                            .map_err(|reason| ResourceError::decode(path, reason))?;
                    }
                }
                s => warn!("Ignoring unexpected element '{}' in '{}'", s, path),
            }
        }

        info!(
            "Read PLY mesh '{}' with {} vertices and {} triangles",
            path,
            positions.len(),
            indices.len() / 3
        );

        Ok(TriangleMesh::new(positions, indices))
    }

    /// Parse the vertex position. Normals and texture coordinates are not
    /// needed and are skipped.
    ///
    /// * `elem` - A map of property names and values.
    fn parse_vertex(elem: &KeyMap<Property>) -> Point3f {
        let mut p = Point3f::default();

        for (name, value) in elem.iter() {
            let v = match value {
                Property::Float(v) => *v as Float,
                Property::Double(v) => *v as Float,
                _ => {
                    debug!("Ignoring unexpected vertex property type");
                    continue;
                }
            };
            match name.as_ref() {
                "x" => p.x = v,
                "y" => p.y = v,
                "z" => p.z = v,
                s => debug!("Ignoring vertex property '{}'", s),
            }
        }

        p
    }

    /// Parse face data. Only vertex indices are supported. These can be
    /// present as signed or unsigned lists and have to be converted to usize.
    ///
    /// * `elem`           - A map of property names and values.
    /// * `vertex_indices` - Receives the triangle indices.
    fn parse_face(elem: &KeyMap<Property>, vertex_indices: &mut Vec<usize>) -> Result<(), String> {
        for (name, value) in elem.iter() {
            match name.as_ref() {
                "vertex_indices" | "vertex_index" => {
                    let vi: Vec<usize> = match value {
                        Property::ListInt(vi) => to_indices(vi)?,
                        Property::ListUInt(vi) => vi.iter().map(|&i| i as usize).collect(),
                        Property::ListShort(vi) => to_indices(vi)?,
                        Property::ListUShort(vi) => vi.iter().map(|&i| i as usize).collect(),
                        Property::ListUChar(vi) => vi.iter().map(|&i| i as usize).collect(),
                        _ => {
                            debug!("Ignoring unexpected face property type");
                            continue;
                        }
                    };
                    match vi.len() {
                        3 => vertex_indices.extend_from_slice(&vi),
                        4 => {
                            vertex_indices.extend_from_slice(&vi[0..3]);
                            vertex_indices.extend_from_slice(&[vi[3], vi[0], vi[2]]);
                        }
                        n => return Err(format!("faces with {n} vertices are not supported")),
                    }
                }
                s => debug!("Ignoring unexpected face element '{}'", s),
            }
        }
        Ok(())
    }
}

/// Convert signed indices to `usize`, rejecting negative values.
///
/// * `vi` - Signed indices.
fn to_indices<T>(vi: &[T]) -> Result<Vec<usize>, String>
where
    T: Copy + TryInto<usize> + std::fmt::Display,
{
    vi.iter()
        .map(|&i| i.try_into().map_err(|_| format!("negative vertex index {i}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::tests::write_temp;

    const QUAD: &str = "ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
2 0 0
2 3 0
0 3 1
4 0 1 2 3
";

    #[test]
    fn quad_is_split_into_triangles() {
        let path = write_temp("quad.ply", QUAD);
        let mesh = PLYMesh::read(&path).unwrap();
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 0, 2]);
        assert_eq!(mesh.positions[2], point3(2.0, 3.0, 0.0));
        let b = mesh.bounds().unwrap();
        assert_eq!(b.extents(), vector3(2.0, 3.0, 1.0));
    }

    #[test]
    fn pentagon_is_rejected() {
        let path = write_temp(
            "pentagon.ply",
            &QUAD
                .replace("element vertex 4", "element vertex 5")
                .replace("0 3 1\n4 0 1 2 3", "0 3 1\n1 1 1\n5 0 1 2 3 4"),
        );
        assert!(matches!(
            PLYMesh::read(&path),
            Err(ResourceError::DecodeError { .. })
        ));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let path = write_temp("garbage.ply", "this is not a ply file\n");
        assert!(matches!(
            PLYMesh::read(&path),
            Err(ResourceError::DecodeError { .. })
        ));
    }
}
