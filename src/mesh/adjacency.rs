//! Vertex to face adjacency for triangle meshes.
//!
//! The table is derived from a decoded [`Document`] and never written back to
//! it: each vertex index maps to the set of faces that use it.

use hashbrown::HashSet;
use serde::Deserialize;
use tracing::debug;

use crate::mesh::error::MeshError;
use crate::{Document, PlyError};

/// Element holding vertex records.
pub const VERTEX_ELEMENT: &str = "vertex";
/// Element holding face records.
pub const FACE_ELEMENT: &str = "face";
/// Face property listing the vertex indices, in winding order.
pub const VERTEX_INDICES: &str = "vertex_indices";
/// Spelling of [`VERTEX_INDICES`] used by some exporters.
pub const VERTEX_INDEX_ALIAS: &str = "vertex_index";

#[derive(Deserialize)]
struct PolygonFace {
    #[serde(alias = "vertex_index")]
    vertex_indices: Vec<u32>,
}

/// Triangles plus, for every vertex, the set of faces incident to it.
#[derive(Debug, Clone)]
pub struct FaceAdjacency {
    faces: Vec<[u32; 3]>,
    vertex_faces: Vec<HashSet<usize>>,
}

impl FaceAdjacency {
    /// Build adjacency from the `vertex` and `face` elements of a document.
    ///
    /// Every face must be a triangle whose indices refer to existing vertices.
    pub fn from_document(doc: &Document) -> Result<Self, MeshError> {
        let vertices = doc.require_element(VERTEX_ELEMENT)?;
        let faces = doc.require_element(FACE_ELEMENT)?;

        let def = faces.def();
        if def.get_property(VERTEX_INDICES).is_none()
            && def.get_property(VERTEX_INDEX_ALIAS).is_none()
        {
            return Err(PlyError::MissingProperty {
                element: FACE_ELEMENT.to_string(),
                property: VERTEX_INDICES.to_string(),
            }
            .into());
        }

        let polygons = faces
            .deserialize_records::<PolygonFace>()?
            .into_iter()
            .map(|f| f.vertex_indices);
        Self::from_polygons(vertices.len(), polygons)
    }

    /// Build adjacency from arbitrary polygons, rejecting anything but triangles.
    pub fn from_polygons<I>(vertex_count: usize, polygons: I) -> Result<Self, MeshError>
    where
        I: IntoIterator<Item = Vec<u32>>,
    {
        let triangles = polygons
            .into_iter()
            .enumerate()
            .map(|(face, indices)| match indices.as_slice() {
                &[a, b, c] => Ok([a, b, c]),
                _ => Err(MeshError::NotTriangle {
                    face,
                    len: indices.len(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_triangles(vertex_count, triangles)
    }

    /// Build adjacency in a single pass over the faces.
    pub fn from_triangles(vertex_count: usize, faces: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        let mut vertex_faces = vec![HashSet::new(); vertex_count];

        for (face_idx, face) in faces.iter().enumerate() {
            for (i, &v) in face.iter().enumerate() {
                if face[i + 1..].contains(&v) {
                    return Err(MeshError::DegenerateFace {
                        face: face_idx,
                        vertex: v,
                    });
                }
                let incident = vertex_faces.get_mut(v as usize).ok_or(
                    MeshError::InvalidVertexIndex {
                        face: face_idx,
                        index: v,
                        vertex_count,
                    },
                )?;
                incident.insert(face_idx);
            }
        }

        debug!(
            "Built adjacency for {} vertices and {} faces",
            vertex_count,
            faces.len()
        );

        Ok(Self {
            faces,
            vertex_faces,
        })
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_faces.len()
    }

    /// Vertex indices of a face in stored winding order.
    pub fn face(&self, face: usize) -> Option<[u32; 3]> {
        self.faces.get(face).copied()
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Faces incident to a vertex. Empty for unused or unknown vertices.
    pub fn faces_for_vertex(&self, vertex: u32) -> impl Iterator<Item = usize> + '_ {
        self.vertex_faces
            .get(vertex as usize)
            .into_iter()
            .flat_map(|faces| faces.iter().copied())
    }

    /// Faces other than `exclude` that use both `v0` and `v1`, in ascending order.
    pub fn faces_sharing_edge(&self, v0: u32, v1: u32, exclude: usize) -> Vec<usize> {
        let (Some(a), Some(b)) = (
            self.vertex_faces.get(v0 as usize),
            self.vertex_faces.get(v1 as usize),
        ) else {
            return Vec::new();
        };
        let mut shared: Vec<usize> = a
            .intersection(b)
            .copied()
            .filter(|&f| f != exclude)
            .collect();
        shared.sort_unstable();
        shared
    }

    /// Whether `face` walks the directed edge `from -> to`.
    pub fn traverses(&self, face: usize, from: u32, to: u32) -> bool {
        self.face(face)
            .is_some_and(|tri| directed_edges(tri).contains(&(from, to)))
    }
}

/// The three directed edges of a triangle, following its winding.
#[inline]
pub fn directed_edges([a, b, c]: [u32; 3]) -> [(u32, u32); 3] {
    [(a, b), (b, c), (c, a)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_faces() {
        let adj = FaceAdjacency::from_triangles(4, vec![[0, 1, 2], [2, 1, 3]]).unwrap();

        let mut at_one: Vec<usize> = adj.faces_for_vertex(1).collect();
        at_one.sort();
        assert_eq!(at_one, vec![0, 1]);
        assert_eq!(adj.faces_for_vertex(0).collect::<Vec<_>>(), vec![0]);
        assert_eq!(adj.faces_for_vertex(99).count(), 0);

        assert_eq!(adj.faces_sharing_edge(1, 2, 0), vec![1]);
        assert!(adj.faces_sharing_edge(0, 1, 0).is_empty());
        assert!(adj.traverses(1, 2, 1));
        assert!(!adj.traverses(1, 1, 2));
    }

    #[test]
    fn test_rejects_non_triangles() {
        let err = FaceAdjacency::from_polygons(4, vec![vec![0, 1, 2], vec![0, 1, 2, 3]])
            .unwrap_err();
        assert!(matches!(err, MeshError::NotTriangle { face: 1, len: 4 }));
    }

    #[test]
    fn test_rejects_bad_indices() {
        let err = FaceAdjacency::from_triangles(3, vec![[0, 1, 3]]).unwrap_err();
        assert!(matches!(
            err,
            MeshError::InvalidVertexIndex {
                face: 0,
                index: 3,
                vertex_count: 3
            }
        ));

        let err = FaceAdjacency::from_triangles(3, vec![[0, 1, 0]]).unwrap_err();
        assert!(matches!(err, MeshError::DegenerateFace { face: 0, vertex: 0 }));
    }
}
