//! Error types for mesh topology checks.

use thiserror::Error;

use crate::mesh::winding::WindingDefect;
use crate::PlyError;

/// Errors raised while building face adjacency or validating winding.
#[derive(Debug, Error)]
pub enum MeshError {
    /// The document could not supply vertex or face data.
    #[error(transparent)]
    Ply(#[from] PlyError),

    /// A face is not a triangle.
    #[error("face {face} has {len} vertex indices, only triangles are supported")]
    NotTriangle {
        /// Index of the offending face.
        face: usize,
        /// Number of vertex indices it lists.
        len: usize,
    },

    /// A triangle lists the same vertex more than once.
    #[error("face {face} repeats vertex {vertex}")]
    DegenerateFace { face: usize, vertex: u32 },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index} (mesh has {vertex_count} vertices)")]
    InvalidVertexIndex {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    /// The traversal seed is not a face of the mesh.
    #[error("seed face {seed} is out of range (mesh has {face_count} faces)")]
    SeedOutOfRange { seed: usize, face_count: usize },

    /// An edge is shared by more than two triangles.
    #[error("non-manifold edge ({}, {}) on face {face}: also used by faces {faces:?}", .edge.0, .edge.1)]
    NonManifoldEdge {
        /// Face being checked when the edge was found.
        face: usize,
        /// Directed edge as traversed by `face`.
        edge: (u32, u32),
        /// The other faces incident to the edge.
        faces: Vec<usize>,
    },

    /// A triangle's winding disagrees with at least one neighbor.
    #[error("bad face {face}: winding disagrees with {} neighbor(s)", .defects.len())]
    BadFace {
        face: usize,
        defects: Vec<WindingDefect>,
    },
}
