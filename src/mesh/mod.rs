//! Triangle mesh topology checks over a decoded [`Document`].

mod adjacency;
mod error;
mod winding;

pub use adjacency::{
    directed_edges, FaceAdjacency, FACE_ELEMENT, VERTEX_ELEMENT, VERTEX_INDEX_ALIAS,
    VERTEX_INDICES,
};
pub use error::MeshError;
pub use winding::{WindingChecker, WindingDefect, WindingOptions, WindingPolicy, WindingReport};

use crate::Document;

/// Build the vertex to face table for a document's triangles.
pub fn build_face_adjacency(doc: &Document) -> Result<FaceAdjacency, MeshError> {
    FaceAdjacency::from_document(doc)
}

/// Check that every triangle reachable from `seed_face` agrees with its
/// neighbors on winding, stopping at the first defect.
pub fn check_winding(doc: &Document, seed_face: usize) -> Result<WindingReport, MeshError> {
    check_winding_with(doc, WindingOptions::default().with_seed(seed_face))
}

pub fn check_winding_with(
    doc: &Document,
    options: WindingOptions,
) -> Result<WindingReport, MeshError> {
    let adjacency = build_face_adjacency(doc)?;
    WindingChecker::new(&adjacency).with_options(options).run()
}
