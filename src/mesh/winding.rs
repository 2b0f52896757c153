//! Winding consistency check for triangle meshes.
//!
//! Two triangles sharing an edge agree on their facing when they walk that
//! edge in opposite directions. Starting from a seed face, the checker walks
//! face adjacency depth first with an explicit stack and verifies every shared
//! edge it meets. Only the connected component of the seed is explored.

use std::fmt;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};

use crate::mesh::adjacency::{directed_edges, FaceAdjacency};
use crate::mesh::error::MeshError;

/// What to do when a defect is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindingPolicy {
    /// Abort on the first non-manifold edge or inconsistent face.
    #[default]
    FailFast,
    /// Explore the whole component and report every defect.
    CollectAll,
}

/// Settings for a winding check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindingOptions {
    /// Face the traversal starts from.
    pub seed_face: usize,
    pub policy: WindingPolicy,
}

impl WindingOptions {
    pub fn with_seed(mut self, seed_face: usize) -> Self {
        self.seed_face = seed_face;
        self
    }

    pub fn with_policy(mut self, policy: WindingPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// A structural problem found on one edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindingDefect {
    /// `face` and `neighbor` walk `edge` in the same direction.
    Inconsistent {
        face: usize,
        neighbor: usize,
        edge: (u32, u32),
    },
    /// `edge` of `face` is shared with more than one other face.
    NonManifold {
        face: usize,
        edge: (u32, u32),
        faces: Vec<usize>,
    },
}

impl WindingDefect {
    /// Face that was being checked when the defect was found.
    pub fn face(&self) -> usize {
        match self {
            WindingDefect::Inconsistent { face, .. } | WindingDefect::NonManifold { face, .. } => {
                *face
            }
        }
    }
}

impl fmt::Display for WindingDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindingDefect::Inconsistent {
                face,
                neighbor,
                edge,
            } => write!(
                f,
                "faces {face} and {neighbor} both traverse edge ({}, {})",
                edge.0, edge.1
            ),
            WindingDefect::NonManifold { face, edge, faces } => write!(
                f,
                "edge ({}, {}) of face {face} is also used by faces {faces:?}",
                edge.0, edge.1
            ),
        }
    }
}

/// Outcome of a completed traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindingReport {
    /// Faces checked, in visitation order.
    pub visited: Vec<usize>,
    /// Edges with no neighboring face.
    pub boundary_edges: usize,
    /// Defects found. Always empty under [`WindingPolicy::FailFast`].
    pub defects: Vec<WindingDefect>,
}

impl WindingReport {
    pub fn is_consistent(&self) -> bool {
        self.defects.is_empty()
    }
}

pub struct WindingChecker<'a> {
    adjacency: &'a FaceAdjacency,
    options: WindingOptions,
}

impl<'a> WindingChecker<'a> {
    pub fn new(adjacency: &'a FaceAdjacency) -> Self {
        Self {
            adjacency,
            options: WindingOptions::default(),
        }
    }

    pub fn with_options(mut self, options: WindingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(&self) -> Result<WindingReport, MeshError> {
        let adj = self.adjacency;
        let collect = self.options.policy == WindingPolicy::CollectAll;
        let mut report = WindingReport::default();

        if adj.face_count() == 0 {
            info!("Mesh has no faces, nothing to check");
            return Ok(report);
        }
        let seed = self.options.seed_face;
        if seed >= adj.face_count() {
            return Err(MeshError::SeedOutOfRange {
                seed,
                face_count: adj.face_count(),
            });
        }

        let mut visited = HashSet::new();
        let mut to_visit = vec![seed];

        while let Some(face) = to_visit.pop() {
            if visited.contains(&face) {
                continue;
            }
            let Some(tri) = adj.face(face) else {
                continue;
            };
            trace!("Checking face {face}: {tri:?}");

            let mut face_defects = Vec::new();
            for (i1, i2) in directed_edges(tri) {
                let shared = adj.faces_sharing_edge(i1, i2, face);
                match shared.as_slice() {
                    [] => report.boundary_edges += 1,
                    &[neighbor] => {
                        if collect && visited.contains(&neighbor) {
                            continue;
                        }
                        if adj.traverses(neighbor, i2, i1) && !adj.traverses(neighbor, i1, i2) {
                            to_visit.push(neighbor);
                        } else {
                            face_defects.push(WindingDefect::Inconsistent {
                                face,
                                neighbor,
                                edge: (i1, i2),
                            });
                            if collect {
                                to_visit.push(neighbor);
                            }
                        }
                    }
                    _ if collect => face_defects.push(WindingDefect::NonManifold {
                        face,
                        edge: (i1, i2),
                        faces: shared,
                    }),
                    _ => {
                        return Err(MeshError::NonManifoldEdge {
                            face,
                            edge: (i1, i2),
                            faces: shared,
                        })
                    }
                }
            }

            if !face_defects.is_empty() {
                if !collect {
                    return Err(MeshError::BadFace {
                        face,
                        defects: face_defects,
                    });
                }
                for defect in &face_defects {
                    warn!("Winding defect: {defect}");
                }
                report.defects.append(&mut face_defects);
            }

            visited.insert(face);
            report.visited.push(face);
        }

        info!(
            "Checked winding of {} of {} faces ({} boundary edges, {} defects)",
            report.visited.len(),
            adj.face_count(),
            report.boundary_edges,
            report.defects.len()
        );
        Ok(report)
    }
}
