// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

use ahash::AHashMap;
use rug::Rational;
use smallvec::SmallVec;

use crate::forms::canonical::Triangulation2;
use crate::geometry::point_2::Point2;
use crate::geometry::region::Region2;
use crate::kernel::{orient2d, polygon_double_area};

/// One structural defect. Validation collects every defect before failing,
/// so a caller can diagnose all problems at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriangulationIssue {
    EmptyTriangulation,
    InconsistentSymbols {
        triangle_index: usize,
    },
    DegenerateTriangle {
        triangle_index: usize,
    },
    /// An undirected edge occurs more than twice (or some other impossible
    /// multiplicity): triangles overlap.
    InvalidEdgeMultiplicity {
        edge: (Point2, Point2),
        multiplicity: usize,
    },
    /// A shared edge is traversed twice in the same direction: the two
    /// incident triangles disagree on global orientation.
    InternalEdgeOrientationMismatch {
        edge: (Point2, Point2),
        forward_count: usize,
        reverse_count: usize,
    },
    RegionSymbolMismatch,
    InvalidTargetPolygon {
        vertex_count: usize,
    },
    /// Total unsigned triangle area differs from the target polygon's area:
    /// the triangulation has gaps or overlaps that edge multiplicities alone
    /// cannot see.
    AreaMismatch {
        triangulation_double_area: Rational,
        target_double_area: Rational,
    },
}

impl TriangulationIssue {
    pub fn code(&self) -> &'static str {
        match self {
            TriangulationIssue::EmptyTriangulation => "empty_triangulation",
            TriangulationIssue::InconsistentSymbols { .. } => "inconsistent_symbols",
            TriangulationIssue::DegenerateTriangle { .. } => "degenerate_triangle",
            TriangulationIssue::InvalidEdgeMultiplicity { .. } => "invalid_edge_multiplicity",
            TriangulationIssue::InternalEdgeOrientationMismatch { .. } => {
                "internal_edge_orientation_mismatch"
            }
            TriangulationIssue::RegionSymbolMismatch => "region_symbol_mismatch",
            TriangulationIssue::InvalidTargetPolygon { .. } => "invalid_target_polygon",
            TriangulationIssue::AreaMismatch { .. } => "area_mismatch",
        }
    }
}

impl fmt::Display for TriangulationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriangulationIssue::EmptyTriangulation => write!(f, "empty_triangulation"),
            TriangulationIssue::InconsistentSymbols { triangle_index } => {
                write!(f, "inconsistent_symbols at triangle {triangle_index}")
            }
            TriangulationIssue::DegenerateTriangle { triangle_index } => {
                write!(f, "degenerate_triangle at triangle {triangle_index}")
            }
            TriangulationIssue::InvalidEdgeMultiplicity { edge, multiplicity } => write!(
                f,
                "invalid_edge_multiplicity {} for edge {}-{}",
                multiplicity, edge.0, edge.1
            ),
            TriangulationIssue::InternalEdgeOrientationMismatch {
                edge,
                forward_count,
                reverse_count,
            } => write!(
                f,
                "internal_edge_orientation_mismatch for edge {}-{} (forward {}, reverse {})",
                edge.0, edge.1, forward_count, reverse_count
            ),
            TriangulationIssue::RegionSymbolMismatch => write!(f, "region_symbol_mismatch"),
            TriangulationIssue::InvalidTargetPolygon { vertex_count } => {
                write!(f, "invalid_target_polygon with {vertex_count} vertices")
            }
            TriangulationIssue::AreaMismatch {
                triangulation_double_area,
                target_double_area,
            } => write!(
                f,
                "area_mismatch: triangulation {triangulation_double_area}, target {target_double_area}"
            ),
        }
    }
}

#[derive(Debug)]
pub struct InvalidTriangulation {
    pub issues: Vec<TriangulationIssue>,
}

impl fmt::Display for InvalidTriangulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.issues.iter().map(|i| i.code()).collect();
        write!(
            f,
            "invalid triangulation with {} issue(s): [{}]",
            self.issues.len(),
            codes.join(", ")
        )
    }
}

impl Error for InvalidTriangulation {}

impl InvalidTriangulation {
    pub fn codes(&self) -> Vec<&'static str> {
        self.issues.iter().map(|i| i.code()).collect()
    }
}

fn undirected(a: &Point2, b: &Point2) -> (Point2, Point2) {
    if a < b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// Checks a triangulation's combinatorial and metric consistency before its
/// sum is trusted: shared symbols, no degenerate triangle, every undirected
/// edge of multiplicity 1 (boundary) or 2 with opposite directions (shared
/// interior edge), and, when a target vertex cycle is supplied, exact
/// agreement of total unsigned area. All violations are accumulated and
/// returned together.
pub fn validate_triangulation(
    tri: &Triangulation2,
    region: Option<&Region2>,
    target_vertices: Option<&[Point2]>,
) -> Result<(), InvalidTriangulation> {
    let mut issues: Vec<TriangulationIssue> = Vec::new();

    if tri.triangles.is_empty() {
        issues.push(TriangulationIssue::EmptyTriangulation);
        return Err(InvalidTriangulation { issues });
    }

    let x0 = &tri.triangles[0].x;
    let y0 = &tri.triangles[0].y;

    // Directed occurrences per undirected edge; interior edges carry exactly
    // two entries, so the inline capacity covers the valid case.
    let mut edges: AHashMap<(Point2, Point2), SmallVec<[(Point2, Point2); 2]>> = AHashMap::new();
    let mut total_double_area = Rational::new();

    for (idx, triangle) in tri.triangles.iter().enumerate() {
        if triangle.x != *x0 || triangle.y != *y0 {
            issues.push(TriangulationIssue::InconsistentSymbols {
                triangle_index: idx,
            });
        }

        let [v0, v1, v2] = &triangle.vertices;
        let two_area = orient2d(v0, v1, v2);
        if two_area.cmp0() == Ordering::Equal {
            issues.push(TriangulationIssue::DegenerateTriangle {
                triangle_index: idx,
            });
        }
        total_double_area += two_area.abs();

        for (start, end) in [(v0, v1), (v1, v2), (v2, v0)] {
            edges
                .entry(undirected(start, end))
                .or_default()
                .push((start.clone(), end.clone()));
        }
    }

    if let Some(region) = region {
        if region.x != *x0 || region.y != *y0 {
            issues.push(TriangulationIssue::RegionSymbolMismatch);
        }
    }

    let mut keys: Vec<(Point2, Point2)> = edges.keys().cloned().collect();
    keys.sort();
    for key in keys {
        let occurrences = &edges[&key];
        let multiplicity = occurrences.len();
        if multiplicity != 1 && multiplicity != 2 {
            issues.push(TriangulationIssue::InvalidEdgeMultiplicity {
                edge: key.clone(),
                multiplicity,
            });
        }
        if multiplicity == 2 {
            let forward_count = occurrences
                .iter()
                .filter(|(a, b)| *a == key.0 && *b == key.1)
                .count();
            let reverse_count = multiplicity - forward_count;
            if forward_count != 1 {
                issues.push(TriangulationIssue::InternalEdgeOrientationMismatch {
                    edge: key,
                    forward_count,
                    reverse_count,
                });
            }
        }
    }

    if let Some(vertices) = target_vertices {
        if vertices.len() < 3 {
            issues.push(TriangulationIssue::InvalidTargetPolygon {
                vertex_count: vertices.len(),
            });
        } else {
            let target_double_area = polygon_double_area(vertices).abs();
            if target_double_area != total_double_area {
                issues.push(TriangulationIssue::AreaMismatch {
                    triangulation_double_area: total_double_area.clone(),
                    target_double_area,
                });
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(InvalidTriangulation { issues })
    }
}
