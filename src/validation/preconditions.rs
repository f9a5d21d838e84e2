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

use rug::Rational;

use crate::geometry::point_2::Point2;
use crate::geometry::region::Region2;
use crate::kernel::{orient2d, polygon_double_area};
use crate::symbolic::poly::Poly;
use crate::symbolic::symbol::Symbol;

pub const SUPPORTED_GEOMETRY_CLASS: &str = "convex_polygon_2d_linear";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeCode {
    UnsupportedGeometryClass,
    NotAPolygon,
    NonlinearFacet,
    DegeneratePolygon,
    NonStrictlyConvex,
    InconsistentOrientation,
    InwardNormalInconsistent,
    VertexNotOnBoundary,
}

impl ScopeCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeCode::UnsupportedGeometryClass => "unsupported-geometry-class",
            ScopeCode::NotAPolygon => "not-a-polygon",
            ScopeCode::NonlinearFacet => "nonlinear-facet",
            ScopeCode::DegeneratePolygon => "degenerate-polygon",
            ScopeCode::NonStrictlyConvex => "non-strictly-convex",
            ScopeCode::InconsistentOrientation => "inconsistent-orientation",
            ScopeCode::InwardNormalInconsistent => "inward-normal-inconsistent",
            ScopeCode::VertexNotOnBoundary => "vertex-not-on-boundary",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScopeViolation {
    pub code: ScopeCode,
    pub detail: String,
}

impl fmt::Display for ScopeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.detail)
    }
}

/// Raised by the asserting wrapper when any scope violation was collected.
#[derive(Debug)]
pub struct OutOfScopeInput {
    pub violations: Vec<ScopeViolation>,
}

impl fmt::Display for OutOfScopeInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.code.as_str(), v.detail))
            .collect();
        write!(f, "out-of-scope input: {}", joined.join("; "))
    }
}

impl Error for OutOfScopeInput {}

/// Validates that named facet equations plus a cyclic vertex list describe a
/// strictly convex linear polygon with consistent orientation, inward-facing
/// half-spaces and every vertex on at least two facets. Facet equations
/// arrive as general polynomials so that nonlinearity is detectable before
/// anything is coerced into the typed linear model. All violations are
/// collected; nothing fails fast.
pub fn validate_canonical_scope(
    x: &Symbol,
    y: &Symbol,
    facets: &[(String, Poly)],
    vertices: &[Point2],
    geometry_class: &str,
) -> Vec<ScopeViolation> {
    let mut issues: Vec<ScopeViolation> = Vec::new();

    if geometry_class != SUPPORTED_GEOMETRY_CLASS {
        issues.push(ScopeViolation {
            code: ScopeCode::UnsupportedGeometryClass,
            detail: format!(
                "got geometry_class `{geometry_class}`; supported=[{SUPPORTED_GEOMETRY_CLASS}]"
            ),
        });
    }

    if vertices.len() < 3 {
        issues.push(ScopeViolation {
            code: ScopeCode::NotAPolygon,
            detail: format!("need >=3 vertices, got {}", vertices.len()),
        });
        return issues;
    }

    for (name, expr) in facets {
        if expr.total_degree() > 1 {
            issues.push(ScopeViolation {
                code: ScopeCode::NonlinearFacet,
                detail: format!("facet {name} is not linear in ({x}, {y}): {expr}"),
            });
        }
    }

    let area2 = polygon_double_area(vertices);
    if area2.cmp0() == Ordering::Equal {
        issues.push(ScopeViolation {
            code: ScopeCode::DegeneratePolygon,
            detail: "signed area is zero".to_string(),
        });
    } else {
        let positively_oriented = area2.cmp0() == Ordering::Greater;
        let n = vertices.len();
        for i in 0..n {
            let turn = orient2d(&vertices[i], &vertices[(i + 1) % n], &vertices[(i + 2) % n]);
            match turn.cmp0() {
                Ordering::Equal => {
                    issues.push(ScopeViolation {
                        code: ScopeCode::NonStrictlyConvex,
                        detail: format!(
                            "collinear consecutive vertices at indices ({}, {}, {})",
                            i,
                            (i + 1) % n,
                            (i + 2) % n
                        ),
                    });
                }
                ordering => {
                    if (ordering == Ordering::Greater) != positively_oriented {
                        issues.push(ScopeViolation {
                            code: ScopeCode::InconsistentOrientation,
                            detail: format!("turn sign mismatch near vertex index {}", (i + 1) % n),
                        });
                        break;
                    }
                }
            }
        }
    }

    // Half-space orientation: the polygon centroid must be strictly inside
    // every facet.
    let mut cx = Rational::new();
    let mut cy = Rational::new();
    for v in vertices {
        cx += &v.x;
        cy += &v.y;
    }
    cx /= vertices.len() as u32;
    cy /= vertices.len() as u32;
    for (name, expr) in facets {
        let value = expr.eval(&[(x.clone(), cx.clone()), (y.clone(), cy.clone())]);
        if value.cmp0() != Ordering::Greater {
            issues.push(ScopeViolation {
                code: ScopeCode::InwardNormalInconsistent,
                detail: format!(
                    "facet {name} does not orient interior as >=0 at centroid ({cx}, {cy}); value={value}"
                ),
            });
        }
    }

    // Boundary coverage: each polygon corner sits on at least two facets.
    for (i, v) in vertices.iter().enumerate() {
        let hits = facets
            .iter()
            .filter(|(_, expr)| {
                expr.eval(&[(x.clone(), v.x.clone()), (y.clone(), v.y.clone())])
                    .cmp0()
                    == Ordering::Equal
            })
            .count();
        if hits < 2 {
            issues.push(ScopeViolation {
                code: ScopeCode::VertexNotOnBoundary,
                detail: format!("vertex index {i}={v} lies on only {hits} facets"),
            });
        }
    }

    issues
}

/// Adapts a built `Region2` into the raw-equation gate with the default
/// geometry class.
pub fn validate_region_scope(region: &Region2, vertices: &[Point2]) -> Vec<ScopeViolation> {
    let facets: Vec<(String, Poly)> = region
        .facets
        .iter()
        .map(|(name, line)| (name.clone(), line.expr.to_poly()))
        .collect();
    validate_canonical_scope(&region.x, &region.y, &facets, vertices, SUPPORTED_GEOMETRY_CLASS)
}

/// Fail-fast wrapper: raises with every collected code joined.
pub fn assert_canonical_scope(
    x: &Symbol,
    y: &Symbol,
    facets: &[(String, Poly)],
    vertices: &[Point2],
    geometry_class: &str,
) -> Result<(), OutOfScopeInput> {
    let violations = validate_canonical_scope(x, y, facets, vertices, geometry_class);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(OutOfScopeInput { violations })
    }
}
