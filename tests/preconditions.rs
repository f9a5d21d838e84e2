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

use posgeo::geometry::Point2;
use posgeo::geometry::fixtures::{SquareHoleFixture, all_fixtures};
use posgeo::numeric::{rat, rat_int};
use posgeo::symbolic::{Poly, Symbol};
use posgeo::validation::preconditions::SUPPORTED_GEOMETRY_CLASS;
use posgeo::validation::{
    ScopeCode, assert_canonical_scope, validate_canonical_scope, validate_region_scope,
};

struct SquareSpec {
    x: Symbol,
    y: Symbol,
    facets: Vec<(String, Poly)>,
}

fn square_region(flip_x_sign: bool, nonlinear_top: bool) -> SquareSpec {
    let x = Symbol::new("x");
    let y = Symbol::new("y");
    let px = Poly::from_symbol(&x);
    let py = Poly::from_symbol(&y);
    let one = Poly::one();

    let left = if flip_x_sign { px.neg() } else { px.clone() };
    let bottom = if nonlinear_top {
        px.pow(2).add(&py)
    } else {
        py.clone()
    };
    let facets = vec![
        ("left".to_string(), left),
        ("bottom".to_string(), bottom),
        ("right".to_string(), one.sub(&px)),
        ("top".to_string(), one.sub(&py)),
    ];
    SquareSpec { x, y, facets }
}

fn square_vertices() -> Vec<Point2> {
    vec![
        Point2::new(0, 0),
        Point2::new(1, 0),
        Point2::new(1, 1),
        Point2::new(0, 1),
    ]
}

fn codes(spec: &SquareSpec, vertices: &[Point2], class: &str) -> Vec<ScopeCode> {
    validate_canonical_scope(&spec.x, &spec.y, &spec.facets, vertices, class)
        .into_iter()
        .map(|v| v.code)
        .collect()
}

#[test]
fn reports_nonlinear_facet() {
    let spec = square_region(false, true);
    let found = codes(&spec, &square_vertices(), SUPPORTED_GEOMETRY_CLASS);
    assert!(found.contains(&ScopeCode::NonlinearFacet));
}

#[test]
fn reports_degenerate_polygon() {
    let spec = square_region(false, false);
    let vertices = vec![Point2::new(0, 0), Point2::new(1, 0), Point2::new(2, 0)];
    let found = codes(&spec, &vertices, SUPPORTED_GEOMETRY_CLASS);
    assert!(found.contains(&ScopeCode::DegeneratePolygon));
}

#[test]
fn reports_non_strict_convexity() {
    let spec = square_region(false, false);
    let vertices = vec![
        Point2::new(0, 0),
        Point2::new(1, 0),
        Point2::new(2, 0),
        Point2::new(2, 1),
        Point2::new(0, 1),
    ];
    let found = codes(&spec, &vertices, SUPPORTED_GEOMETRY_CLASS);
    assert!(found.contains(&ScopeCode::NonStrictlyConvex));
}

#[test]
fn reports_inconsistent_orientation() {
    let spec = square_region(false, false);
    // A reflex vertex at (1/2, 1/2).
    let vertices = vec![
        Point2::new(0, 0),
        Point2::new(1, 0),
        Point2::new(rat(1, 2), rat(1, 2)),
        Point2::new(1, 1),
        Point2::new(0, 1),
    ];
    let found = codes(&spec, &vertices, SUPPORTED_GEOMETRY_CLASS);
    assert!(found.contains(&ScopeCode::InconsistentOrientation));
}

#[test]
fn reports_inward_normal_inconsistency() {
    let spec = square_region(true, false);
    let found = codes(&spec, &square_vertices(), SUPPORTED_GEOMETRY_CLASS);
    assert!(found.contains(&ScopeCode::InwardNormalInconsistent));
}

#[test]
fn reports_unsupported_geometry_class() {
    let spec = square_region(false, false);
    let found = codes(&spec, &square_vertices(), "ellipse_2d");
    assert!(found.contains(&ScopeCode::UnsupportedGeometryClass));
}

#[test]
fn reports_not_a_polygon() {
    let spec = square_region(false, false);
    let vertices = vec![Point2::new(0, 0), Point2::new(1, 0)];
    let found = codes(&spec, &vertices, SUPPORTED_GEOMETRY_CLASS);
    assert_eq!(found, vec![ScopeCode::NotAPolygon]);
}

#[test]
fn vertex_off_every_facet_is_reported() {
    let spec = square_region(false, false);
    // Pentagon-like list where (1/2, 2) sits on no facet line.
    let vertices = vec![
        Point2::new(0, 0),
        Point2::new(1, 0),
        Point2::new(1, 1),
        Point2::new(rat(1, 2), 2),
        Point2::new(0, 1),
    ];
    let found = codes(&spec, &vertices, SUPPORTED_GEOMETRY_CLASS);
    assert!(found.contains(&ScopeCode::VertexNotOnBoundary));
}

#[test]
fn assert_wrapper_joins_all_codes() {
    let spec = square_region(true, true);
    let err = assert_canonical_scope(
        &spec.x,
        &spec.y,
        &spec.facets,
        &square_vertices(),
        "ellipse_2d",
    )
    .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("out-of-scope input"));
    assert!(message.contains("unsupported-geometry-class"));
    assert!(message.contains("nonlinear-facet"));
    assert!(message.contains("is not linear"));
    assert!(message.contains("inward-normal-inconsistent"));
}

#[test]
fn positive_control_fixtures_are_clean() {
    for fixture in all_fixtures() {
        let region = fixture.build_region();
        let violations = validate_region_scope(&region, &fixture.vertices);
        assert!(
            violations.is_empty(),
            "[{}] unexpected violations: {:?}",
            fixture.name,
            violations
        );
    }
}

#[test]
fn flattened_hole_loop_is_rejected() {
    let fixture = SquareHoleFixture::build();
    let region = fixture.combined_region();
    let violations = validate_region_scope(&region, &fixture.flattened_vertices_single_loop());
    let found: Vec<ScopeCode> = violations.iter().map(|v| v.code).collect();
    // The flattened two-component loop cannot be a convex single boundary:
    // walking outer-then-inner vertices mixes turn directions.
    assert!(
        found.contains(&ScopeCode::InconsistentOrientation)
            || found.contains(&ScopeCode::NonStrictlyConvex),
        "got {found:?}"
    );
}

#[test]
fn hole_facet_with_outward_normal_is_rejected() {
    // Orienting a hole edge the way an outer facet is oriented leaves the
    // region centroid on its negative side.
    let fixture = SquareHoleFixture::build();
    let mut facets: Vec<(String, Poly)> = fixture
        .outer_facets
        .iter()
        .map(|(name, line)| (name.clone(), line.expr.to_poly()))
        .collect();
    // x - 2/3 is negative at the outer square's centroid.
    let flipped = fixture.inner_facets["I_R"].expr.neg().to_poly();
    facets.push(("I_R_flipped".to_string(), flipped));

    let violations = validate_canonical_scope(
        &fixture.x,
        &fixture.y,
        &facets,
        &fixture.outer_vertices_ccw,
        SUPPORTED_GEOMETRY_CLASS,
    );
    let found: Vec<ScopeCode> = violations.iter().map(|v| v.code).collect();
    assert!(found.contains(&ScopeCode::InwardNormalInconsistent));
}

#[test]
fn constant_facet_is_not_linear_but_fails_centroid_check() {
    let x = Symbol::new("x");
    let y = Symbol::new("y");
    let facets = vec![
        ("left".to_string(), Poly::from_symbol(&x)),
        ("bottom".to_string(), Poly::from_symbol(&y)),
        ("right".to_string(), Poly::one().sub(&Poly::from_symbol(&x))),
        ("top".to_string(), Poly::one().sub(&Poly::from_symbol(&y))),
        ("ghost".to_string(), Poly::constant(rat_int(-1))),
    ];
    let violations =
        validate_canonical_scope(&x, &y, &facets, &square_vertices(), SUPPORTED_GEOMETRY_CLASS);
    let found: Vec<ScopeCode> = violations.iter().map(|v| v.code).collect();
    // Degree-0 expressions pass the linearity probe but a negative constant
    // cannot contain the centroid.
    assert!(found.contains(&ScopeCode::InwardNormalInconsistent));
}
