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

use posgeo::forms::{Triangulation2, canonical_form_from_triangulation};
use posgeo::geometry::fixtures::m1_pentagon;
use posgeo::geometry::{OrientedLine2, Point2, Triangle2, line_through};
use posgeo::symbolic::Symbol;
use posgeo::validation::validate_triangulation;

fn xy() -> (Symbol, Symbol) {
    (Symbol::new("x"), Symbol::new("y"))
}

fn unit_right_triangle(x: &Symbol, y: &Symbol) -> Triangle2 {
    Triangle2::from_vertices(x, y, Point2::new(0, 0), Point2::new(1, 0), Point2::new(0, 1))
        .unwrap()
}

fn square() -> Vec<Point2> {
    vec![
        Point2::new(0, 0),
        Point2::new(1, 0),
        Point2::new(1, 1),
        Point2::new(0, 1),
    ]
}

#[test]
fn doubled_triangle_reports_orientation_and_area() {
    let (x, y) = xy();
    let tri = unit_right_triangle(&x, &y);
    let triangulation = Triangulation2::new(vec![tri.clone(), tri]);
    let target = vec![Point2::new(0, 0), Point2::new(1, 0), Point2::new(0, 1)];

    let err = canonical_form_from_triangulation(&triangulation, None, Some(&target)).unwrap_err();
    let codes = err.codes();
    assert!(codes.contains(&"internal_edge_orientation_mismatch"));
    assert!(codes.contains(&"area_mismatch"));
}

#[test]
fn gap_reports_area_mismatch_alone() {
    let (x, y) = xy();
    // Half of the unit square against the full square target.
    let tri = Triangle2::from_vertices(
        &x,
        &y,
        Point2::new(0, 0),
        Point2::new(1, 0),
        Point2::new(1, 1),
    )
    .unwrap();
    let triangulation = Triangulation2::new(vec![tri]);

    let err =
        canonical_form_from_triangulation(&triangulation, None, Some(&square())).unwrap_err();
    assert_eq!(err.codes(), vec!["area_mismatch"]);
}

#[test]
fn inconsistent_winding_reports_orientation_mismatch() {
    let (x, y) = xy();
    // Both triangles traverse the shared diagonal (0,0)-(1,1) in the same
    // direction, so their windings disagree.
    let t1 = Triangle2::from_vertices(
        &x,
        &y,
        Point2::new(0, 0),
        Point2::new(1, 0),
        Point2::new(1, 1),
    )
    .unwrap();
    let t2 = Triangle2::from_vertices(
        &x,
        &y,
        Point2::new(0, 0),
        Point2::new(0, 1),
        Point2::new(1, 1),
    )
    .unwrap();
    let triangulation = Triangulation2::new(vec![t1, t2]);

    let err =
        canonical_form_from_triangulation(&triangulation, None, Some(&square())).unwrap_err();
    let codes = err.codes();
    assert!(codes.contains(&"internal_edge_orientation_mismatch"));
    // Areas add up to the square, so that check stays clean.
    assert!(!codes.contains(&"area_mismatch"));
}

#[test]
fn empty_triangulation_is_rejected() {
    let triangulation = Triangulation2::new(Vec::new());
    let err = validate_triangulation(&triangulation, None, None).unwrap_err();
    assert_eq!(err.codes(), vec!["empty_triangulation"]);
}

#[test]
fn mixed_symbols_are_rejected() {
    let (x, y) = xy();
    let (x2, y2) = xy();
    let t1 = unit_right_triangle(&x, &y);
    let t2 = Triangle2::from_vertices(
        &x2,
        &y2,
        Point2::new(1, 0),
        Point2::new(1, 1),
        Point2::new(0, 1),
    )
    .unwrap();
    let triangulation = Triangulation2::new(vec![t1, t2]);

    let err = validate_triangulation(&triangulation, None, None).unwrap_err();
    assert!(err.codes().contains(&"inconsistent_symbols"));
}

#[test]
fn region_symbol_mismatch_is_reported() {
    let (x, y) = xy();
    let t1 = unit_right_triangle(&x, &y);
    let triangulation = Triangulation2::new(vec![t1]);

    // Region built with its own fresh ambient symbols.
    let region = m1_pentagon().build_region();
    let err = validate_triangulation(&triangulation, Some(&region), None).unwrap_err();
    assert!(err.codes().contains(&"region_symbol_mismatch"));
}

#[test]
fn degenerate_triangle_is_reported() {
    let (x, y) = xy();
    // Assembled directly: `from_vertices` refuses collinear input, but the
    // validator still owns the check for triangles built elsewhere.
    let a = Point2::new(0, 0);
    let b = Point2::new(1, 0);
    let c = Point2::new(2, 0);
    let degenerate = Triangle2 {
        x: x.clone(),
        y: y.clone(),
        vertices: [a.clone(), b.clone(), c.clone()],
        edges: [
            OrientedLine2::new(&x, &y, line_through(&x, &y, &b, &c)),
            OrientedLine2::new(&x, &y, line_through(&x, &y, &c, &a)),
            OrientedLine2::new(&x, &y, line_through(&x, &y, &a, &b)),
        ],
    };
    let triangulation = Triangulation2::new(vec![degenerate]);

    let err = validate_triangulation(&triangulation, None, None).unwrap_err();
    assert!(err.codes().contains(&"degenerate_triangle"));
}

#[test]
fn undersized_target_polygon_is_reported() {
    let (x, y) = xy();
    let triangulation = Triangulation2::new(vec![unit_right_triangle(&x, &y)]);
    let target = vec![Point2::new(0, 0), Point2::new(1, 0)];

    let err = validate_triangulation(&triangulation, None, Some(&target)).unwrap_err();
    assert_eq!(err.codes(), vec!["invalid_target_polygon"]);
}

#[test]
fn overlapping_fan_reports_edge_multiplicity() {
    let (x, y) = xy();
    // Three triangles sharing the edge (0,0)-(1,1): multiplicity 3.
    let t1 = Triangle2::from_vertices(
        &x,
        &y,
        Point2::new(0, 0),
        Point2::new(1, 0),
        Point2::new(1, 1),
    )
    .unwrap();
    let t2 = Triangle2::from_vertices(
        &x,
        &y,
        Point2::new(0, 0),
        Point2::new(1, 1),
        Point2::new(0, 1),
    )
    .unwrap();
    let t3 = Triangle2::from_vertices(
        &x,
        &y,
        Point2::new(0, 0),
        Point2::new(1, 1),
        Point2::new(2, 0),
    )
    .unwrap();
    let triangulation = Triangulation2::new(vec![t1, t2, t3]);

    let err = validate_triangulation(&triangulation, None, None).unwrap_err();
    assert!(err.codes().contains(&"invalid_edge_multiplicity"));
}

#[test]
fn error_message_lists_all_codes() {
    let (x, y) = xy();
    let tri = unit_right_triangle(&x, &y);
    let triangulation = Triangulation2::new(vec![tri.clone(), tri]);
    let target = vec![Point2::new(0, 0), Point2::new(1, 0), Point2::new(0, 1)];

    let err = validate_triangulation(&triangulation, None, Some(&target)).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("invalid triangulation"));
    assert!(message.contains("internal_edge_orientation_mismatch"));
    assert!(message.contains("area_mismatch"));
}
