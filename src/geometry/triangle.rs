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

use std::error::Error;
use std::fmt;

use rug::Rational;

use crate::forms::canonical::Canonical2Form;
use crate::geometry::lines::{OrientedLine2, line_through, orient_positive_at};
use crate::geometry::point_2::Point2;
use crate::symbolic::poly::Poly;
use crate::symbolic::ratfn::RatFn;
use crate::symbolic::symbol::Symbol;

#[derive(Debug, PartialEq, Eq)]
pub enum TriangleError {
    CollinearVertices,
}

impl fmt::Display for TriangleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriangleError::CollinearVertices => {
                write!(f, "triangle vertices are collinear; edges cannot be oriented")
            }
        }
    }
}

impl Error for TriangleError {}

/// Exact triangle: three vertices plus the three edge lines, each oriented
/// strictly positive at the centroid.
#[derive(Clone, Debug)]
pub struct Triangle2 {
    pub x: Symbol,
    pub y: Symbol,
    pub vertices: [Point2; 3],
    pub edges: [OrientedLine2; 3],
}

impl Triangle2 {
    pub fn from_vertices(
        x: &Symbol,
        y: &Symbol,
        v0: Point2,
        v1: Point2,
        v2: Point2,
    ) -> Result<Self, TriangleError> {
        let mut cx = v0.x.clone();
        cx += &v1.x;
        cx += &v2.x;
        cx /= 3u32;
        let mut cy = v0.y.clone();
        cy += &v1.y;
        cy += &v2.y;
        cy /= 3u32;
        let centroid = Point2 { x: cx, y: cy };

        // Edges oppose their vertex: e0 through (v1,v2), e1 through (v2,v0),
        // e2 through (v0,v1). For collinear input the centroid lies on the
        // common line and orientation fails.
        let e0 = line_through(x, y, &v1, &v2);
        let e1 = line_through(x, y, &v2, &v0);
        let e2 = line_through(x, y, &v0, &v1);

        let mut oriented = [e0, e1, e2].into_iter().map(|e| {
            orient_positive_at(e, x, y, &centroid).ok_or(TriangleError::CollinearVertices)
        });
        let e0 = oriented.next().unwrap()?;
        let e1 = oriented.next().unwrap()?;
        let e2 = oriented.next().unwrap()?;

        Ok(Triangle2 {
            x: x.clone(),
            y: y.clone(),
            vertices: [v0, v1, v2],
            edges: [
                OrientedLine2::new(x, y, e0),
                OrientedLine2::new(x, y, e1),
                OrientedLine2::new(x, y, e2),
            ],
        })
    }

    pub fn centroid(&self) -> Point2 {
        let [v0, v1, v2] = &self.vertices;
        let mut cx = v0.x.clone();
        cx += &v1.x;
        cx += &v2.x;
        cx /= 3u32;
        let mut cy = v0.y.clone();
        cy += &v1.y;
        cy += &v2.y;
        cy /= 3u32;
        Point2 { x: cx, y: cy }
    }

    /// Canonical 2-form of the triangle, `f(x, y) dx ∧ dy` with
    ///
    /// ```text
    /// f = det(∇l0,∇l1)/(l0·l1) + det(∇l1,∇l2)/(l1·l2) + det(∇l2,∇l0)/(l2·l0)
    /// ```
    ///
    /// the unique rational function (for this edge-orientation convention)
    /// with simple poles exactly on the three edge lines.
    pub fn canonical_form(&self) -> Canonical2Form {
        let term = |i: usize, j: usize| -> RatFn {
            let (ai, bi) = self.edges[i].grad();
            let (aj, bj) = self.edges[j].grad();
            let mut det = ai;
            det *= &bj;
            let mut back = bi;
            back *= &aj;
            det -= &back;
            RatFn::new(
                Poly::constant(det),
                vec![
                    (self.edges[i].expr.clone(), 1),
                    (self.edges[j].expr.clone(), 1),
                ],
            )
        };
        let f = term(0, 1).add(&term(1, 2)).add(&term(2, 0));
        Canonical2Form {
            x: self.x.clone(),
            y: self.y.clone(),
            prefactor: f,
        }
    }

    /// Twice the signed area of the vertex triple.
    pub fn double_signed_area(&self) -> Rational {
        crate::kernel::orient2d(&self.vertices[0], &self.vertices[1], &self.vertices[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::rat_int;
    use crate::symbolic::linear::LinExpr;

    #[test]
    fn edges_are_positive_at_centroid() {
        let x = Symbol::new("x");
        let y = Symbol::new("y");
        let tri = Triangle2::from_vertices(
            &x,
            &y,
            Point2::new(0, 0),
            Point2::new(1, 0),
            Point2::new(0, 1),
        )
        .unwrap();
        let c = tri.centroid();
        for edge in &tri.edges {
            assert!(edge.eval_at(&c) > rat_int(0));
        }
    }

    #[test]
    fn collinear_vertices_are_rejected() {
        let x = Symbol::new("x");
        let y = Symbol::new("y");
        let err = Triangle2::from_vertices(
            &x,
            &y,
            Point2::new(0, 0),
            Point2::new(1, 1),
            Point2::new(2, 2),
        )
        .unwrap_err();
        assert_eq!(err, TriangleError::CollinearVertices);
    }

    #[test]
    fn unit_simplex_form_is_the_classic_one() {
        let x = Symbol::new("x");
        let y = Symbol::new("y");
        let tri = Triangle2::from_vertices(
            &x,
            &y,
            Point2::new(0, 0),
            Point2::new(1, 0),
            Point2::new(0, 1),
        )
        .unwrap();
        let omega = tri.canonical_form();
        // 1 / (x * y * (1 - x - y))
        let expected = RatFn::new(
            Poly::one(),
            vec![
                (LinExpr::from_symbol(&x), 1),
                (LinExpr::from_symbol(&y), 1),
                (
                    LinExpr::new(
                        vec![(x.clone(), rat_int(-1)), (y.clone(), rat_int(-1))],
                        rat_int(1),
                    ),
                    1,
                ),
            ],
        );
        assert_eq!(omega.prefactor, expected);
    }
}
