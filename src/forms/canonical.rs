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

use rug::Rational;

use crate::geometry::point_2::Point2;
use crate::geometry::region::Region2;
use crate::geometry::triangle::Triangle2;
use crate::symbolic::ratfn::RatFn;
use crate::symbolic::symbol::Symbol;
use crate::validation::triangulation::{InvalidTriangulation, validate_triangulation};

/// `prefactor(x, y) dx ∧ dy`. Immutable value type owned by whichever
/// computation produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canonical2Form {
    pub x: Symbol,
    pub y: Symbol,
    pub prefactor: RatFn,
}

impl Canonical2Form {
    pub fn new(x: Symbol, y: Symbol, prefactor: RatFn) -> Self {
        Canonical2Form { x, y, prefactor }
    }

    pub fn eval(&self, p: &Point2) -> Option<Rational> {
        self.prefactor.eval(&[
            (self.x.clone(), p.x.clone()),
            (self.y.clone(), p.y.clone()),
        ])
    }
}

/// `prefactor(t) dt`, the residue of a 2-form along one facet in one chart's
/// parametrization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canonical1Form {
    pub t: Symbol,
    pub prefactor: RatFn,
}

impl Canonical1Form {
    pub fn new(t: Symbol, prefactor: RatFn) -> Self {
        Canonical1Form { t, prefactor }
    }
}

/// An ordered collection of triangles sharing ambient symbols.
#[derive(Clone, Debug)]
pub struct Triangulation2 {
    pub triangles: Vec<Triangle2>,
}

impl Triangulation2 {
    pub fn new(triangles: Vec<Triangle2>) -> Self {
        Triangulation2 { triangles }
    }
}

/// Validates the triangulation, then sums the per-triangle prefactors
/// exactly. Internal (diagonal) poles cancel in the reduced sum, so a valid
/// triangulation of a polygon leaves poles only on the polygon's boundary
/// lines; two valid triangulations of the same polygon yield the identical
/// reduced prefactor.
pub fn canonical_form_from_triangulation(
    tri: &Triangulation2,
    region: Option<&Region2>,
    target_vertices: Option<&[Point2]>,
) -> Result<Canonical2Form, InvalidTriangulation> {
    validate_triangulation(tri, region, target_vertices)?;
    let x = tri.triangles[0].x.clone();
    let y = tri.triangles[0].y.clone();
    let mut f = RatFn::zero();
    for triangle in &tri.triangles {
        f = f.add(&triangle.canonical_form().prefactor);
    }
    Ok(Canonical2Form { x, y, prefactor: f })
}
