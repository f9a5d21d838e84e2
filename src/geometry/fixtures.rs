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

//! Named polygon fixtures: cyclic vertex lists, facet equations, chart
//! tables and two independent triangulations per polygon, in plain
//! coefficient form. Ambient and chart symbols are minted at build time so
//! fixtures never share coordinates with each other or across charts.

use std::collections::BTreeMap;

use rug::Rational;

use crate::forms::canonical::Triangulation2;
use crate::forms::residues::FacetChart;
use crate::geometry::lines::OrientedLine2;
use crate::geometry::point_2::Point2;
use crate::geometry::region::Region2;
use crate::geometry::triangle::{Triangle2, TriangleError};
use crate::numeric::{rat, rat_int};
use crate::symbolic::linear::LinExpr;
use crate::symbolic::symbol::Symbol;

/// One chart in coefficient form: `x_of = cu*u + ct*t + c0`, same for
/// `y_of`; `s` is the Jacobian determinant of the map.
#[derive(Clone, Debug)]
pub struct ChartSpec {
    pub name: &'static str,
    pub x_of: [Rational; 3],
    pub y_of: [Rational; 3],
    pub s: i32,
}

/// A named polygon with everything the pipeline consumes: vertices in cyclic
/// order, facet equations `a*x + b*y + c`, at least two charts per facet and
/// two independent triangulations as index triples into the vertex list.
#[derive(Clone, Debug)]
pub struct NamedFixture2 {
    pub name: &'static str,
    pub vertices: Vec<Point2>,
    pub facets: Vec<(&'static str, [Rational; 3])>,
    pub charts: Vec<(&'static str, Vec<ChartSpec>)>,
    pub triangulation_a: Vec<[usize; 3]>,
    pub triangulation_b: Vec<[usize; 3]>,
}

impl NamedFixture2 {
    /// Builds the region with fresh ambient symbols.
    pub fn build_region(&self) -> Region2 {
        let x = Symbol::new("x");
        let y = Symbol::new("y");
        let facets: BTreeMap<String, OrientedLine2> = self
            .facets
            .iter()
            .map(|(name, [a, b, c])| {
                let expr = LinExpr::new(
                    vec![(x.clone(), a.clone()), (y.clone(), b.clone())],
                    c.clone(),
                );
                (name.to_string(), OrientedLine2::new(&x, &y, expr))
            })
            .collect();
        Region2::new(x, y, facets)
    }

    /// Builds the chart table, minting fresh `(u, t)` symbols per chart.
    pub fn facet_charts(&self) -> BTreeMap<String, Vec<FacetChart>> {
        self.charts
            .iter()
            .map(|(facet_name, specs)| {
                let charts = specs
                    .iter()
                    .map(|spec| {
                        let u = Symbol::new(&format!("u__{}", spec.name));
                        let t = Symbol::new(&format!("t__{}", spec.name));
                        let affine = |coeffs: &[Rational; 3]| {
                            LinExpr::new(
                                vec![(u.clone(), coeffs[0].clone()), (t.clone(), coeffs[1].clone())],
                                coeffs[2].clone(),
                            )
                        };
                        FacetChart::new(
                            spec.name,
                            u.clone(),
                            t.clone(),
                            affine(&spec.x_of),
                            affine(&spec.y_of),
                            spec.s,
                        )
                    })
                    .collect();
                (facet_name.to_string(), charts)
            })
            .collect()
    }

    fn triangulation(
        &self,
        x: &Symbol,
        y: &Symbol,
        indices: &[[usize; 3]],
    ) -> Result<Triangulation2, TriangleError> {
        let triangles = indices
            .iter()
            .map(|&[i, j, k]| {
                Triangle2::from_vertices(
                    x,
                    y,
                    self.vertices[i].clone(),
                    self.vertices[j].clone(),
                    self.vertices[k].clone(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Triangulation2::new(triangles))
    }

    pub fn triangulation_a(&self, x: &Symbol, y: &Symbol) -> Result<Triangulation2, TriangleError> {
        self.triangulation(x, y, &self.triangulation_a)
    }

    pub fn triangulation_b(&self, x: &Symbol, y: &Symbol) -> Result<Triangulation2, TriangleError> {
        self.triangulation(x, y, &self.triangulation_b)
    }
}

/// Pentagon inside the unit square:
/// `x > 0`, `y > 0`, `1-x > 0`, `1-y > 0`, `x+y-1/2 > 0`, with vertices
/// `(0,1/2), (0,1), (1,1), (1,0), (1/2,0)` in cyclic order. Both
/// triangulations are vertex fans (around `v1` and around `v3`).
pub fn m1_pentagon() -> NamedFixture2 {
    NamedFixture2 {
        name: "m1_pentagon",
        vertices: vec![
            Point2::new(0, rat(1, 2)),
            Point2::new(0, 1),
            Point2::new(1, 1),
            Point2::new(1, 0),
            Point2::new(rat(1, 2), 0),
        ],
        facets: vec![
            ("L1_x", [rat_int(1), rat_int(0), rat_int(0)]),
            ("L2_y", [rat_int(0), rat_int(1), rat_int(0)]),
            ("L3_1mx", [rat_int(-1), rat_int(0), rat_int(1)]),
            ("L4_1my", [rat_int(0), rat_int(-1), rat_int(1)]),
            ("L5_xpy_mhalf", [rat_int(1), rat_int(1), rat(-1, 2)]),
        ],
        charts: vec![
            (
                "L1_x",
                vec![
                    ChartSpec {
                        name: "L1_x__t=y",
                        x_of: [rat_int(1), rat_int(0), rat_int(0)],
                        y_of: [rat_int(0), rat_int(1), rat_int(0)],
                        s: 1,
                    },
                    ChartSpec {
                        name: "L1_x__t=1-y",
                        x_of: [rat_int(1), rat_int(0), rat_int(0)],
                        y_of: [rat_int(0), rat_int(-1), rat_int(1)],
                        s: -1,
                    },
                ],
            ),
            (
                "L2_y",
                vec![
                    ChartSpec {
                        name: "L2_y__t=x",
                        x_of: [rat_int(0), rat_int(1), rat_int(0)],
                        y_of: [rat_int(1), rat_int(0), rat_int(0)],
                        s: -1,
                    },
                    ChartSpec {
                        name: "L2_y__t=1-x",
                        x_of: [rat_int(0), rat_int(-1), rat_int(1)],
                        y_of: [rat_int(1), rat_int(0), rat_int(0)],
                        s: 1,
                    },
                ],
            ),
            (
                "L3_1mx",
                vec![
                    ChartSpec {
                        name: "L3_1mx__t=y",
                        x_of: [rat_int(-1), rat_int(0), rat_int(1)],
                        y_of: [rat_int(0), rat_int(1), rat_int(0)],
                        s: -1,
                    },
                    ChartSpec {
                        name: "L3_1mx__t=1-y",
                        x_of: [rat_int(-1), rat_int(0), rat_int(1)],
                        y_of: [rat_int(0), rat_int(-1), rat_int(1)],
                        s: 1,
                    },
                ],
            ),
            (
                "L4_1my",
                vec![
                    ChartSpec {
                        name: "L4_1my__t=x",
                        x_of: [rat_int(0), rat_int(1), rat_int(0)],
                        y_of: [rat_int(-1), rat_int(0), rat_int(1)],
                        s: 1,
                    },
                    ChartSpec {
                        name: "L4_1my__t=1-x",
                        x_of: [rat_int(0), rat_int(-1), rat_int(1)],
                        y_of: [rat_int(-1), rat_int(0), rat_int(1)],
                        s: -1,
                    },
                ],
            ),
            (
                "L5_xpy_mhalf",
                vec![
                    ChartSpec {
                        name: "L5__t=x",
                        x_of: [rat_int(0), rat_int(1), rat_int(0)],
                        y_of: [rat_int(1), rat_int(-1), rat(1, 2)],
                        s: -1,
                    },
                    ChartSpec {
                        name: "L5__t=y",
                        x_of: [rat_int(1), rat_int(-1), rat(1, 2)],
                        y_of: [rat_int(0), rat_int(1), rat_int(0)],
                        s: 1,
                    },
                ],
            ),
        ],
        triangulation_a: vec![[1, 2, 3], [1, 3, 4], [1, 4, 0]],
        triangulation_b: vec![[3, 4, 0], [3, 0, 1], [3, 1, 2]],
    }
}

/// Convex quadrilateral `x > 0`, `y > 0`, `1-y > 0`, `2-x+y > 0` with
/// vertices `(0,0), (2,0), (3,1), (0,1)`; the two triangulations use the
/// two diagonals.
pub fn q1_quadrilateral() -> NamedFixture2 {
    NamedFixture2 {
        name: "q1_quadrilateral",
        vertices: vec![
            Point2::new(0, 0),
            Point2::new(2, 0),
            Point2::new(3, 1),
            Point2::new(0, 1),
        ],
        facets: vec![
            ("Q1_Lx", [rat_int(1), rat_int(0), rat_int(0)]),
            ("Q1_By", [rat_int(0), rat_int(1), rat_int(0)]),
            ("Q1_T1my", [rat_int(0), rat_int(-1), rat_int(1)]),
            ("Q1_D2mXpy", [rat_int(-1), rat_int(1), rat_int(2)]),
        ],
        charts: vec![
            (
                "Q1_Lx",
                vec![
                    ChartSpec {
                        name: "Q1_Lx__t=y",
                        x_of: [rat_int(1), rat_int(0), rat_int(0)],
                        y_of: [rat_int(0), rat_int(1), rat_int(0)],
                        s: 1,
                    },
                    ChartSpec {
                        name: "Q1_Lx__t=1-y",
                        x_of: [rat_int(1), rat_int(0), rat_int(0)],
                        y_of: [rat_int(0), rat_int(-1), rat_int(1)],
                        s: -1,
                    },
                ],
            ),
            (
                "Q1_By",
                vec![
                    ChartSpec {
                        name: "Q1_By__t=x",
                        x_of: [rat_int(0), rat_int(1), rat_int(0)],
                        y_of: [rat_int(1), rat_int(0), rat_int(0)],
                        s: -1,
                    },
                    ChartSpec {
                        name: "Q1_By__t=2-x",
                        x_of: [rat_int(0), rat_int(-1), rat_int(2)],
                        y_of: [rat_int(1), rat_int(0), rat_int(0)],
                        s: 1,
                    },
                ],
            ),
            (
                "Q1_T1my",
                vec![
                    ChartSpec {
                        name: "Q1_T1my__t=x",
                        x_of: [rat_int(0), rat_int(1), rat_int(0)],
                        y_of: [rat_int(-1), rat_int(0), rat_int(1)],
                        s: 1,
                    },
                    ChartSpec {
                        name: "Q1_T1my__t=3-x",
                        x_of: [rat_int(0), rat_int(-1), rat_int(3)],
                        y_of: [rat_int(-1), rat_int(0), rat_int(1)],
                        s: -1,
                    },
                ],
            ),
            (
                "Q1_D2mXpy",
                vec![
                    ChartSpec {
                        name: "Q1_D2mXpy__t=x",
                        x_of: [rat_int(-1), rat_int(1), rat_int(0)],
                        y_of: [rat_int(0), rat_int(1), rat_int(-2)],
                        s: -1,
                    },
                    ChartSpec {
                        name: "Q1_D2mXpy__t=y",
                        x_of: [rat_int(-1), rat_int(1), rat_int(2)],
                        y_of: [rat_int(0), rat_int(1), rat_int(0)],
                        s: -1,
                    },
                ],
            ),
        ],
        triangulation_a: vec![[0, 1, 2], [0, 2, 3]],
        triangulation_b: vec![[0, 1, 3], [1, 2, 3]],
    }
}

/// Hexagon `x > 0`, `y > 0`, `2-x > 0`, `2-y > 0`, `x+y-1 > 0`,
/// `3-x-y > 0` with vertices `(0,1), (0,2), (1,2), (2,1), (2,0), (1,0)`;
/// both triangulations are vertex fans.
pub fn h1_hexagon() -> NamedFixture2 {
    NamedFixture2 {
        name: "h1_hexagon",
        vertices: vec![
            Point2::new(0, 1),
            Point2::new(0, 2),
            Point2::new(1, 2),
            Point2::new(2, 1),
            Point2::new(2, 0),
            Point2::new(1, 0),
        ],
        facets: vec![
            ("H1_x", [rat_int(1), rat_int(0), rat_int(0)]),
            ("H2_y", [rat_int(0), rat_int(1), rat_int(0)]),
            ("H3_2mx", [rat_int(-1), rat_int(0), rat_int(2)]),
            ("H4_2my", [rat_int(0), rat_int(-1), rat_int(2)]),
            ("H5_xpy_m1", [rat_int(1), rat_int(1), rat_int(-1)]),
            ("H6_3mxmy", [rat_int(-1), rat_int(-1), rat_int(3)]),
        ],
        charts: vec![
            (
                "H1_x",
                vec![
                    ChartSpec {
                        name: "H1_x__t=y",
                        x_of: [rat_int(1), rat_int(0), rat_int(0)],
                        y_of: [rat_int(0), rat_int(1), rat_int(0)],
                        s: 1,
                    },
                    ChartSpec {
                        name: "H1_x__t=2-y",
                        x_of: [rat_int(1), rat_int(0), rat_int(0)],
                        y_of: [rat_int(0), rat_int(-1), rat_int(2)],
                        s: -1,
                    },
                ],
            ),
            (
                "H2_y",
                vec![
                    ChartSpec {
                        name: "H2_y__t=x",
                        x_of: [rat_int(0), rat_int(1), rat_int(0)],
                        y_of: [rat_int(1), rat_int(0), rat_int(0)],
                        s: -1,
                    },
                    ChartSpec {
                        name: "H2_y__t=2-x",
                        x_of: [rat_int(0), rat_int(-1), rat_int(2)],
                        y_of: [rat_int(1), rat_int(0), rat_int(0)],
                        s: 1,
                    },
                ],
            ),
            (
                "H3_2mx",
                vec![
                    ChartSpec {
                        name: "H3_2mx__t=y",
                        x_of: [rat_int(-1), rat_int(0), rat_int(2)],
                        y_of: [rat_int(0), rat_int(1), rat_int(0)],
                        s: -1,
                    },
                    ChartSpec {
                        name: "H3_2mx__t=2-y",
                        x_of: [rat_int(-1), rat_int(0), rat_int(2)],
                        y_of: [rat_int(0), rat_int(-1), rat_int(2)],
                        s: 1,
                    },
                ],
            ),
            (
                "H4_2my",
                vec![
                    ChartSpec {
                        name: "H4_2my__t=x",
                        x_of: [rat_int(0), rat_int(1), rat_int(0)],
                        y_of: [rat_int(-1), rat_int(0), rat_int(2)],
                        s: 1,
                    },
                    ChartSpec {
                        name: "H4_2my__t=2-x",
                        x_of: [rat_int(0), rat_int(-1), rat_int(2)],
                        y_of: [rat_int(-1), rat_int(0), rat_int(2)],
                        s: -1,
                    },
                ],
            ),
            (
                "H5_xpy_m1",
                vec![
                    ChartSpec {
                        name: "H5_xpy_m1__t=x",
                        x_of: [rat_int(0), rat_int(1), rat_int(0)],
                        y_of: [rat_int(1), rat_int(-1), rat_int(1)],
                        s: -1,
                    },
                    ChartSpec {
                        name: "H5_xpy_m1__t=y",
                        x_of: [rat_int(1), rat_int(-1), rat_int(1)],
                        y_of: [rat_int(0), rat_int(1), rat_int(0)],
                        s: 1,
                    },
                ],
            ),
            (
                "H6_3mxmy",
                vec![
                    ChartSpec {
                        name: "H6_3mxmy__t=x",
                        x_of: [rat_int(-1), rat_int(1), rat_int(0)],
                        y_of: [rat_int(0), rat_int(-1), rat_int(3)],
                        s: 1,
                    },
                    ChartSpec {
                        name: "H6_3mxmy__t=y",
                        x_of: [rat_int(-1), rat_int(-1), rat_int(3)],
                        y_of: [rat_int(0), rat_int(1), rat_int(0)],
                        s: -1,
                    },
                ],
            ),
        ],
        triangulation_a: vec![[1, 2, 3], [1, 3, 4], [1, 4, 5], [1, 5, 0]],
        triangulation_b: vec![[4, 5, 0], [4, 0, 1], [4, 1, 2], [4, 2, 3]],
    }
}

pub fn all_fixtures() -> Vec<NamedFixture2> {
    vec![m1_pentagon(), q1_quadrilateral(), h1_hexagon()]
}

/// Square-with-hole fixture exposing two boundary components.
///
/// The region with a hole is NOT supported by the pipeline; this fixture
/// exists so the scope gate and endpoint solver can demonstrate rejection.
/// `outer_vertices_ccw` and `inner_vertices_cw` carry the correct component
/// orientations for a positively oriented region with a hole; flattening
/// them into one loop is deliberately wrong.
#[derive(Clone, Debug)]
pub struct SquareHoleFixture {
    pub x: Symbol,
    pub y: Symbol,
    pub outer_facets: BTreeMap<String, OrientedLine2>,
    pub inner_facets: BTreeMap<String, OrientedLine2>,
    pub outer_vertices_ccw: Vec<Point2>,
    pub inner_vertices_cw: Vec<Point2>,
}

impl SquareHoleFixture {
    pub fn build() -> Self {
        let x = Symbol::new("x");
        let y = Symbol::new("y");
        let line = |a: Rational, b: Rational, c: Rational| {
            OrientedLine2::new(
                &x,
                &y,
                LinExpr::new(vec![(x.clone(), a), (y.clone(), b)], c),
            )
        };

        let mut outer_facets = BTreeMap::new();
        outer_facets.insert("O_L".to_string(), line(rat_int(1), rat_int(0), rat_int(0)));
        outer_facets.insert("O_B".to_string(), line(rat_int(0), rat_int(1), rat_int(0)));
        outer_facets.insert("O_R".to_string(), line(rat_int(-1), rat_int(0), rat_int(1)));
        outer_facets.insert("O_T".to_string(), line(rat_int(0), rat_int(-1), rat_int(1)));

        let mut inner_facets = BTreeMap::new();
        inner_facets.insert("I_L".to_string(), line(rat_int(1), rat_int(0), rat(-1, 3)));
        inner_facets.insert("I_B".to_string(), line(rat_int(0), rat_int(1), rat(-1, 3)));
        inner_facets.insert("I_R".to_string(), line(rat_int(-1), rat_int(0), rat(2, 3)));
        inner_facets.insert("I_T".to_string(), line(rat_int(0), rat_int(-1), rat(2, 3)));

        SquareHoleFixture {
            x,
            y,
            outer_facets,
            inner_facets,
            outer_vertices_ccw: vec![
                Point2::new(0, 0),
                Point2::new(1, 0),
                Point2::new(1, 1),
                Point2::new(0, 1),
            ],
            inner_vertices_cw: vec![
                Point2::new(rat(1, 3), rat(1, 3)),
                Point2::new(rat(1, 3), rat(2, 3)),
                Point2::new(rat(2, 3), rat(2, 3)),
                Point2::new(rat(2, 3), rat(1, 3)),
            ],
        }
    }

    /// Only the outer square; used to show hole-boundary factors classify as
    /// non-boundary poles.
    pub fn enclosing_region(&self) -> Region2 {
        Region2::new(self.x.clone(), self.y.clone(), self.outer_facets.clone())
    }

    /// Outer and inner facets together, still pretending there is a single
    /// boundary loop.
    pub fn combined_region(&self) -> Region2 {
        let mut facets = self.outer_facets.clone();
        for (name, line) in &self.inner_facets {
            facets.insert(name.clone(), line.clone());
        }
        Region2::new(self.x.clone(), self.y.clone(), facets)
    }

    /// Deliberately incorrect flattening used by legacy single-loop checks.
    pub fn flattened_vertices_single_loop(&self) -> Vec<Point2> {
        let mut verts = self.outer_vertices_ccw.clone();
        verts.extend(self.inner_vertices_cw.iter().cloned());
        verts
    }
}
