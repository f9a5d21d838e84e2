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

use crate::forms::canonical::{Canonical1Form, Canonical2Form};
use crate::geometry::point_2::Point2;
use crate::geometry::region::Region2;
use crate::numeric::rat;
use crate::symbolic::linear::LinExpr;
use crate::symbolic::poly::Poly;
use crate::symbolic::ratfn::{PoleLimit, RatFn};
use crate::symbolic::symbol::Symbol;

/// Chart for computing residues along a facet.
///
/// Parametrizes `(x, y) = (x_of(u, t), y_of(u, t))` such that the facet is
/// exactly `u = 0` and `t` runs along the boundary. `s` records the
/// orientation relation `dx ∧ dy = s · du ∧ dt`; for these affine charts it
/// must equal the Jacobian determinant exactly.
///
/// Chart symbols are minted per chart and never shared across charts or
/// facets, otherwise parameters alias across reparametrization solves.
#[derive(Clone, Debug)]
pub struct FacetChart {
    pub name: String,
    pub u: Symbol,
    pub t: Symbol,
    pub x_of: LinExpr,
    pub y_of: LinExpr,
    pub s: i32,
}

impl FacetChart {
    pub fn new(name: &str, u: Symbol, t: Symbol, x_of: LinExpr, y_of: LinExpr, s: i32) -> Self {
        assert!(s == 1 || s == -1, "chart orientation must be +1 or -1");
        FacetChart {
            name: name.to_string(),
            u,
            t,
            x_of,
            y_of,
            s,
        }
    }
}

#[derive(Debug)]
pub enum ResidueError {
    /// The 2-form has a pole of order above one along `u = 0` in this chart.
    HigherOrderPole { chart: String },
    UnknownFacet { facet: String },
    /// The facet equation does not vanish on exactly two polygon vertices.
    FacetVertexCount { facet: String, found: usize },
    /// The facet's two vertices are not adjacent in the vertex cycle, so the
    /// facet does not correspond to a single polygon edge.
    FacetVerticesNotAdjacent { facet: String },
    /// Neither boundary coordinate depends on `t` at `u = 0`.
    ChartInversionFailed { chart: String },
    /// Inverting one coordinate contradicts the other at a vertex.
    ChartVertexMismatch { chart: String, vertex: Point2 },
}

impl fmt::Display for ResidueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResidueError::HigherOrderPole { chart } => {
                write!(f, "form has a higher-order pole along u=0 in chart {chart}")
            }
            ResidueError::UnknownFacet { facet } => write!(f, "unknown facet {facet}"),
            ResidueError::FacetVertexCount { facet, found } => {
                write!(f, "expected 2 vertices on facet {facet}, got {found}")
            }
            ResidueError::FacetVerticesNotAdjacent { facet } => {
                write!(f, "facet {facet} vertices are not adjacent in the vertex cycle")
            }
            ResidueError::ChartInversionFailed { chart } => {
                write!(f, "boundary map of chart {chart} does not determine t")
            }
            ResidueError::ChartVertexMismatch { chart, vertex } => {
                write!(f, "chart {chart} cannot reach vertex {vertex} on u=0")
            }
        }
    }
}

impl Error for ResidueError {}

#[derive(Debug)]
pub enum ReparamError {
    /// No boundary equation contains the unknown chart's parameter.
    Unsolvable { reference: String, other: String },
    /// A parameter solution exists but contradicts the remaining equation.
    Inconsistent { reference: String, other: String },
    /// The solved relation does not depend on the reference parameter; a
    /// constant "solution" is a solver failure, not a reparametrization.
    ConstantRelation { reference: String, other: String },
}

impl fmt::Display for ReparamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (what, reference, other) = match self {
            ReparamError::Unsolvable { reference, other } => ("no equation determines", reference, other),
            ReparamError::Inconsistent { reference, other } => ("inconsistent system for", reference, other),
            ReparamError::ConstantRelation { reference, other } => ("constant relation for", reference, other),
        };
        write!(f, "{what} reparametrization {other} <- {reference}")
    }
}

impl Error for ReparamError {}

/// Jacobian determinant `∂x/∂u·∂y/∂t − ∂x/∂t·∂y/∂u` of the affine chart.
pub fn chart_jacobian(chart: &FacetChart) -> Rational {
    let mut det = chart.x_of.coeff(&chart.u);
    det *= chart.y_of.coeff(&chart.t);
    let mut back = chart.x_of.coeff(&chart.t);
    back *= chart.y_of.coeff(&chart.u);
    det -= &back;
    det
}

/// Residue of `form` along the chart's facet:
///
/// ```text
/// g(t) = s · lim_{u→0} [ u · f(x(u,t), y(u,t)) ]
/// ```
///
/// Well-defined only when `f` has at most a simple pole along `u = 0` in
/// this chart; a higher-order pole is an error, not a value.
pub fn residue_2form_on_facet(
    form: &Canonical2Form,
    chart: &FacetChart,
) -> Result<Canonical1Form, ResidueError> {
    let f_ut = form
        .prefactor
        .subs_affine(&form.x, &chart.x_of)
        .subs_affine(&form.y, &chart.y_of);
    match f_ut.limit_times_power(&chart.u, 1) {
        PoleLimit::Finite(g) => Ok(Canonical1Form {
            t: chart.t.clone(),
            prefactor: g.scale(&Rational::from(chart.s)),
        }),
        PoleLimit::Unbounded => Err(ResidueError::HigherOrderPole {
            chart: chart.name.clone(),
        }),
    }
}

/// Pulls `g(t_old) dt_old` back through the affine reparametrization
/// `t_old = φ(t_new)`:
///
/// ```text
/// g_new(t_new) = g(φ(t_new)) · φ'(t_new)
/// ```
pub fn pullback_1form(form: &Canonical1Form, t_new: &Symbol, t_old_of_new: &LinExpr) -> Canonical1Form {
    let slope = t_old_of_new.coeff(t_new);
    let prefactor = form
        .prefactor
        .subs_affine(&form.t, t_old_of_new)
        .scale(&slope);
    Canonical1Form {
        t: t_new.clone(),
        prefactor,
    }
}

/// Solves `t_other = φ(t_ref)` by equating the two charts' boundary
/// parametrizations at `u = 0` and inverting in closed form. The affine
/// chart maps make a general equation solver unnecessary, and the failure
/// modes a solver can hide (no root, spurious constant root) are explicit
/// errors here.
pub fn solve_reparam(reference: &FacetChart, other: &FacetChart) -> Result<LinExpr, ReparamError> {
    let x0 = reference.x_of.subs_zero(&reference.u);
    let y0 = reference.y_of.subs_zero(&reference.u);
    let x1 = other.x_of.subs_zero(&other.u);
    let y1 = other.y_of.subs_zero(&other.u);

    let mut saw_candidate = false;
    // Solve the coordinate equation that contains t_other, then require the
    // remaining coordinate equation to hold identically in t_ref.
    for (lhs, rhs, check_lhs, check_rhs) in [(&x1, &x0, &y1, &y0), (&y1, &y0, &x1, &x0)] {
        let beta = lhs.coeff(&other.t);
        if beta.cmp0() == Ordering::Equal {
            continue;
        }
        let phi = rhs
            .sub(&LinExpr::constant(lhs.constant_term().clone()))
            .scale(&beta.recip());
        saw_candidate = true;
        if check_lhs.subs(&other.t, &phi) == *check_rhs {
            if phi.coeff(&reference.t).cmp0() == Ordering::Equal {
                return Err(ReparamError::ConstantRelation {
                    reference: reference.name.clone(),
                    other: other.name.clone(),
                });
            }
            return Ok(phi);
        }
    }

    if saw_candidate {
        Err(ReparamError::Inconsistent {
            reference: reference.name.clone(),
            other: other.name.clone(),
        })
    } else {
        Err(ReparamError::Unsolvable {
            reference: reference.name.clone(),
            other: other.name.clone(),
        })
    }
}

/// Canonical 1-form of the open interval with endpoints `a`, `b`:
/// `1/(t−a) + 1/(b−t)`.
pub fn interval_prefactor(t: &Symbol, a: &Rational, b: &Rational) -> RatFn {
    let mut neg_a = a.clone();
    neg_a = -neg_a;
    let mut neg_b = b.clone();
    neg_b = -neg_b;
    let first = RatFn::new(
        Poly::one(),
        vec![(LinExpr::affine(t, Rational::from(1), neg_a), 1)],
    );
    let second = RatFn::new(
        Poly::constant(Rational::from(-1)),
        vec![(LinExpr::affine(t, Rational::from(1), neg_b), 1)],
    );
    first.add(&second)
}

/// The two polygon vertices lying exactly on the facet, ordered by the
/// vertex cycle: `(v_start, v_end)` is the cycle-oriented boundary edge.
fn cycle_edge_vertices(
    region: &Region2,
    facet_name: &str,
    verts_ccw: &[Point2],
) -> Result<(Point2, Point2), ResidueError> {
    let facet = region
        .facets
        .get(facet_name)
        .ok_or_else(|| ResidueError::UnknownFacet {
            facet: facet_name.to_string(),
        })?;

    let on_facet: Vec<usize> = verts_ccw
        .iter()
        .enumerate()
        .filter(|(_, v)| facet.eval_at(v).cmp0() == Ordering::Equal)
        .map(|(i, _)| i)
        .collect();
    if on_facet.len() != 2 {
        return Err(ResidueError::FacetVertexCount {
            facet: facet_name.to_string(),
            found: on_facet.len(),
        });
    }

    let (ia, ib) = (on_facet[0], on_facet[1]);
    let n = verts_ccw.len();
    if (ia + 1) % n == ib {
        Ok((verts_ccw[ia].clone(), verts_ccw[ib].clone()))
    } else if (ib + 1) % n == ia {
        Ok((verts_ccw[ib].clone(), verts_ccw[ia].clone()))
    } else {
        Err(ResidueError::FacetVerticesNotAdjacent {
            facet: facet_name.to_string(),
        })
    }
}

/// Value of the chart parameter `t` at a boundary point, by closed-form
/// inversion of the affine map at `u = 0`. The coordinate that determines
/// `t` is inverted; the other coordinate must then agree with the point.
fn chart_t_at_boundary_point(chart: &FacetChart, p: &Point2) -> Result<Rational, ResidueError> {
    let x0 = chart.x_of.subs_zero(&chart.u);
    let y0 = chart.y_of.subs_zero(&chart.u);

    for (solve_on, target, check_on, check_target) in
        [(&x0, &p.x, &y0, &p.y), (&y0, &p.y, &x0, &p.x)]
    {
        let beta = solve_on.coeff(&chart.t);
        if beta.cmp0() == Ordering::Equal {
            continue;
        }
        let mut tv = target.clone();
        tv -= solve_on.constant_term();
        tv /= &beta;
        let reached = check_on.eval(&[(chart.t.clone(), tv.clone())]);
        if reached == *check_target {
            return Ok(tv);
        }
        return Err(ResidueError::ChartVertexMismatch {
            chart: chart.name.clone(),
            vertex: p.clone(),
        });
    }
    Err(ResidueError::ChartInversionFailed {
        chart: chart.name.clone(),
    })
}

/// Interval endpoints in the chart parameter, as `(min, max)`. The
/// orientation-agnostic oracle.
pub fn interval_endpoints_from_chart(
    region: &Region2,
    facet_name: &str,
    chart: &FacetChart,
    verts_ccw: &[Point2],
) -> Result<(Rational, Rational), ResidueError> {
    let (ts, te) = interval_endpoints_from_chart_ccw(region, facet_name, chart, verts_ccw)?;
    if ts <= te { Ok((ts, te)) } else { Ok((te, ts)) }
}

/// Interval endpoints `(t_start, t_end)` for the cycle-oriented boundary
/// edge on this facet, in the chart's parameter on `u = 0`.
pub fn interval_endpoints_from_chart_ccw(
    region: &Region2,
    facet_name: &str,
    chart: &FacetChart,
    verts_ccw: &[Point2],
) -> Result<(Rational, Rational), ResidueError> {
    let (v_start, v_end) = cycle_edge_vertices(region, facet_name, verts_ccw)?;
    let ts = chart_t_at_boundary_point(chart, &v_start)?;
    let te = chart_t_at_boundary_point(chart, &v_end)?;
    Ok((ts, te))
}

/// Decides whether `+u` points out of the region by stepping `1/1000` along
/// `+u` from the facet midpoint and testing strict interior membership.
/// Returns `+1` if outward, `-1` if inward (the stored chart direction needs
/// flipping to be the true outward normal).
pub fn chart_u_points_outward(
    region: &Region2,
    chart: &FacetChart,
    facet_name: &str,
    verts_ccw: &[Point2],
) -> Result<i32, ResidueError> {
    let (v_start, v_end) = cycle_edge_vertices(region, facet_name, verts_ccw)?;
    let mid = v_start.midpoint(&v_end);
    let t_mid = chart_t_at_boundary_point(chart, &mid)?;

    let eps = rat(1, 1000);
    let bindings = [
        (chart.u.clone(), eps),
        (chart.t.clone(), t_mid),
    ];
    let stepped = Point2 {
        x: chart.x_of.eval(&bindings),
        y: chart.y_of.eval(&bindings),
    };
    Ok(if region.contains(&stepped) { -1 } else { 1 })
}

/// Orientation-agnostic expected residue: the interval form with endpoints
/// in `(min, max)` order. Matches the engine residue only up to sign.
pub fn expected_interval_prefactor_from_chart(
    region: &Region2,
    facet_name: &str,
    chart: &FacetChart,
    verts_ccw: &[Point2],
) -> Result<RatFn, ResidueError> {
    let (a, b) = interval_endpoints_from_chart(region, facet_name, chart, verts_ccw)?;
    Ok(interval_prefactor(&chart.t, &a, &b))
}

/// Orientation-fixed expected residue: cycle-ordered endpoints with the
/// outward-normal sign correction `s_norm` applied, matching the engine
/// residue exactly.
pub fn expected_interval_prefactor_from_chart_ccw(
    region: &Region2,
    facet_name: &str,
    chart: &FacetChart,
    verts_ccw: &[Point2],
) -> Result<RatFn, ResidueError> {
    let (ts, te) = interval_endpoints_from_chart_ccw(region, facet_name, chart, verts_ccw)?;
    let s_norm = chart_u_points_outward(region, chart, facet_name, verts_ccw)?;
    Ok(interval_prefactor(&chart.t, &ts, &te).scale(&Rational::from(s_norm)))
}
